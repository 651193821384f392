use std::{fmt, hash::Hash, marker::PhantomData};

use handlevec::Handle;

use crate::document::{
    Accessor, Animation, Buffer, BufferView, Camera, Document, Image, Light, Material, Mesh,
    Node, Sampler, Scene, Skin, Texture,
};

/// Identifies one loaded document. Stale once that document is replaced or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub(crate) Handle);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document {}", self.0)
    }
}

/// Something stored in one of a [Document]'s arrays.
pub trait Item: Sized {
    const KIND: &'static str;

    fn table(doc: &Document) -> &[Self];
}

macro_rules! impl_item {
    ($($t:ty => $field:ident, $kind:literal;)*) => {
        $(
            impl Item for $t {
                const KIND: &'static str = $kind;

                #[inline]
                fn table(doc: &Document) -> &[Self] {
                    &doc.$field
                }
            }
        )*
    };
}

impl_item! {
    Buffer => buffers, "buffer";
    BufferView => buffer_views, "buffer view";
    Accessor => accessors, "accessor";
    Mesh => meshes, "mesh";
    Material => materials, "material";
    Texture => textures, "texture";
    Image => images, "image";
    Sampler => samplers, "sampler";
    Skin => skins, "skin";
    Camera => cameras, "camera";
    Light => lights, "light";
    Node => nodes, "node";
    Scene => scenes, "scene";
    Animation => animations, "animation";
}

/// A typed reference to item `index` of a loaded document, checked on every use.
pub struct ItemHandle<T> {
    pub document: DocumentId,
    pub index: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T> ItemHandle<T> {
    #[inline]
    pub fn new(document: DocumentId, index: usize) -> Self {
        Self {
            document,
            index,
            _item: PhantomData,
        }
    }
}

impl<T> Clone for ItemHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ItemHandle<T> {}

impl<T> PartialEq for ItemHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document && self.index == other.index
    }
}

impl<T> Eq for ItemHandle<T> {}

impl<T> Hash for ItemHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.document.hash(state);
        self.index.hash(state);
    }
}

impl<T: Item> fmt::Debug for ItemHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemHandle<{}>({}, {})", T::KIND, self.document.0, self.index)
    }
}

impl<T: Item> fmt::Display for ItemHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} of {}", T::KIND, self.index, self.document)
    }
}

/// Primitive `index` of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveHandle {
    pub mesh: ItemHandle<Mesh>,
    pub index: usize,
}

impl fmt::Display for PrimitiveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive {} of {}", self.index, self.mesh)
    }
}

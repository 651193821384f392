//! Loaded documents, keyed by identifier.
//!
//! Each [Registry] entry exclusively owns its [Document]. Loading an identifier that is already
//! mapped replaces the old entry; handles issued for the old entry are rejected from then on.

use std::{collections::HashMap, path::Path, sync::Arc};

use handlevec::HandleVec;

mod handle;
mod names;

pub use handle::*;
pub use names::*;

use crate::{
    buffer::BufferLoader,
    document::{
        Accessor, BufferData, BufferView, Document, Image, Material, Mesh, Node, Primitive,
        Semantic, Texture,
    },
    info::{DocumentInfo, SourceSizes},
    resolve::{self, AccessorView, IndexBase},
    validate::{self, ValidationReport},
    Error,
};

/// One loaded document and its side tables.
#[derive(Debug)]
pub struct Entry {
    pub identifier: String,
    pub document: Document,
    pub names: NameTable,
    pub sizes: SourceSizes,
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: HandleVec<Entry>,
    ids: HashMap<String, DocumentId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers of every loaded document.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.identifier.as_str())
    }

    /// Parse the file at `path` and install it under its path.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<DocumentId, Error> {
        let path = path.as_ref();
        let identifier = path.to_string_lossy().into_owned();
        let bytes = match BufferData::map_path(path) {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, "could not read glTF document");
                return Err(Error::Parse {
                    identifier,
                    source: gltf::Error::Io(e),
                });
            }
        };
        self.parse(identifier, &bytes[..], Some(path))
    }

    /// Parse an in-memory document and install it under `identifier`.
    ///
    /// Buffers may only be embedded (GLB binary chunk or `data:` URI) or absolute `file:` URLs.
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn load_bytes(&mut self, identifier: &str, bytes: &[u8]) -> Result<DocumentId, Error> {
        self.parse(identifier.to_owned(), bytes, None)
    }

    fn parse(
        &mut self,
        identifier: String,
        bytes: &[u8],
        src_path: Option<&Path>,
    ) -> Result<DocumentId, Error> {
        let gltf = match gltf::Gltf::from_slice(bytes) {
            Ok(g) => g,
            Err(source) => {
                tracing::error!(error = %source, "could not parse glTF document");
                return Err(Error::Parse { identifier, source });
            }
        };
        let gltf::Gltf { document, blob } = gltf;
        let bin = blob.as_ref().map_or(0, Vec::len);
        let data = BufferLoader::new(blob, src_path).and_then(|mut l| l.load_all(&document));
        let data = match data {
            Ok(d) => d,
            Err(source) => {
                tracing::error!(error = %source, "could not load glTF buffers");
                return Err(Error::BufferLoad { identifier, source });
            }
        };
        let document = Document::from_gltf(&document, data);
        Ok(self.install(identifier, document, SourceSizes::measure(bytes, bin)))
    }

    /// Install an already-built document under `identifier`.
    pub fn insert(&mut self, identifier: &str, document: Document) -> DocumentId {
        self.install(identifier.to_owned(), document, SourceSizes::default())
    }

    fn install(&mut self, identifier: String, document: Document, sizes: SourceSizes) -> DocumentId {
        if let Some(old) = self.ids.remove(&identifier) {
            tracing::warn!(identifier = identifier.as_str(), "replacing previously loaded document");
            self.entries.remove(old.0);
        }
        let id = DocumentId(self.entries.insert(Entry {
            identifier: identifier.clone(),
            document,
            names: NameTable::default(),
            sizes,
        }));
        tracing::debug!(identifier = identifier.as_str(), %id, "installed document");
        self.ids.insert(identifier, id);
        id
    }

    /// Release the document mapped to `identifier`. Returns whether there was one.
    pub fn close(&mut self, identifier: &str) -> bool {
        match self.ids.remove(identifier) {
            Some(id) => {
                self.entries.remove(id.0);
                tracing::debug!(identifier, "closed document");
                true
            }
            None => {
                tracing::warn!(identifier, "attempted to close a document that isn't loaded");
                false
            }
        }
    }

    /// Release every document.
    pub fn clear(&mut self) {
        tracing::debug!(count = self.entries.len(), "closing all documents");
        self.ids.clear();
        self.entries.clear();
    }

    pub fn id(&self, identifier: &str) -> Result<DocumentId, Error> {
        self.ids
            .get(identifier)
            .copied()
            .ok_or_else(|| Error::not_found(format_args!("document {identifier:?}")))
    }

    pub fn entry(&self, id: DocumentId) -> Result<&Entry, Error> {
        self.entries.get(id.0).ok_or_else(|| Error::not_found(id))
    }

    pub fn entry_mut(&mut self, id: DocumentId) -> Result<&mut Entry, Error> {
        self.entries.get_mut(id.0).ok_or_else(|| Error::not_found(id))
    }

    pub fn document(&self, id: DocumentId) -> Result<&Document, Error> {
        self.entry(id).map(|e| &e.document)
    }

    pub fn get(&self, identifier: &str) -> Result<&Document, Error> {
        self.document(self.id(identifier)?)
    }

    /// Check the named document's integrity and dump its info record. Never modifies it.
    pub fn validate(&self, identifier: &str) -> Result<ValidationReport, Error> {
        let entry = self.entry(self.id(identifier)?)?;
        let report = validate::validate(&entry.document);
        for issue in &report.issues {
            tracing::warn!(identifier, %issue, "validation issue");
        }
        tracing::info!(identifier, status = report.status(), "validated document");
        DocumentInfo::new(identifier, &entry.document, entry.sizes).log();
        Ok(report)
    }

    /// The info record of the named document, also emitted as an `info` event.
    pub fn info(&self, identifier: &str) -> Result<DocumentInfo, Error> {
        let entry = self.entry(self.id(identifier)?)?;
        let info = DocumentInfo::new(identifier, &entry.document, entry.sizes);
        info.log();
        Ok(info)
    }

    pub fn resolve<T: Item>(&self, handle: ItemHandle<T>) -> Result<&T, Error> {
        T::table(self.document(handle.document)?)
            .get(handle.index)
            .ok_or_else(|| Error::not_found(handle))
    }

    /// Handles to every `T` of a document.
    pub fn handles<T: Item>(&self, id: DocumentId) -> Result<Vec<ItemHandle<T>>, Error> {
        let len = T::table(self.document(id)?).len();
        Ok((0..len).map(|i| ItemHandle::new(id, i)).collect())
    }

    fn checked<T: Item>(&self, id: DocumentId, index: usize) -> Result<ItemHandle<T>, Error> {
        let handle = ItemHandle::new(id, index);
        self.resolve(handle).map(|_| handle)
    }

    /// Number of root nodes of scene `scene`.
    pub fn scene_root_count(&self, id: DocumentId, scene: usize) -> Result<usize, Error> {
        self.resolve(ItemHandle::<crate::document::Scene>::new(id, scene))
            .map(|s| s.nodes.len())
    }

    pub fn scene_roots(&self, id: DocumentId, scene: usize) -> Result<Vec<ItemHandle<Node>>, Error> {
        let scene = self.resolve(ItemHandle::<crate::document::Scene>::new(id, scene))?;
        scene.nodes.iter().map(|&n| self.checked(id, n)).collect()
    }

    pub fn child(&self, node: ItemHandle<Node>, index: usize) -> Result<ItemHandle<Node>, Error> {
        let child = self
            .resolve(node)?
            .children
            .get(index)
            .copied()
            .ok_or_else(|| Error::not_found(format_args!("child {index} of {node}")))?;
        self.checked(node.document, child)
    }

    pub fn children(&self, node: ItemHandle<Node>) -> Result<Vec<ItemHandle<Node>>, Error> {
        let children = &self.resolve(node)?.children;
        children
            .iter()
            .map(|&c| self.checked(node.document, c))
            .collect()
    }

    pub fn node_mesh(&self, node: ItemHandle<Node>) -> Result<Option<ItemHandle<Mesh>>, Error> {
        self.resolve(node)?
            .mesh
            .map(|m| self.checked(node.document, m))
            .transpose()
    }

    /// The fixed name of a node; see [NameTable].
    pub fn node_name(&mut self, node: ItemHandle<Node>) -> Result<String, Error> {
        let entry = self.entry_mut(node.document)?;
        entry
            .names
            .node(&entry.document, node.index)
            .map(str::to_owned)
            .ok_or_else(|| Error::not_found(node))
    }

    /// The fixed name of a mesh; see [NameTable].
    pub fn mesh_name(&mut self, mesh: ItemHandle<Mesh>) -> Result<String, Error> {
        let entry = self.entry_mut(mesh.document)?;
        entry
            .names
            .mesh(&entry.document, mesh.index)
            .map(str::to_owned)
            .ok_or_else(|| Error::not_found(mesh))
    }

    pub fn accessor_view(&self, accessor: ItemHandle<Accessor>) -> Result<AccessorView<'_>, Error> {
        let doc = self.document(accessor.document)?;
        Ok(AccessorView::new(doc, accessor.index)?)
    }

    pub fn accessor_buffer_view(
        &self,
        accessor: ItemHandle<Accessor>,
    ) -> Result<Option<ItemHandle<BufferView>>, Error> {
        self.resolve(accessor)?
            .buffer_view
            .map(|v| self.checked(accessor.document, v))
            .transpose()
    }

    /// The view stride of an accessor, or 0 if its elements are tightly packed.
    pub fn accessor_stride(&self, accessor: ItemHandle<Accessor>) -> Result<usize, Error> {
        Ok(match self.accessor_buffer_view(accessor)? {
            Some(view) => self.resolve(view)?.stride.unwrap_or(0),
            None => 0,
        })
    }

    pub fn texture_image(&self, texture: ItemHandle<Texture>) -> Result<ItemHandle<Image>, Error> {
        let image = self.resolve(texture)?.image;
        self.checked(texture.document, image)
    }

    pub fn image_view(&self, image: ItemHandle<Image>) -> Result<Option<ItemHandle<BufferView>>, Error> {
        self.resolve(image)?
            .buffer_view
            .map(|v| self.checked(image.document, v))
            .transpose()
    }

    /// The bytes of an image stored in a buffer view.
    pub fn image_bytes(&self, image: ItemHandle<Image>) -> Result<Option<&[u8]>, Error> {
        let Some(view) = self.image_view(image)? else {
            return Ok(None);
        };
        let doc = self.document(image.document)?;
        Ok(Some(resolve::view_bytes(doc, self.resolve(view)?)?))
    }

    pub fn primitives(&self, mesh: ItemHandle<Mesh>) -> Result<Vec<PrimitiveHandle>, Error> {
        let len = self.resolve(mesh)?.primitives.len();
        Ok((0..len).map(|index| PrimitiveHandle { mesh, index }).collect())
    }

    pub fn primitive(&self, handle: PrimitiveHandle) -> Result<&Primitive, Error> {
        self.resolve(handle.mesh)?
            .primitives
            .get(handle.index)
            .ok_or_else(|| Error::not_found(handle))
    }

    pub fn primitive_attributes(
        &self,
        handle: PrimitiveHandle,
    ) -> Result<Vec<(Semantic, ItemHandle<Accessor>)>, Error> {
        let doc = handle.mesh.document;
        self.primitive(handle)?
            .attributes
            .iter()
            .map(|a| Ok((a.semantic.clone(), self.checked(doc, a.accessor)?)))
            .collect()
    }

    pub fn primitive_material(
        &self,
        handle: PrimitiveHandle,
    ) -> Result<Option<ItemHandle<Material>>, Error> {
        self.primitive(handle)?
            .material
            .map(|m| self.checked(handle.mesh.document, m))
            .transpose()
    }

    /// Decode a primitive's index accessor, if it has one.
    pub fn primitive_indices(
        &self,
        handle: PrimitiveHandle,
        base: IndexBase,
    ) -> Result<Option<Vec<u32>>, Error> {
        let Some(accessor) = self.primitive(handle)?.indices else {
            return Ok(None);
        };
        let view = self.accessor_view(ItemHandle::new(handle.mesh.document, accessor))?;
        let mut res = Vec::new();
        view.read_indices(base, &mut res)?;
        Ok(Some(res))
    }

    /// Shared buffer data of buffer `index`, for consumers that outlive the registry entry.
    pub fn buffer_data(
        &self,
        buffer: ItemHandle<crate::document::Buffer>,
    ) -> Result<Arc<BufferData>, Error> {
        self.resolve(buffer).map(|b| b.data.clone())
    }
}

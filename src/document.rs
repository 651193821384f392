//! An owned, index-based representation of a parsed glTF asset.
//!
//! # Notes
//!
//! * Every cross-reference (a primitive's accessor, a node's children, ...) is stored as a plain
//!   index into one of the [Document]'s arrays. Indices produced by [Document::from_gltf] are
//!   always in range; hand-built documents may not be, which is what
//!   [validate](crate::validate::validate) is for.
//! * Synthesized names are never written back into a [Document]; see
//!   [NameTable](crate::registry::NameTable).
//!
//! # See Also
//!
//! * [glTF 2.0 Spec](https://registry.khronos.org/glTF/specs/2.0/glTF-2.0.html)

mod accessor;
mod buffer;
mod convert;
mod material;
mod mesh;
mod scene;

pub use accessor::*;
pub use buffer::*;
pub use material::*;
pub use mesh::*;
pub use scene::*;

/// The root parsed unit: one glTF asset with its buffer data loaded.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub buffers: Vec<Buffer>,
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub images: Vec<Image>,
    pub samplers: Vec<Sampler>,
    pub skins: Vec<Skin>,
    pub cameras: Vec<Camera>,
    pub lights: Vec<Light>,
    pub nodes: Vec<Node>,
    pub scenes: Vec<Scene>,
    pub animations: Vec<Animation>,
    /// Number of `KHR_materials_variants` variants declared by the asset.
    pub variant_count: usize,
    /// If extant, the index of the default scene
    pub default_scene: Option<usize>,
}

/// A set of joints used to skin a mesh. Not played back; carried for introspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skin {
    pub name: Option<String>,
    pub joints: Vec<usize>,
    pub skeleton: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    pub name: Option<String>,
    pub projection: Projection,
}

/// A `KHR_lights_punctual` light.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Light {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub name: Option<String>,
    pub channel_count: usize,
}

impl Document {
    /// The scenes a walk should cover when no particular scene is requested: the default scene
    /// if the asset names one, else all of them, in order.
    pub fn implied_scenes(&self) -> Vec<usize> {
        match self.default_scene {
            Some(s) => vec![s],
            None => (0..self.scenes.len()).collect(),
        }
    }

    /// Total number of mesh primitives across every mesh.
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitives.len()).sum()
    }
}

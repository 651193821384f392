//! Inert pass-through data: materials, textures, images and samplers are carried for
//! introspection only and never bound to a renderer.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

impl AlphaMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opaque => "OPAQUE",
            Self::Mask => "MASK",
            Self::Blend => "BLEND",
        }
    }
}

/// A reference from a material to a [Texture].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef {
    pub texture: usize,
    pub tex_coord: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PbrMetallicRoughness {
    pub base_color_factor: [f32; 4],
    pub base_color_texture: Option<TextureRef>,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub metallic_roughness_texture: Option<TextureRef>,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0; 4],
            base_color_texture: None,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            metallic_roughness_texture: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub alpha_mode: AlphaMode,
    /// Only meaningful for [AlphaMode::Mask].
    pub alpha_cutoff: Option<f32>,
    pub double_sided: bool,
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    pub emissive_factor: [f32; 3],
    pub normal_texture: Option<TextureRef>,
    pub occlusion_texture: Option<TextureRef>,
    pub emissive_texture: Option<TextureRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texture {
    pub name: Option<String>,
    pub image: usize,
    pub sampler: Option<usize>,
}

/// An image, either external (`uri`) or stored in a buffer view. Never decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub name: Option<String>,
    pub uri: Option<String>,
    pub buffer_view: Option<usize>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sampler {
    pub name: Option<String>,
}

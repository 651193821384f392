//! Conversion from the [gltf] crate's borrowed document API into an owned [Document].
//!
//! The input document must have passed `gltf`'s own validation; its wrapper API panics on
//! dangling indices.

use std::sync::Arc;

use gltf::{accessor::DataType, buffer::Target, camera, image, material, mesh::Mode};

use super::*;

fn owned(name: Option<&str>) -> Option<String> {
    name.map(str::to_owned)
}

fn floats(value: Option<gltf::json::Value>) -> Option<Vec<f32>> {
    value.and_then(|v| {
        v.as_array()
            .map(|a| a.iter().filter_map(|x| x.as_f64()).map(|x| x as f32).collect())
    })
}

fn texture_ref(info: Option<gltf::texture::Info<'_>>) -> Option<TextureRef> {
    info.map(|i| TextureRef {
        texture: i.texture().index(),
        tex_coord: i.tex_coord(),
    })
}

impl From<DataType> for ComponentType {
    fn from(value: DataType) -> Self {
        match value {
            DataType::I8 => Self::I8,
            DataType::U8 => Self::U8,
            DataType::I16 => Self::I16,
            DataType::U16 => Self::U16,
            DataType::U32 => Self::U32,
            DataType::F32 => Self::F32,
        }
    }
}

impl From<gltf::accessor::Dimensions> for Dimensions {
    fn from(value: gltf::accessor::Dimensions) -> Self {
        use gltf::accessor::Dimensions as D;
        match value {
            D::Scalar => Self::Scalar,
            D::Vec2 => Self::Vec2,
            D::Vec3 => Self::Vec3,
            D::Vec4 => Self::Vec4,
            D::Mat2 => Self::Mat2,
            D::Mat3 => Self::Mat3,
            D::Mat4 => Self::Mat4,
        }
    }
}

impl From<Mode> for Topology {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Points => Self::Points,
            Mode::Lines => Self::Lines,
            Mode::LineLoop => Self::LineLoop,
            Mode::LineStrip => Self::LineStrip,
            Mode::Triangles => Self::Triangles,
            Mode::TriangleStrip => Self::TriangleStrip,
            Mode::TriangleFan => Self::TriangleFan,
        }
    }
}

impl From<gltf::Semantic> for Semantic {
    #[allow(unreachable_patterns)] // `Extras` only exists with the `extras` feature
    fn from(value: gltf::Semantic) -> Self {
        use gltf::Semantic as S;
        match value {
            S::Positions => Self::Position,
            S::Normals => Self::Normal,
            S::Tangents => Self::Tangent,
            S::TexCoords(n) => Self::TexCoord(n),
            S::Colors(n) => Self::Color(n),
            S::Joints(n) => Self::Joints(n),
            S::Weights(n) => Self::Weights(n),
            other => Self::Custom(format!("{other:?}")),
        }
    }
}

impl From<material::AlphaMode> for AlphaMode {
    fn from(value: material::AlphaMode) -> Self {
        match value {
            material::AlphaMode::Opaque => Self::Opaque,
            material::AlphaMode::Mask => Self::Mask,
            material::AlphaMode::Blend => Self::Blend,
        }
    }
}

/// Read the transform as authored, from the raw JSON node.
///
/// The wrapper's `Node::transform` fills absent components with identity values, which loses the
/// has-flags. A matrix takes precedence over TRS, as it does there.
impl From<&gltf::json::Node> for NodeTransform {
    fn from(node: &gltf::json::Node) -> Self {
        match node.matrix {
            Some(matrix) => Self {
                matrix: Some(matrix),
                ..Default::default()
            },
            None => Self {
                translation: node.translation,
                rotation: node.rotation.map(|r| r.0),
                scale: node.scale,
                matrix: None,
            },
        }
    }
}

impl Document {
    /// Build an owned document from a validated `gltf` document and its loaded buffer data, in
    /// buffer order.
    pub(crate) fn from_gltf(doc: &gltf::Document, data: Vec<Arc<BufferData>>) -> Self {
        let buffers = doc
            .buffers()
            .zip(data)
            .map(|(b, data)| Buffer {
                name: owned(b.name()),
                uri: match b.source() {
                    gltf::buffer::Source::Bin => None,
                    gltf::buffer::Source::Uri(uri) => Some(uri.to_owned()),
                },
                byte_length: b.length(),
                data,
            })
            .collect();

        let buffer_views = doc
            .views()
            .map(|v| BufferView {
                name: owned(v.name()),
                buffer: v.buffer().index(),
                offset: v.offset(),
                length: v.length(),
                stride: v.stride(),
                target: v.target().map(|t| match t {
                    Target::ArrayBuffer => ViewTarget::Array,
                    Target::ElementArrayBuffer => ViewTarget::ElementArray,
                }),
            })
            .collect();

        let accessors = doc
            .accessors()
            .map(|a| Accessor {
                name: owned(a.name()),
                buffer_view: a.view().map(|v| v.index()),
                offset: a.offset(),
                count: a.count(),
                component_type: a.data_type().into(),
                dimensions: a.dimensions().into(),
                normalized: a.normalized(),
                min: floats(a.min()),
                max: floats(a.max()),
                sparse: a.sparse().is_some(),
            })
            .collect();

        let meshes = doc
            .meshes()
            .map(|m| Mesh {
                name: owned(m.name()),
                primitives: m
                    .primitives()
                    .map(|p| Primitive {
                        topology: p.mode().into(),
                        attributes: p
                            .attributes()
                            .map(|(semantic, acc)| Attribute::new(semantic.into(), acc.index()))
                            .collect(),
                        indices: p.indices().map(|a| a.index()),
                        material: p.material().index(),
                    })
                    .collect(),
                weights: m.weights().map(<[f32]>::to_vec).unwrap_or_default(),
            })
            .collect();

        let materials = doc
            .materials()
            .map(|m| {
                let pbr = m.pbr_metallic_roughness();
                Material {
                    name: owned(m.name()),
                    alpha_mode: m.alpha_mode().into(),
                    alpha_cutoff: m.alpha_cutoff(),
                    double_sided: m.double_sided(),
                    pbr_metallic_roughness: PbrMetallicRoughness {
                        base_color_factor: pbr.base_color_factor(),
                        base_color_texture: texture_ref(pbr.base_color_texture()),
                        metallic_factor: pbr.metallic_factor(),
                        roughness_factor: pbr.roughness_factor(),
                        metallic_roughness_texture: texture_ref(pbr.metallic_roughness_texture()),
                    },
                    emissive_factor: m.emissive_factor(),
                    normal_texture: m.normal_texture().map(|t| TextureRef {
                        texture: t.texture().index(),
                        tex_coord: t.tex_coord(),
                    }),
                    occlusion_texture: m.occlusion_texture().map(|t| TextureRef {
                        texture: t.texture().index(),
                        tex_coord: t.tex_coord(),
                    }),
                    emissive_texture: texture_ref(m.emissive_texture()),
                }
            })
            .collect();

        let textures = doc
            .textures()
            .map(|t| Texture {
                name: owned(t.name()),
                image: t.source().index(),
                sampler: t.sampler().index(),
            })
            .collect();

        let images = doc
            .images()
            .map(|i| match i.source() {
                image::Source::View { view, mime_type } => Image {
                    name: owned(i.name()),
                    uri: None,
                    buffer_view: Some(view.index()),
                    mime_type: Some(mime_type.to_owned()),
                },
                image::Source::Uri { uri, mime_type } => Image {
                    name: owned(i.name()),
                    uri: Some(uri.to_owned()),
                    buffer_view: None,
                    mime_type: owned(mime_type),
                },
            })
            .collect();

        let json = doc.as_json();
        let nodes = doc
            .nodes()
            .map(|n| Node {
                name: owned(n.name()),
                transform: json
                    .nodes
                    .get(n.index())
                    .map(NodeTransform::from)
                    .unwrap_or_default(),
                mesh: n.mesh().map(|m| m.index()),
                skin: n.skin().map(|s| s.index()),
                camera: n.camera().map(|c| c.index()),
                light: n.light().map(|l| l.index()),
                children: n.children().map(|c| c.index()).collect(),
            })
            .collect();

        Self {
            buffers,
            buffer_views,
            accessors,
            meshes,
            materials,
            textures,
            images,
            samplers: doc
                .samplers()
                .map(|s| Sampler {
                    name: owned(s.name()),
                })
                .collect(),
            skins: doc
                .skins()
                .map(|s| Skin {
                    name: owned(s.name()),
                    joints: s.joints().map(|j| j.index()).collect(),
                    skeleton: s.skeleton().map(|j| j.index()),
                })
                .collect(),
            cameras: doc
                .cameras()
                .map(|c| Camera {
                    name: owned(c.name()),
                    projection: match c.projection() {
                        camera::Projection::Orthographic(_) => Projection::Orthographic,
                        camera::Projection::Perspective(_) => Projection::Perspective,
                    },
                })
                .collect(),
            lights: doc
                .lights()
                .map(|lights| {
                    lights
                        .map(|l| Light {
                            name: owned(l.name()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            nodes,
            scenes: doc
                .scenes()
                .map(|s| Scene {
                    name: owned(s.name()),
                    nodes: s.nodes().map(|n| n.index()).collect(),
                })
                .collect(),
            animations: doc
                .animations()
                .map(|a| Animation {
                    name: owned(a.name()),
                    channel_count: a.channels().count(),
                })
                .collect(),
            variant_count: doc.variants().map_or(0, |v| v.count()),
            default_scene: doc.default_scene().map(|s| s.index()),
        }
    }
}

//! Classification of mesh primitives and extraction of their vertex positions.

use crate::{
    document::{Dimensions, Document, Primitive, Semantic, Topology},
    resolve::{AccessorView, DecodeError},
};

/// The outcome of [extract_positions].
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// Vertex positions in source order.
    Positions(Vec<[f32; 3]>),
    /// A triangle primitive without a `POSITION` attribute.
    NoPositions,
    /// Extraction is only defined for [Topology::Triangles].
    Unsupported(Topology),
}

impl Extraction {
    /// The extracted vertices; empty unless this is [Extraction::Positions].
    pub fn vertices(&self) -> &[[f32; 3]] {
        match self {
            Self::Positions(p) => p,
            _ => &[],
        }
    }
}

#[inline]
pub fn classify(primitive: &Primitive) -> Topology {
    primitive.topology
}

/// Extract the `POSITION` stream of a triangle primitive as (x, y, z) triples.
///
/// `scratch` is cleared and reused for the intermediate float decode.
pub fn extract_positions(
    doc: &Document,
    primitive: &Primitive,
    scratch: &mut Vec<f32>,
) -> Result<Extraction, DecodeError> {
    let topology = classify(primitive);
    if topology != Topology::Triangles {
        tracing::warn!(%topology, "unsupported primitive type");
        return Ok(Extraction::Unsupported(topology));
    }
    let Some(attribute) = primitive.attribute(&Semantic::Position) else {
        tracing::debug!("primitive has no POSITION attribute");
        return Ok(Extraction::NoPositions);
    };

    let view = AccessorView::new(doc, attribute.accessor)?;
    if view.dimensions() != Dimensions::Vec3 {
        tracing::warn!(
            accessor = attribute.accessor,
            dimensions = view.dimensions().as_str(),
            "POSITION accessor is not a vec3; reading consecutive components as triples"
        );
    }
    scratch.clear();
    view.read_floats(0, view.len(), scratch)?;

    let vertices: Vec<[f32; 3]> = scratch
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    tracing::trace!(
        accessor = attribute.accessor,
        vertices = vertices.len(),
        "extracted positions"
    );
    Ok(Extraction::Positions(vertices))
}

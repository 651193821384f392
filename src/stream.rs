//! Vertex stream layouts and the geometry buffers built from them.

use std::fmt;

/// Named vertex streams a [GeometryBuffer] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamName {
    Position,
    Normal,
    Texcoord0,
    Color,
}

impl StreamName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Normal => "normal",
            Self::Texcoord0 => "texcoord0",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stream of a layout: `components` 32-bit floats per vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamDecl {
    pub name: StreamName,
    pub components: usize,
}

impl StreamDecl {
    pub const fn new(name: StreamName, components: usize) -> Self {
        Self { name, components }
    }
}

const POSITION: StreamDecl = StreamDecl::new(StreamName::Position, 3);
const NORMAL: StreamDecl = StreamDecl::new(StreamName::Normal, 3);
const TEXCOORD0: StreamDecl = StreamDecl::new(StreamName::Texcoord0, 2);
const COLOR: StreamDecl = StreamDecl::new(StreamName::Color, 4);

/// The fixed vertex layouts a mesh instance's geometry can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamLayout {
    /// position, texcoord0, color
    #[default]
    Standard,
    /// position, color
    NoTexture,
    /// position, normal, texcoord0, color
    WithNormals,
}

impl StreamLayout {
    pub const ALL: [Self; 3] = [Self::Standard, Self::NoTexture, Self::WithNormals];

    pub fn streams(self) -> &'static [StreamDecl] {
        match self {
            Self::Standard => &[POSITION, TEXCOORD0, COLOR],
            Self::NoTexture => &[POSITION, COLOR],
            Self::WithNormals => &[POSITION, NORMAL, TEXCOORD0, COLOR],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::NoTexture => "no-texture",
            Self::WithNormals => "with-normals",
        }
    }
}

impl fmt::Display for StreamLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StreamLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown stream layout: {s:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("cannot build a geometry buffer with no vertices")]
    Empty,
    #[error("layout {layout} has no {stream} stream")]
    MissingStream {
        layout: StreamLayout,
        stream: StreamName,
    },
    #[error("{stream} stream holds {expected} vertices, but {actual} were supplied")]
    LayoutMismatch {
        stream: StreamName,
        expected: usize,
        actual: usize,
    },
}

/// Host-bound vertex data for one primitive, laid out per a [StreamLayout].
///
/// Every stream of the layout is allocated; only the position stream is ever populated.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    layout: StreamLayout,
    vertex_count: usize,
    streams: Vec<Vec<f32>>,
}

impl GeometryBuffer {
    pub fn new(layout: StreamLayout, vertex_count: usize) -> Result<Self, StreamError> {
        if vertex_count == 0 {
            return Err(StreamError::Empty);
        }
        Ok(Self {
            layout,
            vertex_count,
            streams: layout
                .streams()
                .iter()
                .map(|s| vec![0.0; s.components * vertex_count])
                .collect(),
        })
    }

    #[inline]
    pub fn layout(&self) -> StreamLayout {
        self.layout
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn position_of(&self, name: StreamName) -> Result<usize, StreamError> {
        self.layout
            .streams()
            .iter()
            .position(|s| s.name == name)
            .ok_or(StreamError::MissingStream {
                layout: self.layout,
                stream: name,
            })
    }

    /// The flat float data of stream `name`.
    pub fn stream(&self, name: StreamName) -> Option<&[f32]> {
        self.position_of(name).ok().map(|i| self.streams[i].as_slice())
    }

    /// Copy `positions` into the position stream, element by element.
    pub fn write_positions(&mut self, positions: &[[f32; 3]]) -> Result<(), StreamError> {
        if positions.len() != self.vertex_count {
            return Err(StreamError::LayoutMismatch {
                stream: StreamName::Position,
                expected: self.vertex_count,
                actual: positions.len(),
            });
        }
        let i = self.position_of(StreamName::Position)?;
        for (dst, src) in self.streams[i].chunks_exact_mut(3).zip(positions) {
            dst.copy_from_slice(src);
        }
        Ok(())
    }

    /// Iterate over the position stream as (x, y, z) triples.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.stream(StreamName::Position)
            .unwrap_or_default()
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_start_with_position() {
        for layout in StreamLayout::ALL {
            assert_eq!(layout.streams()[0], POSITION);
            assert_eq!(layout.as_str().parse::<StreamLayout>(), Ok(layout));
        }
    }

    #[test]
    fn unpopulated_streams_are_allocated() {
        let mut buf = GeometryBuffer::new(StreamLayout::WithNormals, 2).unwrap();
        buf.write_positions(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
            .unwrap();
        assert_eq!(buf.stream(StreamName::Normal).unwrap(), &[0.0; 6]);
        assert_eq!(buf.stream(StreamName::Color).unwrap().len(), 8);
        assert_eq!(
            buf.positions().collect::<Vec<_>>(),
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn mismatched_counts() {
        let mut buf = GeometryBuffer::new(StreamLayout::NoTexture, 3).unwrap();
        assert_eq!(
            buf.write_positions(&[[0.0; 3]]),
            Err(StreamError::LayoutMismatch {
                stream: StreamName::Position,
                expected: 3,
                actual: 1
            })
        );
        assert_eq!(
            GeometryBuffer::new(StreamLayout::Standard, 0),
            Err(StreamError::Empty)
        );
    }
}

//! Locating and decoding the bytes behind [Accessors](Accessor) and [BufferViews](BufferView).
//!
//! All reads honor the view's byte offset and the buffer's base address. Decoders write into a
//! caller-supplied `Vec` so hot paths can reuse one scratch allocation.

use num_traits::{AsPrimitive, Bounded};

use crate::document::{Accessor, BufferView, ComponentType, Dimensions, Document};

/// Errors related to decoding accessor & buffer view data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("accessor {0} does not reference a buffer view")]
    MissingBufferView(usize),
    #[error("{kind} index {index} out of range (0..{len})")]
    InvalidReference {
        kind: &'static str,
        index: usize,
        len: usize,
    },
    #[error("read of elements {start}..{end} exceeds accessor count {count}")]
    OutOfBounds {
        start: usize,
        end: usize,
        count: usize,
    },
    #[error("byte range {start}..{end} exceeds buffer length {len}")]
    ByteRange { start: usize, end: usize, len: usize },
    #[error("unsupported index width: {0} bytes")]
    UnsupportedIndexWidth(usize),
    #[error("unsupported index component type: {0:?}")]
    UnsupportedIndexType(ComponentType),
}

/// How integer indices are reported to consumers.
///
/// Vertex data is never adjusted; this only applies to decoded index values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexBase {
    /// Report indices exactly as stored.
    Zero,
    /// Report every index +1, for consumers that count from one.
    #[default]
    One,
}

impl IndexBase {
    #[inline]
    pub fn adjust(self, index: u32) -> u32 {
        match self {
            Self::Zero => index,
            Self::One => index.saturating_add(1),
        }
    }
}

fn lookup<'doc, T>(
    table: &'doc [T],
    kind: &'static str,
    index: usize,
) -> Result<&'doc T, DecodeError> {
    table.get(index).ok_or(DecodeError::InvalidReference {
        kind,
        index,
        len: table.len(),
    })
}

/// The bytes of a [BufferView], bounds-checked against its buffer.
pub fn view_bytes<'doc>(doc: &'doc Document, view: &BufferView) -> Result<&'doc [u8], DecodeError> {
    let buffer = lookup(&doc.buffers, "buffer", view.buffer)?.as_slice();
    let end = view.offset.checked_add(view.length).unwrap_or(usize::MAX);
    buffer.get(view.offset..end).ok_or(DecodeError::ByteRange {
        start: view.offset,
        end,
        len: buffer.len(),
    })
}

/// A validated window onto the elements of one [Accessor].
#[derive(Debug, Clone, Copy)]
pub struct AccessorView<'doc> {
    /// The whole buffer view.
    bytes: &'doc [u8],
    offset: usize,
    stride: usize,
    count: usize,
    component_type: ComponentType,
    dimensions: Dimensions,
    normalized: bool,
}

impl<'doc> AccessorView<'doc> {
    pub fn new(doc: &'doc Document, index: usize) -> Result<Self, DecodeError> {
        let accessor = lookup(&doc.accessors, "accessor", index)?;
        Self::from_accessor(doc, index, accessor)
    }

    pub fn from_accessor(
        doc: &'doc Document,
        index: usize,
        accessor: &Accessor,
    ) -> Result<Self, DecodeError> {
        let view_index = accessor
            .buffer_view
            .ok_or(DecodeError::MissingBufferView(index))?;
        let view = lookup(&doc.buffer_views, "buffer view", view_index)?;
        let element_size = accessor.element_size();
        let res = Self {
            bytes: view_bytes(doc, view)?,
            offset: accessor.offset,
            stride: view.stride_for(element_size),
            count: accessor.count,
            component_type: accessor.component_type,
            dimensions: accessor.dimensions,
            normalized: accessor.normalized,
        };
        // the last element must fit inside the view
        match res.span(0, res.count) {
            Some(span) if span.end <= res.bytes.len() => Ok(res),
            span => Err(DecodeError::ByteRange {
                start: span.as_ref().map_or(res.offset, |s| s.start),
                end: span.map_or(usize::MAX, |s| s.end),
                len: res.bytes.len(),
            }),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.dimensions.component_count()
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[inline]
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    /// Byte range (within the view) covering elements `start..start + count`, or `None` if it
    /// is not addressable.
    fn span(&self, start: usize, count: usize) -> Option<std::ops::Range<usize>> {
        let begin = start
            .checked_mul(self.stride)
            .and_then(|b| b.checked_add(self.offset))?;
        let end = match count {
            0 => begin,
            n => (n - 1)
                .checked_mul(self.stride)
                .and_then(|e| e.checked_add(self.element_size()))
                .and_then(|e| e.checked_add(begin))?,
        };
        Some(begin..end)
    }

    /// The raw bytes covering every element of the accessor, starting at its first byte.
    ///
    /// For strided views this includes the padding between elements.
    pub fn bytes(&self) -> &'doc [u8] {
        self.span(0, self.count)
            .and_then(|span| self.bytes.get(span))
            .unwrap_or_default()
    }

    /// Decode elements `start..start + count`, appending every component of each as a float.
    ///
    /// Integer components are normalized if the accessor is `normalized`, and converted as-is
    /// otherwise.
    pub fn read_floats(
        &self,
        start: usize,
        count: usize,
        out: &mut Vec<f32>,
    ) -> Result<(), DecodeError> {
        let Some(end) = start.checked_add(count).filter(|&end| end <= self.count) else {
            return Err(DecodeError::OutOfBounds {
                start,
                end: start.saturating_add(count),
                count: self.count,
            });
        };
        let csize = self.component_type.size();
        let components = self.dimensions.component_count();
        out.reserve(count * components);
        for element in start..end {
            let base = self.offset + element * self.stride;
            for c in 0..components {
                let at = base + c * csize;
                out.push(read_component(
                    self.component_type,
                    &self.bytes[at..at + csize],
                    self.normalized,
                ));
            }
        }
        Ok(())
    }

    /// Decode every element as an unsigned index.
    pub fn read_indices(&self, base: IndexBase, out: &mut Vec<u32>) -> Result<(), DecodeError> {
        let width = match self.component_type {
            ComponentType::U8 | ComponentType::U16 | ComponentType::U32 => {
                self.component_type.size()
            }
            other => return Err(DecodeError::UnsupportedIndexType(other)),
        };
        out.reserve(self.count);
        for element in 0..self.count {
            let at = self.offset + element * self.stride;
            out.push(base.adjust(read_unsigned(&self.bytes[at..at + width])));
        }
        Ok(())
    }
}

/// Normalize an integer component to `[0, 1]` (unsigned) or `[-1, 1]` (signed).
fn normalize<T>(value: T) -> f32
where
    T: Bounded + AsPrimitive<f32>,
{
    (value.as_() / T::max_value().as_()).max(-1.0)
}

fn read_component(ty: ComponentType, bytes: &[u8], normalized: bool) -> f32 {
    macro_rules! component {
        ($t:ty) => {{
            let v = <$t>::from_le_bytes(bytes.try_into().unwrap_or_default());
            if normalized {
                normalize(v)
            } else {
                v as f32
            }
        }};
    }
    match ty {
        ComponentType::I8 => component!(i8),
        ComponentType::U8 => component!(u8),
        ComponentType::I16 => component!(i16),
        ComponentType::U16 => component!(u16),
        ComponentType::U32 => component!(u32),
        ComponentType::F32 => f32::from_le_bytes(bytes.try_into().unwrap_or_default()),
    }
}

fn read_unsigned(bytes: &[u8]) -> u32 {
    match *bytes {
        [a] => a as u32,
        [a, b] => u16::from_le_bytes([a, b]) as u32,
        [a, b, c, d] => u32::from_le_bytes([a, b, c, d]),
        _ => 0,
    }
}

/// The raw bytes covering every element of accessor `index`.
///
/// Fails if the accessor has no buffer view.
pub fn resolve_bytes(doc: &Document, index: usize) -> Result<&[u8], DecodeError> {
    AccessorView::new(doc, index).map(|v| v.bytes())
}

/// Decode `count` elements of accessor `index`, starting at element `start`, as floats.
pub fn read_floats(
    doc: &Document,
    index: usize,
    start: usize,
    count: usize,
    out: &mut Vec<f32>,
) -> Result<(), DecodeError> {
    AccessorView::new(doc, index)?.read_floats(start, count, out)
}

/// Decode a tightly-packed array of `width`-byte unsigned indices filling buffer view `view`.
///
/// The view's stride is ignored. `width` must be 1, 2 or 4; any other width decodes nothing.
pub fn read_indices(
    doc: &Document,
    view: usize,
    width: usize,
    base: IndexBase,
    out: &mut Vec<u32>,
) -> Result<(), DecodeError> {
    if !matches!(width, 1 | 2 | 4) {
        tracing::error!(view, width, "unsupported index width");
        return Err(DecodeError::UnsupportedIndexWidth(width));
    }
    let view = lookup(&doc.buffer_views, "buffer view", view)?;
    let bytes = view_bytes(doc, view)?;
    out.extend(
        bytes
            .chunks_exact(width)
            .map(|chunk| base.adjust(read_unsigned(chunk))),
    );
    Ok(())
}

use std::mem::size_of;

/// Type of the components of accessed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    #[default]
    F32,
}

impl ComponentType {
    /// Get the size in bytes of a component, at compile-time.
    pub const fn size(self) -> usize {
        match self {
            Self::I8 => size_of::<i8>(),
            Self::U8 => size_of::<u8>(),
            Self::I16 => size_of::<i16>(),
            Self::U16 => size_of::<u16>(),
            Self::U32 => size_of::<u32>(),
            Self::F32 => size_of::<f32>(),
        }
    }
}

// positions are always streamed as 32-bit floats
static_assertions::const_assert_eq!(ComponentType::F32.size(), 4);
static_assertions::const_assert_eq!(ComponentType::U16.size(), 2);

/// Structural type of accessed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimensions {
    #[default]
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl Dimensions {
    pub const fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat2 => "MAT2",
            Self::Mat3 => "MAT3",
            Self::Mat4 => "MAT4",
        }
    }
}

/// Describes how to interpret a [BufferView](super::BufferView)'s bytes as a typed sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accessor {
    pub name: Option<String>,
    /// Absent for sparse accessors without a base view.
    pub buffer_view: Option<usize>,
    /// Byte offset within the view.
    pub offset: usize,
    /// Number of elements.
    pub count: usize,
    pub component_type: ComponentType,
    pub dimensions: Dimensions,
    pub normalized: bool,
    pub min: Option<Vec<f32>>,
    pub max: Option<Vec<f32>>,
    pub sparse: bool,
}

impl Accessor {
    /// Size in bytes of one element.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.component_type.size() * self.dimensions.component_count()
    }
}

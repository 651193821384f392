use std::{fs::File, io, ops::Deref, path::Path, sync::Arc};

use memmap2::Mmap;

/// A memory-mapped external buffer file.
#[derive(Debug)]
pub struct BufferFile {
    // fields drop in declaration order; the map must go before its file
    data: Mmap,
    _file: File,
}

impl BufferFile {
    #[allow(unsafe_code)]
    pub fn new(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        tracing::trace!(
            path = path.as_ref().as_os_str().to_str(),
            "memory-mapping glTF buffer"
        );
        let file = File::options().read(true).write(false).open(path)?;
        Ok(Self {
            data: unsafe { Mmap::map(&file)? },
            _file: file,
        })
    }
}

impl Deref for BufferFile {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// The bytes backing a [Buffer].
#[derive(Debug)]
pub enum BufferData {
    /// The binary chunk of a GLB container.
    Blob(Vec<u8>),
    /// An external file, memory-mapped.
    File(BufferFile),
    /// Decoded `data:` URIs and anything built in memory.
    Owned(Vec<u8>),
}

impl Default for BufferData {
    fn default() -> Self {
        Self::Owned(Vec::new())
    }
}

impl From<Vec<u8>> for BufferData {
    fn from(value: Vec<u8>) -> Self {
        Self::Owned(value)
    }
}

impl BufferData {
    pub fn map_path(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let path = path.as_ref();
        // zero-length files can't be mapped on every platform
        if path.metadata()?.len() == 0 {
            return Ok(Self::Owned(Vec::new()));
        }
        BufferFile::new(path).map(Self::File)
    }
}

impl Deref for BufferData {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Blob(data) => data,
            Self::File(file) => file,
            Self::Owned(data) => data,
        }
    }
}

/// Raw byte storage. Several buffers may share the same [BufferData] when they name the same
/// source.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    pub name: Option<String>,
    /// `None` for the binary chunk of a GLB container.
    pub uri: Option<String>,
    /// Length declared by the asset; `data` may be longer (but never shorter, once loaded).
    pub byte_length: usize,
    pub data: Arc<BufferData>,
}

impl Buffer {
    /// Build a buffer around bytes that are already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            name: None,
            uri: None,
            byte_length: bytes.len(),
            data: Arc::new(BufferData::Owned(bytes)),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTarget {
    Array,
    ElementArray,
}

/// A `{buffer, byte offset, byte length, stride}` window into a [Buffer].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferView {
    pub name: Option<String>,
    pub buffer: usize,
    pub offset: usize,
    pub length: usize,
    /// `None` (or `Some(0)`) means tightly packed; the element size is implied by the consumer.
    pub stride: Option<usize>,
    pub target: Option<ViewTarget>,
}

impl BufferView {
    /// Stride to use for elements of `element_size` bytes.
    #[inline]
    pub fn stride_for(&self, element_size: usize) -> usize {
        match self.stride {
            Some(s) if s != 0 => s,
            _ => element_size,
        }
    }
}

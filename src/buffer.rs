//! Loading of glTF buffer payloads: the GLB binary chunk, `data:` URIs, and external files
//! referenced relative to the document.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

mod data_uri;

use url::Url;

use crate::document::BufferData;

/// Errors related to loading buffer payloads.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("expected file, found directory: {0:?}")]
    IsADirectory(PathBuf), // TODO :: use `std::io::IsADirectory` once that's stabilized
    #[error("could not express path as a URL: {0:?}")]
    UnsupportedPath(PathBuf),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("expected local file path or data URI; instead, found: {0:?}")]
    UnsupportedUriScheme(String),
    #[error("attempted to access binary blob in document without one")]
    DocumentDoesNotIncludeBinaryBlob,
    #[error("buffer {index} references external data {uri:?}, but the document was loaded from memory")]
    ExternalReferenceWithoutBase { index: usize, uri: String },
    #[error("buffer {index} has a malformed data URI")]
    MalformedDataUri { index: usize },
    #[error("buffer {index} declares {declared} bytes, but its source holds only {actual}")]
    TooShort {
        index: usize,
        declared: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum BufferCacheId {
    Blob,
    Url(Url),
}

impl From<Url> for BufferCacheId {
    fn from(value: Url) -> Self {
        Self::Url(value)
    }
}

/// Resolve the buffers of one document. Sources named more than once are loaded once.
#[derive(Debug)]
pub struct BufferLoader {
    /// Path to the glTF document. Used when resolving relative URLs.
    src_path: Option<Url>,
    data: HashMap<BufferCacheId, Arc<BufferData>>,
}

impl BufferLoader {
    /// `src_path` is the path of the document itself, or `None` if it was loaded from memory.
    pub fn new(blob: Option<Vec<u8>>, src_path: Option<&Path>) -> Result<Self, BufferError> {
        let src_path = match src_path {
            Some(path) => {
                let path = path.canonicalize()?;
                if path.is_dir() {
                    return Err(BufferError::IsADirectory(path));
                }
                Some(Url::from_file_path(&path).map_err(|_| BufferError::UnsupportedPath(path))?)
            }
            None => None,
        };
        Ok(Self {
            src_path,
            data: match blob {
                Some(b) => HashMap::from([(BufferCacheId::Blob, Arc::new(BufferData::Blob(b)))]),
                None => HashMap::new(),
            },
        })
    }

    #[tracing::instrument(skip(self, uri), fields(src_url = self.src_path.as_ref().map(Url::as_str)))]
    pub fn load(&mut self, index: usize, uri: &str) -> Result<Arc<BufferData>, BufferError> {
        if uri.starts_with("data:") {
            tracing::trace!("decoding data URI");
            return data_uri::decode(uri)
                .map(|bytes| Arc::new(BufferData::Owned(bytes)))
                .ok_or(BufferError::MalformedDataUri { index });
        }

        let Some(base) = self.src_path.as_ref() else {
            return match Url::parse(uri) {
                Ok(url) if url.scheme() == "file" => self.load_url(url),
                Ok(url) => Err(BufferError::UnsupportedUriScheme(url.scheme().to_owned())),
                Err(_) => Err(BufferError::ExternalReferenceWithoutBase {
                    index,
                    uri: uri.to_owned(),
                }),
            };
        };
        let url = Url::options().base_url(Some(base)).parse(uri)?;
        self.load_url(url)
    }

    fn load_url(&mut self, url: Url) -> Result<Arc<BufferData>, BufferError> {
        if url.scheme() != "file" {
            return Err(BufferError::UnsupportedUriScheme(url.scheme().to_owned()));
        }

        let data_key = BufferCacheId::from(url.clone());
        if let Some(data) = self.data.get(&data_key).cloned() {
            tracing::trace!(url = url.as_str(), "already loaded glTF buffer");
            return Ok(data);
        }

        tracing::debug!(url = url.as_str(), "loading glTF buffer");
        let path = url
            .to_file_path()
            .map_err(|_| BufferError::UnsupportedUriScheme(url.scheme().to_owned()))?;
        let data = Arc::new(BufferData::map_path(path)?);
        self.data.insert(data_key, data.clone());
        Ok(data)
    }

    pub fn load_gltf_buffer(
        &mut self,
        buffer: &gltf::Buffer<'_>,
    ) -> Result<Arc<BufferData>, BufferError> {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => self
                .data
                .get(&BufferCacheId::Blob)
                .cloned()
                .ok_or(BufferError::DocumentDoesNotIncludeBinaryBlob)?,
            gltf::buffer::Source::Uri(uri) => self.load(buffer.index(), uri)?,
        };
        if data.len() < buffer.length() {
            return Err(BufferError::TooShort {
                index: buffer.index(),
                declared: buffer.length(),
                actual: data.len(),
            });
        }
        Ok(data)
    }

    /// Load every buffer of `doc`, in order.
    pub fn load_all(&mut self, doc: &gltf::Document) -> Result<Vec<Arc<BufferData>>, BufferError> {
        doc.buffers().map(|b| self.load_gltf_buffer(&b)).collect()
    }
}

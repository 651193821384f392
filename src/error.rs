use crate::{buffer::BufferError, resolve::DecodeError, spawn::SpawnError};

/// Errors surfaced by [Registry](crate::Registry) and [Context](crate::Context) operations.
///
/// None of these are fatal to the caller; every operation that returns one has already logged
/// it and left the registry unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not parse {identifier:?}: {source}")]
    Parse {
        identifier: String,
        #[source]
        source: gltf::Error,
    },
    #[error("could not load buffers of {identifier:?}: {source}")]
    BufferLoad {
        identifier: String,
        #[source]
        source: BufferError,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl Error {
    #[inline]
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

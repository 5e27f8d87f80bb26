//! Repository layer for file persistence.
//!
//! Every save is a whole-file rewrite through a temporary file in the
//! target directory followed by an atomic rename, so readers only ever see
//! a complete snapshot.

mod annotated;
mod atomic;
mod records;
mod store;
mod writer;

use std::path::PathBuf;

use thiserror::Error;

pub use annotated::AnnotatedRepository;
pub use atomic::write_atomic;
pub use records::RecordStream;
pub use store::AnnotationStore;
pub use writer::{Commit, PersistenceWriter};

/// Errors raised while loading or saving annotation files.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RepositoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

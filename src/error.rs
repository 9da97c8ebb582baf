use std::path::PathBuf;

use crate::ObjectId;

/// error type for gitpeek operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no git directory found from {0}")]
    NoRepo(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("malformed HEAD target: {0}")]
    MalformedRef(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("zlib inflate failed for {path}: {source}")]
    Inflate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tree payload: {0}")]
    MalformedTree(String),

    #[error("tree entry references missing object {0}")]
    MissingChild(ObjectId),

    #[error("not a tree object: {0}")]
    NotATree(ObjectId),

    #[error("object payload is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}

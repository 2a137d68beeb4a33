//! Error types shared by the resolver, loader and folder server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for library operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure reported by a [`SourceReader`](crate::source::SourceReader).
///
/// "Not found" is kept apart from every other I/O failure because the
/// path resolver only falls back to `index.md` on a missing file.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReadError {
    /// Classify an I/O error raised while reading `path`
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => ReadError::NotFound(path),
            _ => ReadError::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ReadError::NotFound(_))
    }
}

/// Errors surfaced to callers of the folder server and file loaders
#[derive(Error, Debug)]
pub enum Error {
    /// No page exists for the request. Also raised for URL paths that break
    /// the trailing-slash convention, so an HTTP layer can answer 404.
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to enumerate files: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("file enumeration task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn not_found(path: impl Into<String>) -> Self {
        Error::NotFound { path: path.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::NotFound(path) => Error::NotFound {
                path: path.display().to_string(),
            },
            ReadError::Io { path, source } => Error::Io { path, source },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound { path } => {
                tracing::debug!("Not found: {}", path);
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            e => {
                tracing::error!("Failed to serve page: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }
}

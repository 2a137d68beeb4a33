//! Text sources for markdown documents

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{ReadError, Result};

/// Reads document text from a path.
///
/// Implementations must report a missing file as [`ReadError::NotFound`];
/// the path resolver relies on it to decide whether to try `index.md`.
pub trait SourceReader: Send + Sync {
    fn read(&self, path: &Path) -> impl Future<Output = Result<String, ReadError>> + Send;
}

/// Reads from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    async fn read(&self, path: &Path) -> Result<String, ReadError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReadError::from_io(path, e))
    }
}

/// Expand a glob pattern to the files it matches, in glob order
pub async fn glob_files(pattern: String) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    })
    .await?
}

//! URL path to source file resolution
//!
//! A page at `/foo/` is backed by `<root>/foo.md` or, when that file does
//! not exist, by `<root>/foo/index.md`. The site root `/` is `<root>/index.md`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::source::SourceReader;

/// Files that may back a URL path, in the order they are tried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub primary: PathBuf,
    /// Only tried when `primary` does not exist
    pub fallback: Option<PathBuf>,
}

impl Candidates {
    /// Map a URL path to its candidate files.
    ///
    /// Fails with [`Error::NotFound`] when `url_path` lacks the trailing slash
    /// or contains a `..` segment.
    pub fn for_url(root: &Path, url_path: &str) -> Result<Self> {
        let Some(trimmed) = url_path.strip_suffix('/') else {
            return Err(Error::not_found(url_path));
        };
        if trimmed.split('/').any(|segment| segment == "..") {
            return Err(Error::not_found(url_path));
        }

        if trimmed.is_empty() {
            return Ok(Self {
                primary: join(root, "/index.md"),
                fallback: None,
            });
        }

        let path = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };

        Ok(Self {
            primary: join(root, &format!("{}.md", path)),
            fallback: Some(join(root, &format!("{}/index.md", path))),
        })
    }
}

/// Read the source text backing `url_path`.
///
/// Only a missing primary file triggers the `index.md` attempt; any other
/// read error is returned as is.
pub async fn resolve<R: SourceReader>(reader: &R, root: &Path, url_path: &str) -> Result<String> {
    let Candidates { primary, fallback } = Candidates::for_url(root, url_path)?;

    match (reader.read(&primary).await, fallback) {
        (Ok(text), _) => {
            tracing::debug!("Resolved {} to {:?}", url_path, primary);
            Ok(text)
        }
        (Err(e), Some(fallback)) if e.is_not_found() => {
            let text = reader.read(&fallback).await?;
            tracing::debug!("Resolved {} to {:?}", url_path, fallback);
            Ok(text)
        }
        (Err(e), _) => Err(e.into()),
    }
}

/// Append a path string to the root without normalizing either side
fn join(root: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(root.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

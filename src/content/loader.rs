//! Content loader - reads markdown files from disk and converts them

use futures::future::try_join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{Converted, Converter, Meta};
use crate::error::{Error, Result};
use crate::html::SafeHtml;
use crate::source::{glob_files, FsReader, SourceReader};

/// A converted document together with the file it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkdownFile {
    pub path: PathBuf,
    pub content: SafeHtml,
    pub meta: Meta,
}

/// Read and convert a single markdown file
pub async fn read_markdown_file<C>(path: impl AsRef<Path>, converter: &C) -> Result<Converted>
where
    C: Converter + ?Sized,
{
    let path = path.as_ref();
    let text = FsReader.read(path).await?;
    tracing::debug!("Loaded {:?}", path);
    Ok(converter.convert(&text))
}

/// Read and convert every file matching a glob pattern.
///
/// Reads run concurrently; the result keeps glob order. The first failing
/// read fails the whole batch.
pub async fn read_markdown_files<C>(pattern: &str, converter: &C) -> Result<Vec<MarkdownFile>>
where
    C: Converter + ?Sized,
{
    let paths = glob_files(pattern.to_string()).await?;
    tracing::debug!("Pattern {} matched {} files", pattern, paths.len());

    try_join_all(paths.into_iter().map(|path| async move {
        let Converted { content, meta } = read_markdown_file(&path, converter).await?;
        Ok::<_, Error>(MarkdownFile {
            path,
            content,
            meta,
        })
    }))
    .await
}

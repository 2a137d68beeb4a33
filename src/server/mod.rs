//! Folder server - serves a directory of markdown files as pages
//!
//! [`MarkdownFolder`] resolves request paths to markdown files, converts
//! them, and hands the result to a caller-supplied render callback. It does
//! not shape responses itself.

mod paths;
mod resolve;

pub use paths::{list_static_paths, url_path_for};
pub use resolve::{resolve, Candidates};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    Router,
};
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::content::{Converted, Converter, MarkdownRenderer};
use crate::error::{Error, Result};
use crate::source::{FsReader, SourceReader};

/// Options for [`serve_markdown_folder`]
pub struct FolderOptions<C = MarkdownRenderer> {
    /// Directory holding the markdown files
    pub root: PathBuf,
    pub converter: C,
}

impl FolderOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            converter: MarkdownRenderer::new(),
        }
    }
}

impl<C: Converter> FolderOptions<C> {
    /// Replace the default markdown converter
    pub fn converter<C2: Converter>(self, converter: C2) -> FolderOptions<C2> {
        FolderOptions {
            root: self.root,
            converter,
        }
    }
}

/// Build a folder server that passes each converted page to `render`
pub fn serve_markdown_folder<C, F>(options: FolderOptions<C>, render: F) -> MarkdownFolder<F, C>
where
    C: Converter,
{
    MarkdownFolder {
        root: options.root,
        converter: options.converter,
        reader: FsReader,
        render,
    }
}

/// Markdown folder request handler
pub struct MarkdownFolder<F, C = MarkdownRenderer, R = FsReader> {
    root: PathBuf,
    converter: C,
    reader: R,
    render: F,
}

impl<F, C, R> MarkdownFolder<F, C, R>
where
    C: Converter,
    R: SourceReader,
{
    /// Read files through a different source
    pub fn with_reader<R2: SourceReader>(self, reader: R2) -> MarkdownFolder<F, C, R2> {
        MarkdownFolder {
            root: self.root,
            converter: self.converter,
            reader,
            render: self.render,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve and convert the page at `url_path`
    pub async fn convert_path(&self, url_path: &str) -> Result<Converted> {
        let text = resolve(&self.reader, &self.root, url_path).await?;
        Ok(self.converter.convert(&text))
    }

    /// Every URL path this folder can serve, with its backing file
    pub async fn list_static_paths(&self) -> Result<IndexMap<String, PathBuf>> {
        list_static_paths(&self.root).await
    }
}

impl<F, Fut, C, R> MarkdownFolder<F, C, R>
where
    F: Fn(Converted, Request<Body>) -> Fut,
    Fut: Future,
    C: Converter,
    R: SourceReader,
{
    /// Convert the page for `request` and return what the render callback produces
    pub async fn handle(&self, request: Request<Body>) -> Result<Fut::Output> {
        let url_path = request_path(&request)?;
        let doc = self.convert_path(&url_path).await?;
        Ok((self.render)(doc, request).await)
    }
}

impl<F, Fut, C, R> MarkdownFolder<F, C, R>
where
    F: Fn(Converted, Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
    C: Converter + 'static,
    R: SourceReader + 'static,
{
    /// Serve every request through this folder.
    ///
    /// Missing pages answer 404 and other failures 500.
    pub fn router(self) -> Router {
        Router::new()
            .fallback(folder_handler::<F, Fut, C, R>)
            .with_state(Arc::new(self))
    }
}

async fn folder_handler<F, Fut, C, R>(
    State(folder): State<Arc<MarkdownFolder<F, C, R>>>,
    request: Request<Body>,
) -> Response
where
    F: Fn(Converted, Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoResponse,
    C: Converter + 'static,
    R: SourceReader + 'static,
{
    match folder.handle(request).await {
        Ok(response) => response.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Percent-decoded URL path of a request
fn request_path(request: &Request<Body>) -> Result<String> {
    let raw = request.uri().path();
    percent_decode_str(raw)
        .decode_utf8()
        .map(|path| path.into_owned())
        .map_err(|_| Error::not_found(raw))
}

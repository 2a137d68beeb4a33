//! Development server over the source folder

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::Converted;
use crate::error::Error;
use crate::server::serve_markdown_folder;
use crate::Site;

/// Build the app: markdown pages for directory-style URLs, static files otherwise.
///
/// Markdown sources are never served raw.
pub fn app(site: &Site) -> Router {
    let layout = site.layout();
    let folder = Arc::new(serve_markdown_folder(
        site.folder_options(),
        move |doc: Converted, _request: Request<Body>| {
            let page = layout.render(&doc);
            async move { Html(page) }
        },
    ));
    let assets = ServeDir::new(&site.source_dir);

    Router::new()
        .fallback(move |request: Request<Body>| {
            let folder = Arc::clone(&folder);
            let mut assets = assets.clone();
            async move {
                let path = request.uri().path();
                if path.ends_with('/') {
                    return match folder.handle(request).await {
                        Ok(page) => page.into_response(),
                        Err(e) => e.into_response(),
                    };
                }
                if let Some(target) = directory_redirect(path) {
                    return Redirect::permanent(&target).into_response();
                }
                if is_markdown_source(path) {
                    return Error::not_found(path).into_response();
                }
                match assets.try_call(request).await {
                    Ok(response) => response.into_response(),
                    Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
                }
            }
        })
        .layer(TraceLayer::new_for_http())
}

/// `/about` redirects to `/about/`; paths with a file extension do not
fn directory_redirect(path: &str) -> Option<String> {
    let last = path.rsplit('/').next().unwrap_or_default();
    if last.is_empty() || last.contains('.') {
        return None;
    }
    Some(format!("{}/", path))
}

fn is_markdown_source(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(".md"))
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let app = app(site);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving {:?} at http://{}:{}", site.source_dir, ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

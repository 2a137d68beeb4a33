//! Static path enumeration for pre-rendering

use indexmap::IndexMap;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::source::glob_files;

/// List every servable URL path under `root` with its backing file.
///
/// Scans `<root>/**/*.md` on every call. When both `foo.md` and
/// `foo/index.md` exist, `/foo/` maps to `foo.md`, matching the resolver.
pub async fn list_static_paths(root: &Path) -> Result<IndexMap<String, PathBuf>> {
    let pattern = format!(
        "{}/**/*.md",
        glob::Pattern::escape(&root.to_string_lossy())
    );
    let files = glob_files(pattern).await?;

    let mut paths = IndexMap::new();
    for file in files {
        let Some(url_path) = url_path_for(root, &file) else {
            tracing::debug!("Skipping {:?}", file);
            continue;
        };
        if is_index(&file) {
            paths.entry(url_path).or_insert(file);
        } else {
            paths.insert(url_path, file);
        }
    }

    tracing::debug!("Found {} static paths under {:?}", paths.len(), root);
    Ok(paths)
}

/// Derive the public URL path for a markdown file under `root`.
///
/// `a/b/index.md` and `a/b.md` both become `/a/b/`. A file named just
/// `.md` has no page name and yields `None`.
pub fn url_path_for(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let segments = relative
        .components()
        .map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    if segments.last() == Some(&".md") {
        return None;
    }
    let public = format!("/{}", segments.join("/"));

    if let Some(parent) = public.strip_suffix("/index.md") {
        Some(format!("{}/", parent))
    } else {
        public.strip_suffix(".md").map(|stem| format!("{}/", stem))
    }
}

fn is_index(file: &Path) -> bool {
    file.file_name().is_some_and(|name| name == "index.md")
}

//! Pre-render every page of a site to static HTML

use anyhow::Result;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};

use crate::content::read_markdown_file;
use crate::server::list_static_paths;
use crate::Site;

/// Write `<public_dir>/<url path>/index.html` for every page, returning the page count
pub async fn run(site: &Site) -> Result<usize> {
    let start = std::time::Instant::now();

    let paths = list_static_paths(&site.source_dir).await?;
    tracing::info!("Found {} pages in {:?}", paths.len(), site.source_dir);

    let renderer = site.renderer();
    let layout = site.layout();

    let pages = try_join_all(paths.iter().map(|(url_path, file)| {
        let renderer = &renderer;
        async move {
            let doc = read_markdown_file(file, renderer).await?;
            Ok::<_, crate::Error>((url_path, doc))
        }
    }))
    .await?;

    for (url_path, doc) in &pages {
        let output = output_path(&site.public_dir, url_path);
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&output, layout.render(doc)).await?;
        tracing::debug!("Wrote {} to {:?}", url_path, output);
    }

    let duration = start.elapsed();
    tracing::info!(
        "Built {} pages in {:.2}s",
        pages.len(),
        duration.as_secs_f64()
    );

    Ok(pages.len())
}

/// Output file for a URL path
fn output_path(public_dir: &Path, url_path: &str) -> PathBuf {
    public_dir
        .join(url_path.trim_matches('/'))
        .join("index.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_output_path() {
        let public = Path::new("public");
        assert_eq!(output_path(public, "/"), PathBuf::from("public/index.html"));
        assert_eq!(
            output_path(public, "/blog/hello/"),
            PathBuf::from("public/blog/hello/index.html")
        );
    }

    #[tokio::test]
    async fn test_build_site() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        fs::create_dir_all(site.source_dir.join("blog/post")).unwrap();
        fs::write(site.source_dir.join("index.md"), "---\ntitle: Home\n---\nWelcome").unwrap();
        fs::write(site.source_dir.join("about.md"), "About *me*").unwrap();
        fs::write(site.source_dir.join("blog/post/index.md"), "# Post").unwrap();

        let count = run(&site).await.unwrap();
        assert_eq!(count, 3);

        let home = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(home.contains("<title>Home | mdfolder</title>"));
        assert!(home.contains("<p>Welcome</p>"));

        let about = fs::read_to_string(site.public_dir.join("about/index.html")).unwrap();
        assert!(about.contains("<p>About <em>me</em></p>"));

        let post = fs::read_to_string(site.public_dir.join("blog/post/index.html")).unwrap();
        assert!(post.contains("<h1>Post</h1>"));
    }
}

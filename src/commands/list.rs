//! List the pages a site can serve

use anyhow::Result;
use std::fmt::Write;

use crate::server::list_static_paths;
use crate::Site;

/// Print every URL path with its backing file
pub async fn run(site: &Site) -> Result<()> {
    print!("{}", listing(site).await?);
    Ok(())
}

async fn listing(site: &Site) -> Result<String> {
    let paths = list_static_paths(&site.source_dir).await?;

    let mut out = String::new();
    writeln!(out, "Pages ({}):", paths.len())?;
    for (url_path, file) in &paths {
        let source = file.strip_prefix(&site.source_dir).unwrap_or(file);
        writeln!(out, "  {} [{}]", url_path, source.display())?;
    }

    Ok(out)
}

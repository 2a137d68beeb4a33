//! Render a single markdown file to stdout

use anyhow::Result;
use std::path::Path;

use crate::content::read_markdown_file;
use crate::Site;

/// Print the rendered HTML, or the whole document as JSON
pub async fn run(site: &Site, file: &Path, json: bool) -> Result<()> {
    println!("{}", output(site, file, json).await?);
    Ok(())
}

async fn output(site: &Site, file: &Path, json: bool) -> Result<String> {
    let doc = read_markdown_file(file, &site.renderer()).await?;

    if json {
        Ok(serde_json::to_string_pretty(&doc)?)
    } else {
        Ok(doc.content.into_string())
    }
}

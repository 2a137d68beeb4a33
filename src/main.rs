//! CLI entry point for mdfolder

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdfolder")]
#[command(version)]
#[command(about = "Render folders of markdown with YAML front-matter into HTML", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single markdown file to stdout
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Print content and metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every page the source folder serves
    #[command(alias = "ls")]
    List,

    /// Pre-render every page to the public folder
    #[command(alias = "b")]
    Build,

    /// Serve the source folder over HTTP
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdfolder=debug,info"
    } else {
        "mdfolder=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Render { file, json } => {
            let site = mdfolder::Site::new(&base_dir)?;
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            mdfolder::commands::render::run(&site, &file, json).await?;
        }

        Commands::List => {
            let site = mdfolder::Site::new(&base_dir)?;
            mdfolder::commands::list::run(&site).await?;
        }

        Commands::Build => {
            let site = mdfolder::Site::new(&base_dir)?;
            tracing::info!("Building static pages...");
            let count = mdfolder::commands::build::run(&site).await?;
            println!("Built {} pages into {:?}", count, site.public_dir);
        }

        Commands::Serve { port, ip } => {
            let site = mdfolder::Site::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            mdfolder::commands::serve::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = mdfolder::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            mdfolder::commands::clean::run(&site)?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("mdfolder version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

mod build;
mod config;
mod error;
mod file_ops;
mod images;
mod indexer;
mod natural_sort;
mod normalize;
mod rename;
mod render;
mod serve;
mod splice;
mod utils;

use clap::{Parser, Subcommand};
use config::Config;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(name = "vitrine")]
#[clap(about = "Maintenance tools for a static image catalog", long_about = None)]
struct Cli {
    /// Catalog root (defaults to the current directory)
    #[clap(long, global = true, default_value = ".")]
    root: PathBuf,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the catalog page from the image folders
    Build,
    /// Repair garbled accented characters in file and folder names
    Rename {
        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
        /// Only show what would be renamed
        #[clap(long)]
        dry_run: bool,
    },
    /// Generate missing thumbnails
    Thumbs {
        /// Regenerate thumbnails that already exist
        #[clap(long)]
        force: bool,
    },
    /// Serve the catalog for local preview
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !cli.root.is_dir() {
        return Err(format!("Catalog root is not a directory: {}", cli.root.display()).into());
    }
    let config = Config::load(&cli.root)?;

    match cli.command {
        Commands::Build => {
            build::build(&cli.root, &config)?;
        }
        Commands::Rename { yes, dry_run } => {
            rename::rename(&cli.root, &config.rename, yes, dry_run)?;
        }
        Commands::Thumbs { force } => {
            images::generate_thumbnails(&cli.root, &config, force)?;
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            serve::serve(cli.root, config, port).await?;
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tgstickers_infrastructure::{
    ConfigService, FileOwnedPacksRepository, FilePackCacheRepository, StickersPaths,
};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "tgstickers")]
#[command(about = "Inspect and manage the local sticker pack cache", long_about = None)]
struct Cli {
    /// Keep config, cache and logs under this directory instead of the platform defaults
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show where configuration, cache and logs are stored
    Paths,
    /// Inspect the sticker pack cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached packs
    List,
    /// Show a cached pack and its media files
    Show { short_name: String },
    /// Show the cached list of packs owned by the signed-in account
    Owned,
    /// Remove a pack and its media from the cache
    Remove { short_name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = StickersPaths::new(cli.base_dir.as_deref());
    let config = ConfigService::new(&paths)?.load_or_init().await?;
    let _log_guard = logging::init(&config.log_level, &paths.logs_dir()?)?;

    tracing::debug!("Using configuration {:?}", config);
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Paths => commands::paths::show(&paths, &config, &mut out)?,
        Commands::Cache { action } => {
            let cache = FilePackCacheRepository::new(&paths, &config)?;
            match action {
                CacheAction::List => commands::cache::list(&cache, &mut out).await?,
                CacheAction::Show { short_name } => {
                    commands::cache::show(&cache, &short_name, &mut out).await?
                }
                CacheAction::Owned => {
                    let owned = FileOwnedPacksRepository::new(&paths)?;
                    commands::cache::owned(&owned, &mut out).await?
                }
                CacheAction::Remove { short_name } => {
                    commands::cache::remove(&cache, &short_name, &mut out).await?
                }
            }
        }
    }

    Ok(())
}

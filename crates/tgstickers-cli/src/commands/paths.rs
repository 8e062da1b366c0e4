use std::io::Write;

use anyhow::Result;
use tgstickers_core::config::StickersConfig;
use tgstickers_infrastructure::StickersPaths;

pub fn show(paths: &StickersPaths, config: &StickersConfig, out: &mut impl Write) -> Result<()> {
    let cache_dir = match &config.cache_dir {
        Some(dir) => dir.clone(),
        None => paths.cache_dir()?,
    };

    writeln!(out, "config: {}", paths.config_file()?.display())?;
    writeln!(out, "cache:  {}", cache_dir.display())?;
    writeln!(out, "owned:  {}", paths.owned_packs_file()?.display())?;
    writeln!(out, "logs:   {}", paths.logs_dir()?.display())?;
    Ok(())
}

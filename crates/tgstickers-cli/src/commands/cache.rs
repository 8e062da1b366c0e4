use std::io::Write;

use anyhow::Result;
use tgstickers_core::sticker::{OwnedPacksRepository, PackCacheRepository};

pub async fn list(cache: &dyn PackCacheRepository, out: &mut impl Write) -> Result<()> {
    let short_names = cache.list_short_names().await?;
    if short_names.is_empty() {
        writeln!(out, "No cached sticker packs")?;
        return Ok(());
    }

    for short_name in short_names {
        match cache.load(&short_name).await {
            Ok(pack) => writeln!(
                out,
                "{:<32} {:>4} stickers  {}{}",
                pack.short_name,
                pack.stickers.len(),
                pack.title,
                if pack.is_animated { " (animated)" } else { "" }
            )?,
            Err(e) => {
                tracing::warn!("Skipping unreadable cache entry '{}': {}", short_name, e);
                writeln!(out, "{:<32} unreadable: {}", short_name, e)?;
            }
        }
    }
    Ok(())
}

pub async fn show(
    cache: &dyn PackCacheRepository,
    short_name: &str,
    out: &mut impl Write,
) -> Result<()> {
    let pack = cache.load(short_name).await?;
    let dir = cache.media_dir(short_name);

    writeln!(out, "{} ({})", pack.title, pack.short_name)?;
    writeln!(out, "id:        {}", pack.id)?;
    writeln!(out, "stickers:  {}", pack.stickers.len())?;
    writeln!(out, "animated:  {}", pack.is_animated)?;
    match pack.thumbnail_file_name() {
        Some(name) => writeln!(out, "thumbnail: {}", dir.join(name).display())?,
        None => writeln!(out, "thumbnail: none")?,
    }

    for sticker in &pack.stickers {
        let file_name = sticker.cache_file_name();
        let state = if dir.join(&file_name).exists() {
            "cached"
        } else {
            "missing"
        };
        writeln!(out, "  {:<28} {:<8} {}", file_name, state, sticker.emojis)?;
    }
    Ok(())
}

pub async fn owned(owned: &dyn OwnedPacksRepository, out: &mut impl Write) -> Result<()> {
    match owned.load().await? {
        Some(list) => {
            writeln!(out, "Updated {}", list.updated_at.to_rfc3339())?;
            for short_name in list.short_names {
                writeln!(out, "{}", short_name)?;
            }
        }
        None => writeln!(out, "Owned packs have not been fetched yet")?,
    }
    Ok(())
}

pub async fn remove(
    cache: &dyn PackCacheRepository,
    short_name: &str,
    out: &mut impl Write,
) -> Result<()> {
    if !cache.contains(short_name).await? {
        writeln!(out, "'{}' is not cached", short_name)?;
        return Ok(());
    }
    cache.delete(short_name).await?;
    writeln!(out, "Removed '{}'", short_name)?;
    Ok(())
}

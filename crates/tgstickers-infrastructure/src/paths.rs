//! Unified path management for tgstickers files.
//!
//! Platform directories are resolved via AppPaths from the version-migrate
//! crate. Every path can be redirected under a single base directory, which
//! tests and portable installs use.

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// The things tgstickers keeps on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// `config.toml`
    Config,
    /// Root of the per-pack cache directories.
    Cache,
    /// Per-user files such as the owned pack list.
    User,
    /// Rolling log files.
    Logs,
}

/// A resolved path, tagged with whether it names a file or a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathType {
    File(PathBuf),
    Dir(PathBuf),
}

impl PathType {
    pub fn into_path_buf(self) -> PathBuf {
        match self {
            PathType::File(p) | PathType::Dir(p) => p,
        }
    }
}

/// Path resolution for tgstickers.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/tgstickers/          # Config directory (AppPaths default)
/// ├── config.toml                # Application configuration
/// └── logs/                      # Application logs
///     └── tgstickers.log.YYYY-MM-DD
///
/// ~/.local/share/tgstickers/     # Data directory
/// ├── cache/                     # One directory per pack short-name
/// │   └── <short_name>/
/// │       ├── <short_name>.json
/// │       ├── <document_id>.<ext>
/// │       └── thumb.<ext>
/// └── user/
///     └── owned_packs.json
/// ```
///
/// With a base directory, `config.toml` and `logs/` live directly under it
/// alongside `cache/` and `user/`.
#[derive(Debug, Clone, Default)]
pub struct StickersPaths {
    base_dir: Option<PathBuf>,
}

impl StickersPaths {
    const APP_NAME: &'static str = "tgstickers";
    const CONFIG_FILENAME: &'static str = "config.toml";
    const OWNED_PACKS_FILENAME: &'static str = "owned_packs.json";

    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new(Self::APP_NAME)
    }

    /// Returns the configuration directory (e.g. `~/.config/tgstickers/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/tgstickers/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .data_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    /// Resolves the location of a service's file or directory.
    pub fn get_path(&self, service: ServiceType) -> Result<PathType, PathError> {
        Ok(match service {
            ServiceType::Config => PathType::File(self.config_dir()?.join(Self::CONFIG_FILENAME)),
            ServiceType::Cache => PathType::Dir(self.data_dir()?.join("cache")),
            ServiceType::User => PathType::Dir(self.data_dir()?.join("user")),
            ServiceType::Logs => PathType::Dir(self.config_dir()?.join("logs")),
        })
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.get_path(ServiceType::Config)?.into_path_buf())
    }

    pub fn cache_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.get_path(ServiceType::Cache)?.into_path_buf())
    }

    pub fn user_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.get_path(ServiceType::User)?.into_path_buf())
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.get_path(ServiceType::Logs)?.into_path_buf())
    }

    /// The fixed per-user file holding the owned pack list.
    pub fn owned_packs_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.user_dir()?.join(Self::OWNED_PACKS_FILENAME))
    }
}

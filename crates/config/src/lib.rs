//! Configuration and data locations for the grind tools
//!
//! Two directories are shared by every grind binary:
//! - the config directory (`~/.config/grind/`), holding session credentials
//!   and settings as JSON
//! - the data directory (`~/.local/share/grind/`), holding the record database
//!
//! Either can be relocated with `GRIND_CONFIG_DIR` / `GRIND_DATA_DIR`, which
//! is how tests and throwaway runs keep away from the real profile.
//!
//! Call [`init`] at application startup to bootstrap the config directory.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the directory under the platform config and data dirs
const APP_DIR: &str = "grind";

const CONFIG_DIR_ENV: &str = "GRIND_CONFIG_DIR";
const DATA_DIR_ENV: &str = "GRIND_DATA_DIR";

/// Which of the two grind directories to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Config,
    Data,
}

impl Location {
    fn env_var(self) -> &'static str {
        match self {
            Location::Config => CONFIG_DIR_ENV,
            Location::Data => DATA_DIR_ENV,
        }
    }

    fn platform_base(self) -> Option<PathBuf> {
        match self {
            Location::Config => dirs::config_dir(),
            Location::Data => dirs::data_dir(),
        }
    }

    /// Resolve the directory, honoring the environment override
    pub fn dir(self) -> Option<PathBuf> {
        resolve_dir(std::env::var_os(self.env_var()), self.platform_base())
    }

    /// Resolve the directory and create it if missing
    pub fn ensure(self) -> Result<PathBuf> {
        let dir = self
            .dir()
            .with_context(|| format!("Could not determine {:?} directory", self))?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        Ok(dir)
    }
}

/// A non-empty override wins; otherwise `<base>/grind`
fn resolve_dir(override_dir: Option<OsString>, base: Option<PathBuf>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => base.map(|p| p.join(APP_DIR)),
    }
}

/// Initialize the grind config directory.
///
/// Call this once at application startup.
pub fn init() -> Result<PathBuf> {
    ensure_config_dir()
}

/// Get the grind config directory
pub fn config_dir() -> Option<PathBuf> {
    Location::Config.dir()
}

/// Get the path to a file within the grind config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Get the grind data directory, where the record database lives
pub fn data_dir() -> Option<PathBuf> {
    Location::Data.dir()
}

/// Check if a config file exists in the grind config directory
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.exists())
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    Location::Config.ensure()
}

pub fn ensure_data_dir() -> Result<PathBuf> {
    Location::Data.ensure()
}

/// Load and parse a JSON file from the grind config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    load_json_file(&path)
}

/// Load a JSON file from the config directory, or `T::default()` when absent
///
/// A file that exists but fails to parse is still an error.
pub fn load_json_or_default<T: DeserializeOwned + Default>(filename: &str) -> Result<T> {
    match config_path(filename) {
        Some(path) => load_json_file_or_default(&path),
        None => Ok(T::default()),
    }
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn load_json_file_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.exists() {
        load_json_file(path)
    } else {
        Ok(T::default())
    }
}

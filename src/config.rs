//! Configuration loaded from `payq/config.toml` in the user config dir.

use crate::error::{Error, Result};
use crate::merge::DEFAULT_MERGE_PALETTE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config/data dirs.
const APP_DIR: &str = "payq";

/// Filename for configuration.
const CONFIG_FILE: &str = "config.toml";

/// payq configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON file backing the payment request store
    pub store_path: PathBuf,
    /// JSON file holding the editing session
    pub session_path: PathBuf,
    /// Colors cycled through for merge groups
    pub merge_palette: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map_or_else(|| PathBuf::from("."), |d| d.join(APP_DIR));
        Self {
            store_path: data_dir.join("payq-requests.json"),
            session_path: data_dir.join("payq-session.json"),
            merge_palette: DEFAULT_MERGE_PALETTE.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Default config file location, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// Load configuration from `path`.
///
/// Returns defaults if the file doesn't exist. An empty palette is
/// rejected.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    if config.merge_palette.is_empty() {
        return Err(Error::Config(format!(
            "{}: merge_palette must list at least one color",
            path.display()
        )));
    }

    Ok(config)
}

/// Save configuration to `path`.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| Error::Config(format!("failed to create {}: {e}", dir.display())))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize config: {e}")))?;

    let content_with_header = format!("# payq configuration\n\n{content}");

    fs::write(path, content_with_header)
        .map_err(|e| Error::Config(format!("failed to write {}: {e}", path.display())))
}

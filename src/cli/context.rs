//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by every command that touches the
//! session or the store.

use payq::config::{Config, default_config_path, load_config};
use payq::error::{Error, Result};
use payq::merge::MergeCoordinator;
use payq::session::{load_session, save_session};
use payq::store::FileStore;
use std::path::{Path, PathBuf};

/// Shared context for CLI commands
///
/// This struct encapsulates the common setup:
/// - Loading configuration
/// - Loading the session into a coordinator
/// - Opening the request store
pub struct CommandContext {
    /// Effective configuration
    pub config: Config,
    /// Where the session is read from and saved to
    pub session_path: PathBuf,
    /// Coordinator owning the session's items
    pub coordinator: MergeCoordinator,
    /// Request store
    pub store: FileStore,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// `config_path` overrides the default config location and
    /// `session_path` overrides the configured session file.
    pub fn new(config_path: Option<&Path>, session_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => load_config(path)?,
            None => match default_config_path() {
                Some(path) => load_config(&path)?,
                None => Config::default(),
            },
        };

        let session_path = session_path.map_or_else(|| config.session_path.clone(), Path::to_path_buf);
        let items = load_session(&session_path)?;
        let coordinator = MergeCoordinator::with_palette(items, config.merge_palette.clone());
        let store = FileStore::new(config.store_path.clone());

        Ok(Self {
            config,
            session_path,
            coordinator,
            store,
        })
    }

    /// Persist the coordinator's current items to the session file
    pub fn save(&self) -> Result<()> {
        save_session(&self.session_path, &self.coordinator.items())
    }

    /// Fail unless the session has items
    pub fn require_items(&self) -> Result<()> {
        if self.coordinator.items().is_empty() {
            return Err(Error::Session(format!(
                "no payment items in {}",
                self.session_path.display()
            )));
        }
        Ok(())
    }
}

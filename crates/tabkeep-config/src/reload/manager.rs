//! Core reload manager implementation.

use crate::schema::TabkeepConfig;
use crate::toml_loader;
use crate::validation;
use crate::watcher;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Manages live config reloading.
///
/// Watches the config file for changes and publishes new configs
/// via a [`tokio::sync::watch`] channel.
pub struct ReloadManager {
    config_path: PathBuf,
}

impl ReloadManager {
    /// Load the initial config from `config_path` and start watching it.
    ///
    /// Returns the initial config and a receiver that observes every
    /// successfully reloaded config. Load failures fall back to defaults.
    pub async fn start(config_path: PathBuf) -> (TabkeepConfig, watch::Receiver<TabkeepConfig>) {
        let initial_config = match toml_loader::load_from_path(&config_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to load config: {e}, using defaults");
                TabkeepConfig::default()
            }
        };

        let (config_tx, config_rx) = watch::channel(initial_config.clone());

        tokio::spawn(async move {
            let manager = ReloadManager { config_path };
            manager.run_watch_loop(config_tx).await;
        });

        (initial_config, config_rx)
    }

    async fn run_watch_loop(&self, config_tx: watch::Sender<TabkeepConfig>) {
        let mut changes = match watcher::watch_debounced(&self.config_path) {
            Ok(rx) => rx,
            Err(e) => {
                error!("failed to start config watcher: {e}");
                return;
            }
        };

        while changes.recv().await.is_some() {
            info!("reloading config from {}", self.config_path.display());
            match self.reload_config() {
                Ok(config) => {
                    if config_tx.send(config).is_err() {
                        info!("all config receivers dropped, stopping reload manager");
                        break;
                    }
                }
                Err(e) => warn!("config reload failed: {e}"),
            }
        }
    }

    fn reload_config(&self) -> Result<TabkeepConfig, tabkeep_common::ConfigError> {
        let config = toml_loader::load_from_path(&self.config_path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

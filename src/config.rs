//! Layered settings: defaults, then a TOML file, then `SITEWATCH_*`
//! environment variables. Command line flags are applied on top by the
//! binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::DEFAULT_WINDOW;

/// Base URL of the monitor API when none is configured.
pub const DEFAULT_STORE_URL: &str = "http://localhost:3001";

/// Config file looked up in the working directory (`sitewatch.toml`, ...).
pub const DEFAULT_CONFIG_NAME: &str = "sitewatch";

const ENV_PREFIX: &str = "SITEWATCH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub store: StoreSettings,
    /// Records kept per history window.
    pub history_limit: usize,
    /// Seconds between refreshes in watch mode.
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreSettings {
    pub url: String,
    /// Session token sent as a bearer token.
    pub token: Option<String>,
    /// Use a JSON file instead of the monitor API.
    pub file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl StoreSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Load settings from `path`, or from `sitewatch.toml` in the working
    /// directory if it exists, plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load) but reads environment variables from `env`
    /// instead of the process when given.
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("store.url", DEFAULT_STORE_URL)?
            .set_default("store.timeout_secs", 10)?
            .set_default("history_limit", DEFAULT_WINDOW as u64)?
            .set_default("refresh_secs", 30)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            bail!("history_limit must be positive");
        }
        if self.refresh_secs == 0 {
            bail!("refresh_secs must be positive");
        }
        if self.store.timeout_secs == 0 {
            bail!("store.timeout_secs must be positive");
        }
        Ok(())
    }
}

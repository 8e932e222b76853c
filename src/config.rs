//! Service configuration
//!
//! Values are layered: built-in defaults, then an optional config file, then
//! environment variables prefixed with `ORDER_LIFECYCLE_` (for example
//! `ORDER_LIFECYCLE_DB_PATH=/var/lib/orders`).
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "ORDER_LIFECYCLE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    pub db_path: PathBuf,
    /// Delete the database when the last handle is dropped
    pub temporary: bool,
    /// Page cache size in bytes
    pub cache_capacity: u64,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data/orders.db"),
            temporary: false,
            cache_capacity: 64 * 1024 * 1024,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load from the environment only.
    pub fn load() -> anyhow::Result<Self> {
        Self::build(None)
    }

    /// Load with `path` as the file layer. A missing file is not an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::build(Some(path))
    }

    fn build(path: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("db_path", defaults.db_path.to_string_lossy().to_string())?
            .set_default("temporary", defaults.temporary)?
            .set_default("cache_capacity", defaults.cache_capacity as i64)?
            .set_default("log_filter", defaults.log_filter)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn open_db(&self) -> sled::Result<sled::Db> {
        sled::Config::new()
            .path(&self.db_path)
            .temporary(self.temporary)
            .cache_capacity(self.cache_capacity)
            .open()
    }
}

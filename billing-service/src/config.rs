use std::{fs, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::readings::ReadingPolicy;

pub const CONFIG_ENV: &str = "BILLING_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "billing-config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub page_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            page_path: PathBuf::from("views/user.html"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("test_user.db"),
            max_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReadingsConfig {
    pub policy: ReadingPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub readings: ReadingsConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from `$BILLING_CONFIG`, or `billing-config.toml` when unset.
    ///
    /// A missing default file yields the built-in defaults; a file named
    /// explicitly through the environment must exist.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path),
            Err(_) if fs::metadata(DEFAULT_CONFIG_PATH).is_ok() => {
                Self::from_file(DEFAULT_CONFIG_PATH)
            }
            Err(_) => {
                tracing::info!("no {DEFAULT_CONFIG_PATH} found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("parsing config file {path}"))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();

        assert_eq!(cfg.server.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.server.page_path, PathBuf::from("views/user.html"));
        assert_eq!(cfg.storage.database_path, PathBuf::from("test_user.db"));
        assert_eq!(cfg.storage.max_connections, 1);
        assert_eq!(cfg.readings.policy, ReadingPolicy::PassThrough);
        assert!(cfg.metrics.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            bind_addr = "127.0.0.1:8080"

            [storage]
            database_path = "/var/lib/billing/records.db"

            [readings]
            policy = "strict"

            [metrics]
            bind_addr = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.server.page_path, PathBuf::from("views/user.html"));
        assert_eq!(
            cfg.storage.database_path,
            PathBuf::from("/var/lib/billing/records.db")
        );
        assert_eq!(cfg.readings.policy, ReadingPolicy::Strict);
        assert_eq!(cfg.metrics.unwrap().bind_addr, "127.0.0.1:9100");
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let res = AppConfig::from_toml("[readings]\npolicy = \"lenient\"\n");
        assert!(res.is_err());
    }
}

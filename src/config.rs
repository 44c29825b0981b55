//! Rendezvous Configuration
//!
//! Loaded once at startup from TOML, then overridden from the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::registry::RegistryOptions;
use crate::rpc::Router;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendezvousConfig {
    /// Replaces the built-in remote-eligible method list when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_methods: Option<Vec<String>>,

    pub registry: RegistryConfig,

    pub upstream: UpstreamConfig,
}

/// Peer registry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Database directory, relative paths resolve against the data dir
    pub path: PathBuf,

    #[serde(flatten)]
    pub options: RegistryOptions,

    /// Peers returned by a range query when no limit is given
    pub default_limit: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("peers"),
            options: RegistryOptions::default(),
            default_limit: 10,
        }
    }
}

/// Upstream RPC provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Forward eligible calls to `url`
    pub enabled: bool,

    /// JSON-RPC endpoint of the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            timeout_secs: 30,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RendezvousConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    // Builder-style methods for CLI overrides

    pub fn with_registry_path(mut self, path: PathBuf) -> Self {
        self.registry.path = path;
        self
    }

    /// Setting a URL turns upstream mode on
    pub fn with_upstream_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.upstream.url = Some(url);
            self.upstream.enabled = true;
        }
        self
    }

    /// Registry path resolved against `data_dir`
    pub fn registry_path(&self, data_dir: &Path) -> PathBuf {
        if self.registry.path.is_absolute() {
            self.registry.path.clone()
        } else {
            data_dir.join(&self.registry.path)
        }
    }

    /// Build the method router for this configuration
    pub fn router(&self) -> Router {
        match &self.remote_methods {
            Some(methods) => Router::with_methods(self.upstream.enabled, methods.iter().cloned()),
            None => Router::new(self.upstream.enabled),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.upstream.enabled && self.upstream.url.as_deref().map_or(true, str::is_empty) {
            anyhow::bail!("upstream.enabled is set but upstream.url is missing");
        }

        if self.upstream.timeout_secs == 0 {
            anyhow::bail!("upstream.timeout_secs must be greater than 0");
        }

        if self.registry.default_limit == 0 {
            anyhow::bail!("registry.default_limit must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{KeyLayout, ScanMode};
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RendezvousConfig::default();
        assert!(!config.upstream.enabled);
        assert_eq!(config.registry.default_limit, 10);
        assert_eq!(config.registry.options.scan_mode, ScanMode::Bounded);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RendezvousConfig::default();
        config.upstream.enabled = true;
        assert!(config.validate().is_err());

        config.upstream.url = Some("http://127.0.0.1:8545".to_string());
        assert!(config.validate().is_ok());

        config.upstream.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config: RendezvousConfig = toml::from_str(
            r#"
            remote_methods = ["eth_getBalance"]

            [registry]
            path = "/var/lib/peers"
            key_layout = "length_prefixed"
            scan_mode = "unbounded"

            [upstream]
            enabled = true
            url = "https://mainnet.example.org"
            "#,
        )
        .unwrap();

        assert_eq!(config.registry.options.key_layout, KeyLayout::LengthPrefixed);
        assert_eq!(config.registry.options.scan_mode, ScanMode::Unbounded);
        assert_eq!(config.registry.default_limit, 10);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.registry_path(Path::new("/data")), PathBuf::from("/var/lib/peers"));

        let router = config.router();
        assert!(router.route_remote("eth_getBalance"));
        assert!(!router.route_remote("eth_call"));
    }

    #[test]
    fn test_builder_methods() {
        let config = RendezvousConfig::default()
            .with_registry_path(PathBuf::from("db"))
            .with_upstream_url(Some("http://localhost:8545".to_string()));

        assert!(config.upstream.enabled);
        assert_eq!(config.registry_path(Path::new("/data")), PathBuf::from("/data/db"));
        assert!(config.router().route_remote("eth_call"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rendezvous.toml");

        let config = RendezvousConfig::default().with_upstream_url(Some("http://localhost:8545".into()));
        config.save(&path).unwrap();
        assert_eq!(RendezvousConfig::load(&path).unwrap(), config);
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use poolscope::infrastructure::blockchain::DEFAULT_TIMEOUT_MS;
use poolscope::webserver::{DEFAULT_HOST, DEFAULT_PORT};

pub const DEFAULT_POOL1: &str = "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2";
pub const DEFAULT_POOL2: &str = "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ";

#[derive(Debug, Clone, Deserialize)]
pub struct RpcCfg {
    pub url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RpcCfg {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerCfg {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerCfg {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolsCfg {
    #[serde(default = "default_pool1")]
    pub pool1: String,
    #[serde(default = "default_pool2")]
    pub pool2: String,
}

impl Default for PoolsCfg {
    fn default() -> Self {
        Self {
            pool1: default_pool1(),
            pool2: default_pool2(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcCfg,
    #[serde(default)]
    pub server: ServerCfg,
    #[serde(default)]
    pub pools: PoolsCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse Config.toml")
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_pool1() -> String {
    DEFAULT_POOL1.to_string()
}

fn default_pool2() -> String {
    DEFAULT_POOL2.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let cfg = Config::from_toml(
            r#"
            [rpc]
            url = "https://rpc.example.org"
            timeout_ms = 5000

            [server]
            host = "0.0.0.0"
            port = 9000

            [pools]
            pool1 = "A"
            pool2 = "B"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.rpc.url.as_deref(), Some("https://rpc.example.org"));
        assert_eq!(cfg.rpc.timeout_ms, 5000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.pools.pool1, "A");
        assert_eq!(cfg.pools.pool2, "B");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let cfg = Config::from_toml("[server]\nport = 3000\n").unwrap();
        assert!(cfg.rpc.url.is_none());
        assert_eq!(cfg.rpc.timeout_ms, 8_000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.pools.pool1, DEFAULT_POOL1);

        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("[server]\nport = \"eighty\"").is_err());
        assert!(Config::from_file("/nonexistent/poolscope.toml").is_err());
    }
}

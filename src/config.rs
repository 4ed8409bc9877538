use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::reader::DEFAULT_MAX_REQUEST_SIZE;

/// Address family used when resolving the bind host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum IpVersion {
    #[serde(rename = "IPv4")]
    V4,
    #[serde(rename = "IPv6")]
    V6,
}

impl FromStr for IpVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IPv4" => Ok(IpVersion::V4),
            "IPv6" => Ok(IpVersion::V6),
            other => anyhow::bail!("invalid ip version {:?}, expected IPv4 or IPv6", other),
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("IPv4"),
            IpVersion::V6 => f.write_str("IPv6"),
        }
    }
}

/// Server settings.
///
/// Every field has a default, so a YAML file only needs the keys it changes:
///
/// ```yaml
/// host: 0.0.0.0
/// port: 9000
/// db_location: /var/lib/beacon/store.db
/// reuse_address: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host name or address to bind
    pub host: String,
    pub port: u16,
    pub ip_version: IpVersion,
    /// Path of the key-value store file
    pub db_location: PathBuf,
    /// Set SO_REUSEADDR on the listening socket
    pub reuse_address: bool,
    /// Log at debug level
    pub verbose: bool,
    /// Largest request, headers included, that will be buffered
    pub max_request_size: usize,
    /// How long a connection may take to deliver its request
    pub read_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            ip_version: IpVersion::V4,
            db_location: PathBuf::from("beacons"),
            reuse_address: false,
            verbose: false,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            read_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads settings from a YAML file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let cfg = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_yaml(&raw)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => Self::default(),
        };

        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw).context("Failed to parse YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("host must not be empty");
        }
        if self.max_request_size == 0 {
            anyhow::bail!("max_request_size must be greater than zero");
        }
        if self.read_timeout_secs == 0 {
            anyhow::bail!("read_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

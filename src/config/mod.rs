use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::reporter;

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// memkv configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
  /// HTTP listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// Seconds between background status lines
  #[serde(default = "default_report_interval")]
  pub report_interval_secs: u64,

  /// Upper bound on the graceful drain of in-flight requests
  #[serde(default = "default_shutdown_timeout")]
  pub shutdown_timeout_secs: u64,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_report_interval() -> u64 {
  reporter::DEFAULT_INTERVAL.as_secs()
}

fn default_shutdown_timeout() -> u64 {
  10
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      report_interval_secs: default_report_interval(),
      shutdown_timeout_secs: default_shutdown_timeout(),
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    Self::from_toml(&config_str).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Parse configuration from a TOML string
  pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    self.socket_addr()?;
    if self.report_interval_secs == 0 {
      return Err(ConfigError::Invalid(
        "report_interval_secs must be greater than 0".to_string(),
      ));
    }
    if self.shutdown_timeout_secs == 0 {
      return Err(ConfigError::Invalid(
        "shutdown_timeout_secs must be greater than 0".to_string(),
      ));
    }
    Ok(())
  }

  pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
    self.server_addr.parse().map_err(|e| {
      ConfigError::Invalid(format!("server_addr '{}': {}", self.server_addr, e))
    })
  }

  pub fn report_interval(&self) -> Duration {
    Duration::from_secs(self.report_interval_secs)
  }

  pub fn shutdown_timeout(&self) -> Duration {
    Duration::from_secs(self.shutdown_timeout_secs)
  }
}

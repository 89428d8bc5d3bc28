//! Configuration file support for launch-dashboard
//!
//! Every setting has a default, so the dashboard runs without any
//! configuration. An optional `.dashboard.toml` (or `dashboard.toml`) found
//! in the working directory or one of its parents overrides the defaults.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .dashboard.toml
//!
//! [data]
//! # CSV file with launch records (relative paths resolve against this file)
//! path = "data/spacex_launch_dash.csv"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8050
//!
//! # Open the dashboard in the default browser on startup
//! open_browser = false
//!
//! # API base URL for a separately deployed frontend
//! api_endpoint = "https://dashboard.example.com"
//! ```

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid host address: {0}")]
    HostError(String),
}

/// Dataset section
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path to the launch records CSV
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("spacex_launch_dash.csv")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

/// Server section
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub open_browser: bool,

    /// Frontend API base URL, enables CORS when set
    #[serde(default)]
    pub api_endpoint: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open_browser: false,
            api_endpoint: None,
        }
    }
}

impl ServerSection {
    /// Parse the configured host as an IP address
    pub fn host_addr(&self) -> Result<IpAddr, ConfigError> {
        self.host
            .parse()
            .map_err(|e| ConfigError::HostError(format!("{}: {}", self.host, e)))
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub server: ServerSection,
}

/// Load configuration starting the search at `start_path`
///
/// Searches for `.dashboard.toml` in the given directory and parent
/// directories. Returns the defaults when none is found.
pub fn load_config(start_path: &Path) -> Result<DashboardConfig, ConfigError> {
    match find_config_file(start_path) {
        Some(path) => load_config_file(&path),
        None => Ok(DashboardConfig::default()),
    }
}

/// Load an explicit configuration file
pub fn load_config_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: DashboardConfig = toml::from_str(&content)?;

    if config.data.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.data.path = dir.join(&config.data.path);
        }
    }
    Ok(config)
}

/// Find the config file by searching up the directory tree
fn find_config_file(start_path: &Path) -> Option<PathBuf> {
    let config_names = [".dashboard.toml", "dashboard.toml"];

    let mut current = if start_path.is_file() {
        start_path.parent()?.to_path_buf()
    } else {
        start_path.to_path_buf()
    };

    loop {
        for name in &config_names {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // Move to parent directory
        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.data.path, PathBuf::from("spacex_launch_dash.csv"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8050);
        assert!(!config.server.open_browser);
        assert!(config.server.api_endpoint.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [data]
            path = "/srv/launches.csv"

            [server]
            port = 9000
            open_browser = true
        "#;

        let config: DashboardConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.data.path, PathBuf::from("/srv/launches.csv"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.server.open_browser);
    }

    #[test]
    fn test_host_addr() {
        let mut server = ServerSection::default();
        assert!(server.host_addr().unwrap().is_loopback());

        server.host = "not-an-ip".to_string();
        assert!(matches!(server.host_addr(), Err(ConfigError::HostError(_))));
    }

    #[test]
    fn test_find_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(".dashboard.toml"),
            "[data]\npath = \"launches.csv\"\n\n[server]\nport = 8123\n",
        )
        .unwrap();

        let config = load_config(&nested).unwrap();
        assert_eq!(config.server.port, 8123);
        // relative data paths resolve against the config file's directory
        assert_eq!(config.data.path, dir.path().join("launches.csv"));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, "[server]\nport = \"eighty\"\n").unwrap();
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}

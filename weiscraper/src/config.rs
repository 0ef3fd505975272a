use std::fs;
use std::path::{Path, PathBuf};

use dirs::config_local_dir;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_API_HOST: &str = "https://m.weibo.cn";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_6) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub mobile_api_host: String,
    pub user_agent: String,
    /// Same-page attempts the page loop makes when the transport returns
    /// nothing usable, before the stream gives up.
    pub transport_retries: u32,
    pub retry_pause_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mobile_api_host: DEFAULT_API_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transport_retries: 3,
            retry_pause_secs: 1,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load from the conventional per-user location, falling back to the
    /// built-in defaults when no file is present or it fails to parse.
    pub fn load_default() -> Self {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("loading config from {}", path.display());
                Self::load(&path).unwrap_or_else(|e| {
                    warn!("cannot load config from {}: {e}", path.display());
                    Self::default()
                })
            }
            _ => Self::default(),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        config_local_dir().map(|dir| dir.join("weiscraper/config.toml"))
    }
}

#[cfg(test)]
mod local_tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mobile_api_host, DEFAULT_API_HOST);
        assert_eq!(config.transport_retries, 3);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "mobile_api_host = \"http://localhost:8080\"\ntransport_retries = 5"
        )
        .unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.mobile_api_host, "http://localhost:8080");
        assert_eq!(config.transport_retries, 5);
        // unset keys keep their defaults
        assert_eq!(config.retry_pause_secs, 1);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "transport_retries = \"many\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}

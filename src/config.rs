use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

/// Settings for the hosted text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| SiteError::Config(format!("Failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    /// Loads the file when one is given, then applies environment overrides.
    pub fn from_env_or_file(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(host) = env::var("STEMOUT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("STEMOUT_PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                self.server.port = parsed;
            }
        }
        if let Ok(model) = env::var("STEMOUT_MODEL") {
            self.model.model = model;
        }
        if let Ok(endpoint) = env::var("STEMOUT_GEMINI_ENDPOINT") {
            self.model.endpoint = endpoint;
        }
        // The deployment convention is a bare API_KEY; the prefixed name wins when both exist.
        if let Ok(key) = env::var("API_KEY") {
            self.model.api_key = Some(key);
        }
        if let Ok(key) = env::var("STEMOUT_API_KEY") {
            self.model.api_key = Some(key);
        }
        if let Ok(level) = env::var("STEMOUT_LOG") {
            self.logging.level = level;
        }
        if let Ok(json) = env::var("STEMOUT_LOG_JSON") {
            if let Ok(parsed) = json.parse::<bool>() {
                self.logging.json = parsed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_and_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nhost='127.0.0.1'\nport=9000\n[model]\nmodel='gemini-2.0-flash'"
        )
        .unwrap();

        env::set_var("STEMOUT_PORT", "9100");
        let cfg = AppConfig::from_env_or_file(Some(file.path())).unwrap();
        env::remove_var("STEMOUT_PORT");

        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.model.model, "gemini-2.0-flash");
        assert_eq!(cfg.model.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\njson=true").unwrap();

        let cfg = AppConfig::from_file(file.path()).unwrap();

        assert_eq!(cfg.server, ServerConfig::default());
        assert_eq!(cfg.model.model, "gemini-2.5-flash");
        assert!(cfg.model.api_key.is_none());
        assert!(cfg.logging.json);
    }

    #[test]
    fn rejects_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport=").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }
}

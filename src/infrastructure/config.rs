use crate::application::analysis_service::{
    AnalysisSettings, ApiKey, DEFAULT_SAMPLE_SIZE, DEFAULT_TIMEOUT,
};
use crate::domain::election::DEFAULT_TOTAL_SEATS;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "config/election";
const ENV_PREFIX: &str = "ELECTION";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    /// Dataset file to load instead of the built-in results.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_total_seats")]
    pub total_seats: u32,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: None,
            total_seats: default_total_seats(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            sample_size: default_sample_size(),
        }
    }
}

impl AnalysisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            api_key: self.api_key.clone().and_then(ApiKey::new),
            sample_size: self.sample_size,
            timeout: self.timeout(),
        }
    }
}

// Hand-written so the API key never reaches the logs.
impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("sample_size", &self.sample_size)
            .finish()
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_total_seats() -> u32 {
    DEFAULT_TOTAL_SEATS
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

/// Load `config/election.*` (optional) overlaid with `ELECTION__*` env vars,
/// e.g. `ELECTION__ANALYSIS__API_KEY`.
pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

pub fn load_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let config = load_config_from("config/does-not-exist").unwrap();
        assert_eq!(config.dataset.total_seats, 300);
        assert_eq!(config.analysis.sample_size, 3);
        assert_eq!(config.analysis.timeout(), Duration::from_secs(10));
        assert!(config.dataset.path.is_none());
    }

    #[test]
    fn test_analysis_settings_from_config() {
        let config = AnalysisConfig {
            api_key: Some("secret-value".to_string()),
            timeout_secs: 4,
            sample_size: 5,
            ..AnalysisConfig::default()
        };

        let settings = config.settings();
        assert_eq!(settings.api_key.as_ref().map(ApiKey::expose), Some("secret-value"));
        assert_eq!(settings.timeout, Duration::from_secs(4));
        assert_eq!(settings.sample_size, 5);
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = AnalysisConfig {
            api_key: Some(String::new()),
            ..AnalysisConfig::default()
        };
        assert!(config.settings().api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AnalysisConfig {
            api_key: Some("secret-value".to_string()),
            ..AnalysisConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-value"));
        assert!(printed.contains("<redacted>"));
    }
}

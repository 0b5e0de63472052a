use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Language;

/// Base URLs of the remote collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub fallback: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: "https://geocoding-api.open-meteo.com/v1".to_string(),
            forecast: "https://api.open-meteo.com/v1".to_string(),
            fallback: "https://wttr.in".to_string(),
        }
    }
}

/// Suggestion behaviour while typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub suggestion_limit: u8,
    pub min_query_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { debounce_ms: 300, suggestion_limit: 5, min_query_chars: 2 }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout; `0` disables it.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("citycast/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "en"
///
/// [search]
/// debounce_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    pub endpoints: Endpoints,
    pub search: SearchSettings,
    pub http: HttpSettings,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citycast", "citycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.suggestion_limit == 0 {
            return Err(anyhow!("search.suggestion_limit must be at least 1"));
        }
        if self.search.min_query_chars == 0 {
            return Err(anyhow!("search.min_query_chars must be at least 1"));
        }
        for (name, url) in [
            ("geocoding", &self.endpoints.geocoding),
            ("forecast", &self.endpoints.forecast),
            ("fallback", &self.endpoints.fallback),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("endpoints.{name} must be an http(s) URL, got '{url}'"));
            }
        }
        Ok(())
    }

    /// Shared HTTP client for every provider call.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(self.http.user_agent.clone());
        if self.http.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(self.http.timeout_secs));
        }
        builder.build().context("Failed to build HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_design_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.language, Language::Ru);
        assert_eq!(cfg.search.debounce(), Duration::from_millis(300));
        assert_eq!(cfg.search.suggestion_limit, 5);
        assert_eq!(cfg.search.min_query_chars, 2);
        assert_eq!(cfg.http.timeout_secs, 10);
        assert!(cfg.http.user_agent.starts_with("citycast/"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let cfg = Config::from_toml(
            r#"
            language = "en"

            [search]
            debounce_ms = 250
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.language, Language::En);
        assert_eq!(cfg.search.debounce_ms, 250);
        assert_eq!(cfg.search.suggestion_limit, 5);
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.endpoints.fallback = "http://localhost:8080".into();
        cfg.http.timeout_secs = 0;

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn rejects_zero_suggestion_limit() {
        let err = Config::from_toml("[search]\nsuggestion_limit = 0\n").unwrap_err();
        assert!(err.to_string().contains("suggestion_limit"));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = Config::from_toml("[endpoints]\nforecast = \"ftp://x\"\n").unwrap_err();
        assert!(err.to_string().contains("endpoints.forecast"));
    }

    #[test]
    fn unknown_language_is_a_parse_error() {
        assert!(Config::from_toml("language = \"de\"\n").is_err());
    }

    #[test]
    fn http_client_builds_with_and_without_timeout() {
        let mut cfg = Config::default();
        assert!(cfg.http_client().is_ok());
        cfg.http.timeout_secs = 0;
        assert!(cfg.http_client().is_ok());
    }
}

//! Client configuration loading from file and environment variables.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Token endpoint base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "HELPDESK_API_URL";

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "HELPDESK_LOG_LEVEL";

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Backend token endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Call session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend that issues call access tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL; the token is requested from `{base_url}/create-web-call`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Settings for the in-process simulated session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Seconds before the simulated agent hangs up (0 = stay open until stopped).
    #[serde(default)]
    pub simulated_call_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "helpdesk_call=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "helpdesk_call=debug,info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulated_call_secs: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Set the token endpoint base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// Full URL of the token endpoint
    pub fn token_endpoint(&self) -> String {
        format!("{}/create-web-call", self.api.base_url)
    }

    /// Validate and normalise the configuration
    ///
    /// The base URL must parse as an absolute http(s) URL. Trailing slashes
    /// are trimmed so the endpoint path joins cleanly.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.api.base_url.trim().trim_end_matches('/').to_string();
        let url = reqwest::Url::parse(&trimmed).map_err(|e| ConfigError::InvalidUrl {
            url: self.api.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl {
                url: self.api.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        self.api.base_url = trimmed;
        Ok(self)
    }
}

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("helpdesk-call").join("config.toml"))
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file
    File(PathBuf),
    /// No file at this path, built-in defaults were used
    Missing(PathBuf),
    /// The platform has no config dir, built-in defaults were used
    Defaults,
}

/// Applies environment variable overrides through `lookup`.
///
/// - `HELPDESK_API_URL` overrides `api.base_url`
/// - `HELPDESK_LOG_LEVEL` overrides `logging.level`
pub fn apply_env(mut config: AppConfig, lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
    if let Some(url) = lookup(API_URL_ENV) {
        config.api.base_url = url;
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV) {
        config.logging.level = level;
    }
    config
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// When `path` is `None` the platform config dir is searched. Overrides are
/// applied file first, then the process environment (see [`apply_env`]),
/// then `api_url` from the command line.
///
/// Nothing is logged here; the caller logs the returned [`ConfigSource`]
/// once tracing is installed.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed, or
/// if the resulting base URL is invalid.
pub fn load_config(
    path: Option<&Path>,
    api_url: Option<&str>,
) -> Result<(AppConfig, ConfigSource), ConfigError> {
    load_config_with(path, api_url, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit environment lookup
pub fn load_config_with(
    path: Option<&Path>,
    api_url: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(AppConfig, ConfigSource), ConfigError> {
    let path = path.map(Path::to_path_buf).or_else(default_config_path);

    let (config, source) = match path {
        Some(p) => match std::fs::read_to_string(&p) {
            Ok(contents) => (toml::from_str(&contents)?, ConfigSource::File(p)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                (AppConfig::default(), ConfigSource::Missing(p))
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => (AppConfig::default(), ConfigSource::Defaults),
    };

    let mut config = apply_env(config, lookup);
    if let Some(url) = api_url {
        config = config.with_base_url(url);
    }

    Ok((config.validate()?, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.session.simulated_call_secs, 0);
        assert_eq!(config.token_endpoint(), "http://localhost:8000/create-web-call");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://helpdesk.example.com/"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://helpdesk.example.com/");
        assert_eq!(config.logging.level, "helpdesk_call=debug,info");
    }

    #[test]
    fn test_validate_trims_trailing_slash() {
        let config = AppConfig::default()
            .with_base_url("https://helpdesk.example.com/")
            .validate()
            .unwrap();
        assert_eq!(
            config.token_endpoint(),
            "https://helpdesk.example.com/create-web-call"
        );
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let err = AppConfig::default().with_base_url("not a url").validate();
        assert!(matches!(err, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let err = AppConfig::default()
            .with_base_url("ftp://helpdesk.example.com")
            .validate();
        assert!(matches!(err, Err(ConfigError::InvalidUrl { .. })));
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("helpdesk-call-missing-config.toml");
        let _ = std::fs::remove_file(&path);
        let (config, source) = load_config_with(Some(&path), None, no_env).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.logging.level, "helpdesk_call=debug,info");
        assert_eq!(source, ConfigSource::Missing(path));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let path = std::env::temp_dir().join("helpdesk-call-invalid-config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        let result = load_config_with(Some(&path), None, no_env);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides_url_and_level() {
        let config = apply_env(AppConfig::default(), |key| match key {
            API_URL_ENV => Some("https://env.example.com/".to_string()),
            LOG_LEVEL_ENV => Some("warn".to_string()),
            _ => None,
        })
        .validate()
        .unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_env_url_is_rejected() {
        let path = std::env::temp_dir().join("helpdesk-call-missing-env-config.toml");
        let _ = std::fs::remove_file(&path);
        let result = load_config_with(Some(&path), None, |key| {
            (key == API_URL_ENV).then(|| "not a url".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn test_override_precedence() {
        let path = std::env::temp_dir().join("helpdesk-call-precedence-config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://file.example.com\"\n").unwrap();
        let env = |key: &str| (key == API_URL_ENV).then(|| "https://env.example.com".to_string());

        let (from_file, source) = load_config_with(Some(&path), None, no_env).unwrap();
        let (from_env, _) = load_config_with(Some(&path), None, env).unwrap();
        let (from_flag, _) =
            load_config_with(Some(&path), Some("https://flag.example.com/"), env).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(from_file.api.base_url, "https://file.example.com");
        assert_eq!(from_env.api.base_url, "https://env.example.com");
        assert_eq!(from_flag.api.base_url, "https://flag.example.com");
    }
}

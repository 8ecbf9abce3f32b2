//! Configuration loader and validator for the homework status bot.
//!
//! Tunables live in an optional YAML file; credentials always come from the
//! environment and are never written to disk.
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::practicum::PRACTICUM_ENDPOINT;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Settings read from the YAML file. Every field has a default, so an absent
/// file is equivalent to an empty one.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub practicum: Practicum,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct App {
    pub retry_interval_secs: u64,
}

impl Default for App {
    fn default() -> Self {
        Self {
            retry_interval_secs: 600,
        }
    }
}

/// Review API settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Practicum {
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for Practicum {
    fn default() -> Self {
        Self {
            endpoint: PRACTICUM_ENDPOINT.to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Tokens and chat destination supplied by the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: i64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build credentials from an arbitrary key lookup. Blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let practicum_token = required(PRACTICUM_TOKEN_VAR)?;
        let telegram_token = required(TELEGRAM_TOKEN_VAR)?;
        let chat_id = required(TELEGRAM_CHAT_ID_VAR)?
            .parse::<i64>()
            .map_err(|_| ConfigError::Invalid("TELEGRAM_CHAT_ID must be an integer chat id"))?;

        Ok(Self {
            practicum_token,
            telegram_token,
            chat_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub settings: Settings,
    pub credentials: Credentials,
}

impl Config {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.settings.app.retry_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.practicum.request_timeout_secs)
    }

    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.settings.practicum.endpoint)
            .map_err(|_| ConfigError::Invalid("practicum.endpoint must be a valid URL"))
    }
}

/// Load settings and credentials, refusing to continue if anything required is absent.
/// - If `path` is None, uses `config.yaml` in the current working directory.
/// - A missing settings file falls back to defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let settings = load_settings(path)?;
    validate(&settings)?;
    let credentials = Credentials::from_env()?;
    Ok(Config {
        settings,
        credentials,
    })
}

pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
        Err(err) => return Err(err.into()),
    };
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if settings.app.retry_interval_secs == 0 {
        return Err(ConfigError::Invalid("app.retry_interval_secs must be > 0"));
    }
    if settings.practicum.request_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "practicum.request_timeout_secs must be > 0",
        ));
    }
    if Url::parse(&settings.practicum.endpoint).is_err() {
        return Err(ConfigError::Invalid("practicum.endpoint must be a valid URL"));
    }
    Ok(())
}

/// Example settings file.
pub fn example() -> &'static str {
    r#"app:
  retry_interval_secs: 600

practicum:
  endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/"
  request_timeout_secs: 30
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_env() -> HashMap<String, String> {
        env(&[
            (PRACTICUM_TOKEN_VAR, "practicum-token"),
            (TELEGRAM_TOKEN_VAR, "123:telegram"),
            (TELEGRAM_CHAT_ID_VAR, "987654321"),
        ])
    }

    #[test]
    fn parse_example_ok() {
        let settings: Settings = serde_yaml::from_str(example()).unwrap();
        validate(&settings).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn credentials_from_complete_env() {
        let vars = full_env();
        let creds = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds.practicum_token, "practicum-token");
        assert_eq!(creds.telegram_token, "123:telegram");
        assert_eq!(creds.chat_id, 987654321);
    }

    #[test]
    fn each_credential_is_required() {
        for key in [PRACTICUM_TOKEN_VAR, TELEGRAM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR] {
            let mut vars = full_env();
            vars.remove(key);
            let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
            match err {
                ConfigError::Missing(missing) => assert_eq!(missing, key),
                other => panic!("wrong error: {other:?}"),
            }
        }
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut vars = full_env();
        vars.insert(TELEGRAM_TOKEN_VAR.to_string(), "   ".to_string());
        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(TELEGRAM_TOKEN_VAR)));
    }

    #[test]
    fn non_numeric_chat_id_rejected() {
        let mut vars = full_env();
        vars.insert(TELEGRAM_CHAT_ID_VAR.to_string(), "@channel".to_string());
        let err = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("TELEGRAM_CHAT_ID")),
            other => panic!("wrong error: {other:?}"),
        }
    }

    #[test]
    fn debug_redacts_tokens() {
        let vars = full_env();
        let creds = Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        let printed = format!("{creds:?}");
        assert!(!printed.contains("practicum-token"));
        assert!(!printed.contains("123:telegram"));
        assert!(printed.contains("987654321"));
    }

    #[test]
    fn invalid_settings() {
        let mut settings = Settings::default();
        settings.app.retry_interval_secs = 0;
        match validate(&settings).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("retry_interval_secs")),
            _ => panic!("wrong error"),
        }

        let mut settings = Settings::default();
        settings.practicum.request_timeout_secs = 0;
        assert!(matches!(validate(&settings), Err(ConfigError::Invalid(_))));

        let mut settings = Settings::default();
        settings.practicum.endpoint = "not a url".into();
        match validate(&settings).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("endpoint")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn missing_file_uses_defaults() {
        let td = tempdir().unwrap();
        let settings = load_settings(Some(&td.path().join("absent.yaml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, "app:\n  retry_interval_secs: 5\n").unwrap();
        let settings = load_settings(Some(&p)).unwrap();
        assert_eq!(settings.app.retry_interval_secs, 5);
        assert_eq!(settings.practicum, Practicum::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, "app: [unclosed").unwrap();
        assert!(matches!(load_settings(Some(&p)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn durations_follow_settings() {
        let vars = full_env();
        let cfg = Config {
            settings: serde_yaml::from_str(example()).unwrap(),
            credentials: Credentials::from_lookup(|k| vars.get(k).cloned()).unwrap(),
        };
        assert_eq!(cfg.retry_interval(), Duration::from_secs(600));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.endpoint().unwrap().as_str(), PRACTICUM_ENDPOINT);
    }
}

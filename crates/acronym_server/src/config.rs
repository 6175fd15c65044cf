//! Process configuration read from the environment.
//!
//! # Invariants
//! - `SLACK_BOT_TOKEN` and `SLACK_SIGNING_SECRET` are required; startup
//!   fails without them.
//! - Every other key has a default.

use acronym_core::{default_log_level, LogTarget};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const BOT_TOKEN_KEY: &str = "SLACK_BOT_TOKEN";
pub const SIGNING_SECRET_KEY: &str = "SLACK_SIGNING_SECRET";
pub const API_BASE_KEY: &str = "SLACK_API_BASE";
pub const DB_PATH_KEY: &str = "ACRONYM_DB_PATH";
pub const BIND_ADDR_KEY: &str = "ACRONYM_BIND_ADDR";
pub const LOG_LEVEL_KEY: &str = "ACRONYM_LOG_LEVEL";
pub const LOG_DIR_KEY: &str = "ACRONYM_LOG_DIR";
pub const HTTP_WORKERS_KEY: &str = "ACRONYM_HTTP_WORKERS";

const DEFAULT_API_BASE: &str = "https://slack.com/api";
const DEFAULT_DB_PATH: &str = "acronyms.db";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_HTTP_WORKERS: usize = 8;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing required environment variable `{key}`"),
            Self::Invalid { key, reason } => write!(f, "invalid `{key}`: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bot_token: String,
    pub signing_secret: String,
    pub api_base: String,
    pub db_path: PathBuf,
    pub bind_addr: String,
    pub http_workers: usize,
    pub log_level: String,
    pub log_target: LogTarget,
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let setting = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = setting(BOT_TOKEN_KEY).ok_or(ConfigError::Missing(BOT_TOKEN_KEY))?;
        let signing_secret =
            setting(SIGNING_SECRET_KEY).ok_or(ConfigError::Missing(SIGNING_SECRET_KEY))?;
        let http_workers = match setting(HTTP_WORKERS_KEY) {
            None => DEFAULT_HTTP_WORKERS,
            Some(raw) => match raw.parse::<usize>() {
                Ok(count) if count > 0 => count,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: HTTP_WORKERS_KEY,
                        reason: format!("expected a positive integer, got `{raw}`"),
                    })
                }
            },
        };
        let log_target = LogTarget::from_dir_setting(setting(LOG_DIR_KEY).as_deref())
            .map_err(|reason| ConfigError::Invalid {
                key: LOG_DIR_KEY,
                reason,
            })?;

        Ok(Self {
            bot_token,
            signing_secret,
            api_base: setting(API_BASE_KEY)
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            db_path: setting(DB_PATH_KEY)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            bind_addr: setting(BIND_ADDR_KEY).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            http_workers,
            log_level: setting(LOG_LEVEL_KEY).unwrap_or_else(|| default_log_level().to_string()),
            log_target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, ServerConfig, BOT_TOKEN_KEY, HTTP_WORKERS_KEY, SIGNING_SECRET_KEY,
    };
    use acronym_core::LogTarget;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    type Pair = (&'static str, &'static str);

    const CREDENTIALS: [Pair; 2] =
        [(BOT_TOKEN_KEY, "xoxb-test"), (SIGNING_SECRET_KEY, "signing-secret")];

    fn with_credentials(extra: &[Pair]) -> Vec<Pair> {
        CREDENTIALS.iter().chain(extra).copied().collect()
    }

    #[test]
    fn missing_token_is_fatal() {
        let err = config_from(&[(SIGNING_SECRET_KEY, "signing-secret")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == BOT_TOKEN_KEY));

        let err = config_from(&[(BOT_TOKEN_KEY, "   "), (SIGNING_SECRET_KEY, "s")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn missing_signing_secret_is_fatal() {
        let err = config_from(&[(BOT_TOKEN_KEY, "xoxb-test")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == SIGNING_SECRET_KEY));

        let err = config_from(&[(BOT_TOKEN_KEY, "xoxb-test"), (SIGNING_SECRET_KEY, " ")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == SIGNING_SECRET_KEY));
    }

    #[test]
    fn worker_count_must_be_positive() {
        for raw in ["0", "-2", "many"] {
            let err = config_from(&with_credentials(&[(HTTP_WORKERS_KEY, raw)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key, .. } if key == HTTP_WORKERS_KEY));
        }
        let config = config_from(&with_credentials(&[(HTTP_WORKERS_KEY, " 3 ")])).unwrap();
        assert_eq!(config.http_workers, 3);
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = config_from(&CREDENTIALS).unwrap();
        assert_eq!(config.bot_token, "xoxb-test");
        assert_eq!(config.signing_secret, "signing-secret");
        assert_eq!(config.http_workers, 8);
        assert_eq!(config.api_base, "https://slack.com/api");
        assert_eq!(config.db_path, PathBuf::from("acronyms.db"));
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.log_target, LogTarget::Stderr);
    }

    #[test]
    fn overrides_are_read_and_trimmed() {
        let config = config_from(&with_credentials(&[
            ("SLACK_API_BASE", "http://127.0.0.1:9000/api/"),
            ("ACRONYM_DB_PATH", "/var/lib/acronyms/bot.db"),
            ("ACRONYM_BIND_ADDR", " 127.0.0.1:8080 "),
            ("ACRONYM_LOG_LEVEL", "warn"),
            ("ACRONYM_LOG_DIR", "/var/log/acronyms"),
        ]))
        .unwrap();
        assert_eq!(config.api_base, "http://127.0.0.1:9000/api");
        assert_eq!(config.db_path, PathBuf::from("/var/lib/acronyms/bot.db"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.log_level, "warn");
        assert_eq!(
            config.log_target,
            LogTarget::Directory(PathBuf::from("/var/log/acronyms"))
        );
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = config_from(&with_credentials(&[("ACRONYM_LOG_DIR", "logs")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_ENV` | `production`, `staging` or anything else for development | development |
//! | `APP_KEY` | HS256 secret for issuing and verifying tokens | empty |
//! | `API_CONFIG_PATH` | Service configuration document | `api-config.yaml` |
//! | `API_CONFIG_POLICY` | `lenient` or `strict` handling of a bad API config | `lenient` |
//! | `AUTH_PROVIDER_ID` | Provider id honoured in rule requirements | `maritima` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{fmt, path::PathBuf};

use crate::auth::{policy::DEFAULT_PROVIDER_ID, SigningSecret};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const APP_ENV_ENV: &str = "APP_ENV";
/// Environment variable holding the signing secret. Its value must never be
/// logged.
pub const APP_KEY_ENV: &str = "APP_KEY";
pub const API_CONFIG_PATH_ENV: &str = "API_CONFIG_PATH";
pub const API_CONFIG_POLICY_ENV: &str = "API_CONFIG_POLICY";
pub const AUTH_PROVIDER_ID_ENV: &str = "AUTH_PROVIDER_ID";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_CONFIG_PATH: &str = "api-config.yaml";
/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),

    #[error("Invalid API_CONFIG_POLICY value: {0:?} (expected 'lenient' or 'strict')")]
    InvalidConfigLoadPolicy(String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse `APP_ENV`; unknown values mean development.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") => Environment::Production,
            Some("staging") => Environment::Staging,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// What to do when the API config cannot be loaded at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigLoadPolicy {
    /// Log a warning and run with an empty auth policy.
    #[default]
    Lenient,
    /// Refuse to start.
    Strict,
}

impl ConfigLoadPolicy {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "lenient" => Ok(ConfigLoadPolicy::Lenient),
            "strict" => Ok(ConfigLoadPolicy::Strict),
            _ => Err(ConfigError::InvalidConfigLoadPolicy(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub signing_secret: SigningSecret,
    pub api_config_path: PathBuf,
    pub config_load_policy: ConfigLoadPolicy,
    pub provider_id: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let config_load_policy = match lookup(API_CONFIG_POLICY_ENV) {
            Some(raw) => ConfigLoadPolicy::parse(&raw)?,
            None => ConfigLoadPolicy::default(),
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment: Environment::parse(lookup(APP_ENV_ENV).as_deref()),
            signing_secret: SigningSecret::new(lookup(APP_KEY_ENV).unwrap_or_default()),
            api_config_path: lookup(API_CONFIG_PATH_ENV)
                .unwrap_or_else(|| DEFAULT_API_CONFIG_PATH.to_string())
                .into(),
            config_load_policy,
            provider_id: lookup(AUTH_PROVIDER_ID_ENV)
                .unwrap_or_else(|| DEFAULT_PROVIDER_ID.to_string()),
            log_format: LogFormat::parse(lookup(LOG_FORMAT_ENV).as_deref()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

use std::env;
use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::csrf::{CsrfGuard, CsrfSecret, TokenCodec, DEFAULT_MAX_AGE_MS};

pub const CSRF_SECRET_VAR: &str = "CSRF_SECRET";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Only development may run on a generated secret.
    pub fn requires_secret(self) -> bool {
        !matches!(self, Environment::Development)
    }

    /// Case-insensitive. Unrecognized names are an error, never development.
    fn parse(value: String) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidVar {
                name: "APP_ENV",
                value,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub csrf_secret: CsrfSecret,
    pub csrf_max_age_ms: i64,
    pub csrf_max_future_skew_ms: Option<i64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for configuration variable {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source.
    ///
    /// Fails when the signing secret is missing outside development; the
    /// process must not start serving without one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV") {
            Some(value) => Environment::parse(value)?,
            None => Environment::Development,
        };

        let csrf_secret = match lookup(CSRF_SECRET_VAR).filter(|s| !s.trim().is_empty()) {
            Some(secret) => CsrfSecret::new(secret),
            None if environment.requires_secret() => {
                return Err(ConfigError::MissingVar(CSRF_SECRET_VAR))
            }
            None => {
                tracing::warn!(
                    "{} not set; using an ephemeral secret for {:?}. Tokens will not survive a restart",
                    CSRF_SECRET_VAR,
                    environment
                );
                CsrfSecret::ephemeral()
            }
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(csrf_secret),
            Environment::Staging => Self::staging(csrf_secret),
            Environment::Development => Self::development(csrf_secret),
        }
        .with_env_overrides(&lookup)
    }

    fn with_env_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // API overrides
        if let Some(v) = lookup("CSRF_API_PORT") {
            self.api.port = parse_var("CSRF_API_PORT", v)?;
        } else if let Some(v) = lookup("PORT") {
            self.api.port = parse_var("PORT", v)?;
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = parse_var("API_ENABLE_REQUEST_LOGGING", v)?;
        }

        // Security overrides
        if let Some(v) = lookup("CSRF_MAX_AGE_MS") {
            self.security.csrf_max_age_ms = parse_millis("CSRF_MAX_AGE_MS", v)?;
        }
        if let Some(v) = lookup("CSRF_MAX_FUTURE_SKEW_MS") {
            self.security.csrf_max_future_skew_ms = Some(parse_millis("CSRF_MAX_FUTURE_SKEW_MS", v)?);
        }

        Ok(self)
    }

    fn development(csrf_secret: CsrfSecret) -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                csrf_secret,
                csrf_max_age_ms: DEFAULT_MAX_AGE_MS,
                csrf_max_future_skew_ms: None,
            },
        }
    }

    fn staging(csrf_secret: CsrfSecret) -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                csrf_secret,
                csrf_max_age_ms: DEFAULT_MAX_AGE_MS,
                csrf_max_future_skew_ms: None,
            },
        }
    }

    fn production(csrf_secret: CsrfSecret) -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                csrf_secret,
                csrf_max_age_ms: DEFAULT_MAX_AGE_MS,
                csrf_max_future_skew_ms: None,
            },
        }
    }

    /// Guard wired with this config's secret and lifetimes.
    pub fn csrf_guard(&self) -> CsrfGuard {
        let codec = TokenCodec::new(self.security.csrf_secret.clone())
            .with_max_future_skew_ms(self.security.csrf_max_future_skew_ms);
        CsrfGuard::new(codec).with_max_age_ms(self.security.csrf_max_age_ms)
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidVar { name, value })
}

fn parse_millis(name: &'static str, value: String) -> Result<i64, ConfigError> {
    match parse_var::<i64>(name, value.clone())? {
        ms if ms >= 0 => Ok(ms),
        _ => Err(ConfigError::InvalidVar { name, value }),
    }
}

// Global singleton config - initialized once at startup
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// Load the process config from the environment on first call.
pub fn init() -> Result<&'static AppConfig, ConfigError> {
    CONFIG.get_or_try_init(AppConfig::from_env)
}

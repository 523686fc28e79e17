//! Process configuration read once at startup.

use rest_core::Environment;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Development,
        }
    }
}

impl ServerConfig {
    /// Read `PORT` and `APP_ENV` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };
        let environment = match lookup("APP_ENV") {
            Some(value) => Environment::from_name(&value).unwrap_or_else(|| {
                tracing::warn!(app_env = %value, "unrecognised APP_ENV, falling back to development");
                Environment::Development
            }),
            None => Environment::default(),
        };
        Ok(Self { port, environment })
    }
}

//! Environment-driven server configuration.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "5000";
const DEFAULT_DB_PATH: &str = "tablets.db";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {message}")]
    InvalidValue {
        key: &'static str,
        value: String,
        message: String,
    },

    #[error("cannot resolve working directory: {0}")]
    WorkingDir(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Always absolute.
    pub log_dir: PathBuf,
    /// Overrides the Host-derived base URL of generated codes.
    pub public_base_url: Option<String>,
    /// Keys that fell back to their default value.
    pub defaulted: Vec<&'static str>,
}

impl Config {
    /// Loads configuration from `PHARMAQR_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(|err| ConfigError::WorkingDir(err.to_string()))?;
        Self::from_lookup(|key| env::var(key).ok(), cwd)
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Relative log directories are resolved against `cwd`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cwd: PathBuf,
    ) -> Result<Self, ConfigError> {
        let mut loader = Loader {
            lookup,
            defaulted: Vec::new(),
        };

        let host = loader.string("PHARMAQR_HOST", DEFAULT_HOST);
        let port = loader.parsed("PHARMAQR_PORT", DEFAULT_PORT)?;
        let db_path = PathBuf::from(loader.string("PHARMAQR_DB_PATH", DEFAULT_DB_PATH));
        let log_level = loader.string("PHARMAQR_LOG_LEVEL", pharmaqr_core::default_log_level());
        let log_dir = cwd.join(loader.string("PHARMAQR_LOG_DIR", DEFAULT_LOG_DIR));
        let public_base_url = loader
            .optional("PHARMAQR_PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string());

        Ok(Self {
            host,
            port,
            db_path,
            log_level,
            log_dir,
            public_base_url,
            defaulted: loader.defaulted,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

struct Loader<F: Fn(&str) -> Option<String>> {
    lookup: F,
    defaulted: Vec<&'static str>,
}

impl<F: Fn(&str) -> Option<String>> Loader<F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn string(&mut self, key: &'static str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| {
            self.defaulted.push(key);
            default.to_string()
        })
    }

    fn parsed<T: FromStr>(&mut self, key: &'static str, default: &str) -> Result<T, ConfigError>
    where
        T::Err: Display,
    {
        let value = self.string(key, default);
        value.parse().map_err(|err: T::Err| ConfigError::InvalidValue {
            key,
            message: err.to_string(),
            value,
        })
    }
}

//! Environment-based configuration types for the provisioning runtime.

use anyhow::Result;

use crate::errors::ConfigError;
use crate::oauth::types::{DEFAULT_CLIENT_SECRET_BYTES, MIN_CLIENT_SECRET_BYTES};

/// Number of random bytes used for generated client secrets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSecretLength(usize);

/// Main application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub version: String,
    pub storage_backend: String,
    pub database_url: Option<String>,
    pub client_secret_length: ClientSecretLength,
}

impl Config {
    /// Create a new configuration from environment variables
    pub fn new() -> Result<Self> {
        let storage_backend = default_env("STORAGE_BACKEND", "sqlite");
        let database_url = optional_env("DATABASE_URL");
        let client_secret_length: ClientSecretLength = default_env(
            "CLIENT_SECRET_BYTES",
            &DEFAULT_CLIENT_SECRET_BYTES.to_string(),
        )
        .try_into()?;

        Ok(Self {
            version: version()?,
            storage_backend,
            database_url,
            client_secret_length,
        })
    }
}

/// Get application version from build environment
pub fn version() -> Result<String> {
    option_env!("GIT_HASH")
        .or(option_env!("CARGO_PKG_VERSION"))
        .map(|val| val.to_string())
        .ok_or(ConfigError::VersionNotSet.into())
}

pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn default_env(name: &str, default_value: &str) -> String {
    optional_env(name).unwrap_or_else(|| default_value.to_string())
}

impl TryFrom<String> for ClientSecretLength {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let length = value
            .trim()
            .parse::<usize>()
            .map_err(ConfigError::SecretLengthParsingFailed)?;
        if length < MIN_CLIENT_SECRET_BYTES {
            return Err(ConfigError::SecretLengthTooShort {
                minimum: MIN_CLIENT_SECRET_BYTES,
                actual: length,
            }
            .into());
        }
        Ok(Self(length))
    }
}

impl AsRef<usize> for ClientSecretLength {
    fn as_ref(&self) -> &usize {
        &self.0
    }
}

impl Default for ClientSecretLength {
    fn default() -> Self {
        Self(DEFAULT_CLIENT_SECRET_BYTES)
    }
}

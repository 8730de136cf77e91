//! # Configuration
//!
//! Runtime settings read from the environment once at startup. Every secret
//! may also be supplied as a file path through the matching `*_FILE`
//! variable.
//!
//! ## Environment Variables
//!
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `JWT_SECRET` - HMAC key for user access tokens
//! - `ADMIN_TOKEN` - Bearer token accepted on admin routes
//! - `WEBHOOK_SECRET` - Shared secret expected on webhook routes
//! - `BIND_ADDR` - Listen address, defaults to `0.0.0.0:8090`
//! - `APP_ENV` - `production` switches logging to JSON
//! - `DB_MAX_CONNECTIONS` - Connection pool size, defaults to 10

use std::env;
use std::io;
use std::net::SocketAddr;

use secrecy::SecretString;
use thiserror::Error;

use crate::utils::constant::{DEFAULT_BIND_ADDR, DEFAULT_DB_MAX_CONNECTIONS};
use crate::utils::secret::get_secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("env variable `{0}` should be set")]
    Missing(&'static str),
    #[error("env variable `{name}` is invalid: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("secret file for `{name}` could not be read")]
    SecretFile {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            AppEnv::Production
        } else {
            AppEnv::Development
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub app_env: AppEnv,
    pub bind_addr: SocketAddr,
    pub database_url: SecretString,
    pub db_max_connections: u32,
    pub jwt_secret: SecretString,
    pub admin_token: SecretString,
    pub webhook_secret: SecretString,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: raw_addr.clone(),
        })?;

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value,
            })?,
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self {
            app_env,
            bind_addr,
            database_url: required_secret("DATABASE_URL", &lookup)?,
            db_max_connections,
            jwt_secret: required_secret("JWT_SECRET", &lookup)?,
            admin_token: required_secret("ADMIN_TOKEN", &lookup)?,
            webhook_secret: required_secret("WEBHOOK_SECRET", &lookup)?,
        })
    }
}

fn required_secret<F>(name: &'static str, lookup: &F) -> Result<SecretString, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get_secret(name, lookup)
        .map_err(|source| ConfigError::SecretFile { name, source })?
        .ok_or(ConfigError::Missing(name))
}

//! Runtime configuration, read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present, so
//! local setups don't need exported variables.

use crate::db::connection::DEFAULT_MAX_CONNECTIONS;
use crate::error::{Result, TrackerError};
use std::net::{IpAddr, SocketAddr};

const DEFAULT_DATABASE_URL: &str = "sqlite://followups.db";
const TESTING_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Deployment profile, selected with `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testing" | "test" => Ok(Environment::Testing),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(TrackerError::Config(format!(
                "unknown APP_ENV '{}', expected development, testing or production",
                other
            ))),
        }
    }

    fn default_database_url(self) -> &'static str {
        match self {
            Environment::Testing => TESTING_DATABASE_URL,
            Environment::Development | Environment::Production => DEFAULT_DATABASE_URL,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Production => "production",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        // Missing .env is the normal case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV") {
            Some(value) => Environment::parse(&value)?,
            None => Environment::Development,
        };

        let database_url =
            get("DATABASE_URL").unwrap_or_else(|| environment.default_database_url().to_string());

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(TrackerError::Config(format!(
                        "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{}'",
                        value
                    )))
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let host = get("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string())
            .trim()
            .parse::<IpAddr>()
            .map_err(|e| TrackerError::Config(format!("HOST is not an IP address: {}", e)))?;

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|e| TrackerError::Config(format!("PORT '{}' is invalid: {}", value, e)))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            environment,
            database_url,
            max_connections,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

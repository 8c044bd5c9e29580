use std::{env, str::FromStr, time::Duration};

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://database.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// Upper bound for acquiring a connection and for waiting on a locked database.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from `lookup`, which returns the raw value of a variable if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let max_connections = match parse_var(&lookup, "DB_MAX_CONNECTIONS")? {
            Some(0) => anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1"),
            Some(n) => n,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let timeout_secs = match parse_var(&lookup, "DB_TIMEOUT_SECS")? {
            Some(0) => anyhow::bail!("DB_TIMEOUT_SECS must be at least 1"),
            Some(n) => n,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            max_connections,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Can't parse {} from {:?}", name, value)),
        None => Ok(None),
    }
}

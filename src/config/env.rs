//! Process configuration read from environment variables.

use crate::error::ConfigError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::ConnectOptions;
use std::str::FromStr;

/// Store connection parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct DbConfig {
    /// Full URL; when set the individual parts are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Create the `users` table at startup if it is missing.
    pub synchronize: bool,
    /// Log every statement.
    pub logging: bool,
    pub max_connections: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub db: DbConfig,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset and blank values take the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let string = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let db = DbConfig {
            url: get("DATABASE_URL"),
            host: string("DB_HOST", "localhost"),
            port: parse(&get, "DB_PORT", 5432)?,
            username: string("DB_USERNAME", "postgres"),
            password: string("DB_PASSWORD", "password"),
            database: string("DB_DATABASE", "crud_backend"),
            synchronize: flag(&get, "DB_SYNCHRONIZE")?,
            logging: flag(&get, "DB_LOGGING")?,
            max_connections: parse(&get, "DB_MAX_CONNECTIONS", 5)?,
        };
        Ok(Config {
            db,
            host: string("HOST", "0.0.0.0"),
            port: parse(&get, "PORT", 3000)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DbConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let opts = match &self.url {
            Some(url) => PgConnectOptions::from_str(url).map_err(|_| ConfigError::InvalidValue {
                var: "DATABASE_URL",
                value: redact(url),
            })?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.username)
                .password(&self.password)
                .database(&self.database)
                .ssl_mode(PgSslMode::Prefer),
        };
        // Statements are emitted on the `sqlx::query` target; main raises it when logging is on.
        Ok(if self.logging { opts } else { opts.disable_statement_logging() })
    }
}

fn parse<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue { var: key, value: v }),
    }
}

fn flag<G>(get: &G, key: &'static str) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" => Ok(false),
        Some(v) => Err(ConfigError::InvalidValue { var: key, value: v }),
    }
}

fn redact(url: &str) -> String {
    match url.split_once('@') {
        Some((_, rest)) => format!("***@{}", rest),
        None => url.to_string(),
    }
}

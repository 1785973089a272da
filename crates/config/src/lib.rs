use dotenv::dotenv;
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub store_timeout: Duration,
}

impl Config {
    /// Load configuration from the environment, after reading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_seconds: u64 = parse_or(&lookup, "STORE_TIMEOUT_SECONDS", 5)?;
        if timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                key: "STORE_TIMEOUT_SECONDS",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "students.db".to_string()),
            api_host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: parse_or(&lookup, "PORT", 5000)?,
            store_timeout: Duration::from_secs(timeout_seconds),
        })
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn log_summary(&self) {
        info!("📋 Configuration loaded:");
        info!("  🗄️  Store: {}", self.database_url);
        info!("  🌐 API Server: {}", self.api_address());
        info!("  ⏱️  Store timeout: {}s", self.store_timeout.as_secs());
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("{} ({:?})", e, raw),
        }),
        None => Ok(default),
    }
}

use std::env;
use std::net::IpAddr;
use std::num::ParseIntError;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;
use todo_storage::StorageConfig;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_STATIC_DIR: &str = "packages/dashboard";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
    #[error("Invalid max connections: {0}")]
    InvalidMaxConnections(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub cors_origin: String,
    pub static_dir: PathBuf,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host_str = lookup("TODO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_str
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_str))?;

        let port = match lookup("PORT") {
            Some(port_str) => port_str.trim().parse::<u16>()?,
            None => DEFAULT_PORT,
        };
        validate_port(port)?;

        let database_path = lookup("TODO_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(todo_core::database_file);

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        validate_cors_origin(&cors_origin)?;

        let static_dir = lookup("TODO_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let max_connections = match lookup("TODO_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidMaxConnections(raw)),
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            host,
            port,
            database_path,
            cors_origin,
            static_dir,
            max_connections,
        })
    }

    /// Override the port, keeping the same range rule as the environment
    pub fn with_port(mut self, port: u16) -> Result<Self, ConfigError> {
        validate_port(port)?;
        self.port = port;
        Ok(self)
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            database_path: self.database_path.clone(),
            max_connections: self.max_connections,
            ..StorageConfig::default()
        }
    }
}

fn validate_port(port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(())
}

fn validate_cors_origin(origin: &str) -> Result<(), ConfigError> {
    let valid_scheme = origin.starts_with("http://") || origin.starts_with("https://");
    if !valid_scheme || HeaderValue::from_str(origin).is_err() {
        return Err(ConfigError::InvalidCorsOrigin(origin.to_string()));
    }
    Ok(())
}

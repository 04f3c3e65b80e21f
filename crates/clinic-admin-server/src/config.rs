//! Server settings read from `CLINIC_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "0.0.0.0:5001";
pub const DEFAULT_DB_PATH: &str = "clinic.sqlite";
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
/// One year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 3600;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma list; `*` anywhere in it allows every origin.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            CorsOrigins::Any => true,
            CorsOrigins::List(origins) => origins.iter().any(|o| o == origin),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub log_json: bool,
    pub cors_origins: CorsOrigins,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("CLINIC_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "CLINIC_BIND",
            value: bind_raw.clone(),
        })?;

        let jwt_secret = lookup("CLINIC_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("CLINIC_JWT_SECRET"))?;

        let token_ttl_secs = match lookup("CLINIC_TOKEN_TTL_SECS") {
            None => DEFAULT_TOKEN_TTL_SECS,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|n| (1..=MAX_TOKEN_TTL_SECS).contains(n))
                .ok_or(ConfigError::Invalid {
                    name: "CLINIC_TOKEN_TTL_SECS",
                    value: raw,
                })?,
        };

        Ok(Self {
            bind,
            db_path: lookup("CLINIC_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            jwt_secret,
            token_ttl_secs,
            log_json: lookup("CLINIC_LOG_JSON")
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(false),
            cors_origins: CorsOrigins::parse(
                lookup("CLINIC_CORS_ORIGINS").as_deref().unwrap_or("*"),
            ),
        })
    }
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

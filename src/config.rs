/*
 * Responsibility
 * - load settings from the environment (upstream addresses, timeouts, limits)
 * - validate them (missing or malformed values fail startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Upstreams (resolved addresses; how they were provisioned is not our concern)
    pub auth_service_url: Url,
    pub patient_service_url: Url,

    // Authority call: single attempt, fixed timeout, fail closed
    pub auth_validate_timeout: Duration,
    pub auth_connect_timeout: Duration,

    pub upstream_timeout: Duration,
    pub request_body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match lookup("GATEWAY_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("GATEWAY_PORT"))?,
            None => 4004,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("GATEWAY_PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let auth_service_url = upstream_url(&lookup, "AUTH_SERVICE_URL")?;
        let patient_service_url = upstream_url(&lookup, "PATIENT_SERVICE_URL")?;

        let auth_validate_timeout = Duration::from_millis(
            lookup("AUTH_VALIDATE_TIMEOUT_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(2_000),
        );

        let auth_connect_timeout = Duration::from_millis(
            lookup("AUTH_CONNECT_TIMEOUT_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(500),
        );

        let upstream_timeout = Duration::from_secs(
            lookup("UPSTREAM_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        let request_body_limit = lookup("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            auth_service_url,
            patient_service_url,
            auth_validate_timeout,
            auth_connect_timeout,
            upstream_timeout,
            request_body_limit,
        })
    }
}

fn upstream_url(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Url, ConfigError> {
    let raw = lookup(key).ok_or(ConfigError::Missing(key))?;
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid(key))?;

    // Only http(s) origins can be proxied to
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ConfigError::Invalid(key)),
    }
}

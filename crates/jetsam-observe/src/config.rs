//! Startup configuration for the `serve` surface.
//!
//! Values arrive already parsed (flags with environment fallbacks) and are
//! checked once by [`ServiceConfig::validate`] before anything binds.

use crate::metrics::TracingMetricSink;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x7f1ed3d3aac8903f869eeb32182265dc34106353";
pub const DEFAULT_APP_NAME: &str = "jetsam";
const DATABASE_NAME: &str = "postgres";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("invalid contract address `{0}`: expected 0x followed by 40 hex digits")]
    InvalidAddress(String),

    #[error("stats period must be non-zero")]
    ZeroPeriod,

    #[error("endpoint `{0}` looks like a URL; only a chain fixture file path is supported")]
    EndpointNotFile(String),
}

/// Credentials for the indexer database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: String,
}

impl DatabaseConfig {
    /// Connection settings with the password masked, for logs.
    pub fn redacted(&self) -> String {
        format!(
            "user={} dbname={DATABASE_NAME} sslmode=require password=*** host={}",
            self.username.as_deref().unwrap_or_default(),
            self.hostname
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("hostname", &self.hostname)
            .finish()
    }
}

/// Optional APM settings. Without a license key metrics are only logged.
#[derive(Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub license_key: Option<String>,
    pub app_name: String,
}

impl TelemetryConfig {
    pub fn enabled(&self) -> bool {
        self.license_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    pub fn metric_sink(&self) -> TracingMetricSink {
        TracingMetricSink::new(self.enabled().then(|| self.app_name.clone()))
    }
}

impl fmt::Debug for TelemetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelemetryConfig")
            .field("license_key", &self.license_key.as_ref().map(|_| "***"))
            .field("app_name", &self.app_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind: SocketAddr,
    /// Chain fixture the reader answers from.
    pub endpoint: PathBuf,
    pub address: String,
    pub ledger: PathBuf,
    pub database: DatabaseConfig,
    pub telemetry: TelemetryConfig,
    pub stats_period: Duration,
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), StartupError> {
        require("DB_USERNAME", self.database.username.as_deref())?;
        require("DB_PASSWORD", self.database.password.as_deref())?;
        validate_address(&self.address)?;
        validate_endpoint(&self.endpoint)?;
        if self.stats_period.is_zero() {
            return Err(StartupError::ZeroPeriod);
        }
        Ok(())
    }
}

fn require(name: &'static str, value: Option<&str>) -> Result<(), StartupError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(StartupError::MissingSetting(name)),
    }
}

/// `0x` followed by exactly 40 hex digits, either case.
pub fn validate_address(address: &str) -> Result<(), StartupError> {
    let valid = address
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(StartupError::InvalidAddress(address.to_string()))
    }
}

/// The endpoint must be a chain fixture path, not an RPC URL.
pub fn validate_endpoint(endpoint: &Path) -> Result<(), StartupError> {
    let text = endpoint.to_string_lossy();
    if text.contains("://") {
        Err(StartupError::EndpointNotFile(text.into_owned()))
    } else {
        Ok(())
    }
}

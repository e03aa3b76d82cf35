//! Configuration management
//!
//! YAML-based configuration with environment variable override for the file
//! location, defaults for every setting, and a `.env` convenience loader.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// SMS provider credentials; when absent the dispatcher runs in the
    /// degraded "service not configured" mode
    #[serde(default)]
    pub sms: Option<SmsConfig>,
    #[serde(default)]
    pub donor: DonorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret for signing HS256 tokens; must be set in the config file
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: u64,
}

/// Twilio SMS provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender phone number in E.164 format
    pub from_phone: String,
    /// Provider API base URL; overridable so tests can point at a mock server
    #[serde(default = "default_sms_api_base")]
    pub api_base: String,
    #[serde(default = "default_sms_timeout")]
    pub timeout_secs: u64,
}

/// Donor lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DonorConfig {
    /// Days a donor profile stays available after (re-)registration
    #[serde(default = "default_expiry_days")]
    pub expiry_days: i64,
    /// Hours between background expiry sweeps
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,
}

impl Default for DonorConfig {
    fn default() -> Self {
        Self {
            expiry_days: default_expiry_days(),
            sweep_interval_hours: default_sweep_interval_hours(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub target: LogTarget,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,
    #[serde(default = "default_log_rotation")]
    pub daily_rotation: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            daily_rotation: default_log_rotation(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    #[default]
    Console,
    File,
    Both,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5050
}

fn default_database_url() -> String {
    "sqlite://data/bloodlink.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_token_expiry_hours() -> u64 {
    720
}

fn default_sms_api_base() -> String {
    "https://api.twilio.com".to_string()
}

fn default_sms_timeout() -> u64 {
    10
}

fn default_expiry_days() -> i64 {
    crate::models::DEFAULT_EXPIRY_DAYS
}

fn default_sweep_interval_hours() -> u64 {
    12
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_prefix() -> String {
    "bloodlink.log".to_string()
}

fn default_log_rotation() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from the standard locations
    ///
    /// Order: `BLOODLINK_CONFIG` env var, then `./config.yaml`, then
    /// `/etc/bloodlink/config.yaml`.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("BLOODLINK_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::find_config_file)
            .context("No configuration file found (set BLOODLINK_CONFIG or create config.yaml)")?;

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_norway::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            PathBuf::from("config.yaml"),
            PathBuf::from("/etc/bloodlink/config.yaml"),
        ];

        paths.into_iter().find(|p| p.exists())
    }
}

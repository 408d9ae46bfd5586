//! Configuration types

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::{Result, ScanError};
use crate::common::types::{DateField, TradeType};

/// Main application configuration
///
/// Built once at startup and handed to the scanner; nothing below this
/// struct reads the process environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Disclosure source configuration
    #[serde(default)]
    pub source: SourceConfig,
    /// Trade filtering criteria
    #[serde(default)]
    pub filter: FilterConfig,
    /// Outbound mail account and recipient
    #[serde(default)]
    pub mail: MailConfig,
    /// Seen-set persistence
    #[serde(default)]
    pub store: StoreConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Reject configurations the scanner cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.mail.username.is_none() {
            return Err(ScanError::Configuration(
                "mail.username is required (EMAIL_USER)".to_string(),
            ));
        }
        if self.mail.password.is_none() {
            return Err(ScanError::Configuration(
                "mail.password is required (EMAIL_PASS)".to_string(),
            ));
        }
        if self.mail.recipient.is_none() {
            return Err(ScanError::Configuration(
                "mail.recipient is required (RECEIVER_EMAIL)".to_string(),
            ));
        }
        if self.source.fetch_count == 0 {
            return Err(ScanError::Configuration(
                "source.fetch_count must be at least 1".to_string(),
            ));
        }
        if self.store.max_entries == 0 {
            return Err(ScanError::Configuration(
                "store.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Disclosure source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the disclosure site
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// How many screener rows to request per fetch
    #[serde(default = "default_fetch_count")]
    pub fetch_count: u32,
    /// Per-request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header presented to the source
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_count: default_fetch_count(),
            timeout_seconds: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://openinsider.com".to_string()
}

fn default_fetch_count() -> u32 {
    100
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

/// Trade filtering criteria
///
/// An absent bound means no constraint on that axis. All configured
/// bounds must hold for a trade to qualify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Restrict to a single transaction kind
    #[serde(default = "default_required_trade_type")]
    pub required_trade_type: Option<TradeType>,
    /// Inclusive lower bound on trade value, in dollars
    #[serde(default)]
    pub minimum_value: Option<Decimal>,
    /// Inclusive lower bound on the configured date field (YYYY-MM-DD)
    #[serde(default)]
    pub earliest_date: Option<NaiveDate>,
    /// Which date field `earliest_date` applies to
    #[serde(default)]
    pub date_field: DateField,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            required_trade_type: default_required_trade_type(),
            minimum_value: None,
            earliest_date: None,
            date_field: DateField::default(),
        }
    }
}

fn default_required_trade_type() -> Option<TradeType> {
    Some(TradeType::Purchase)
}

/// Outbound mail account and recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port; 465 speaks implicit TLS
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Account username, also the sender login
    #[serde(default)]
    pub username: Option<String>,
    /// Account password or app password
    #[serde(default)]
    pub password: Option<String>,
    /// From address; falls back to the username
    #[serde(default)]
    pub from: Option<String>,
    /// Recipient address for alert digests
    #[serde(default)]
    pub recipient: Option<String>,
    /// Delivery timeout in seconds
    #[serde(default = "default_mail_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from: None,
            recipient: None,
            timeout_seconds: default_mail_timeout(),
        }
    }
}

impl MailConfig {
    /// Effective From address
    pub fn from_address(&self) -> Option<&str> {
        self.from.as_deref().or(self.username.as_deref())
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_mail_timeout() -> u64 {
    30
}

/// Seen-set persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON Lines seen-set file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Retention cap; oldest entries beyond this are pruned
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("seen_trades.jsonl")
}

fn default_max_entries() -> usize {
    5_000
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Seconds between scan cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval() -> u64 {
    300
}

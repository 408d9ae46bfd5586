//! Configuration loader

use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use config::{Config, Environment, File};
use rust_decimal::Decimal;

use super::types::{AppConfig, AppSettings, FilterConfig, MailConfig, SourceConfig, StoreConfig};
use crate::common::errors::{Result, ScanError};
use crate::common::types::{DateField, TradeType};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Legacy environment variables (EMAIL_USER, EMAIL_PASS, RECEIVER_EMAIL)
/// 2. Environment variables prefixed with SCANNER (keys joined with `__`,
///    e.g. SCANNER__FILTER__MINIMUM_VALUE)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    // Add default config file if it exists
    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // Add environment variables with the SCANNER prefix
    builder = builder.add_source(
        Environment::with_prefix("SCANNER")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ScanError::Configuration(e.to_string()))?;

    let mut app: AppConfig = config
        .try_deserialize()
        .map_err(|e| ScanError::Configuration(e.to_string()))?;

    apply_legacy_env(&mut app);
    app.validate()?;
    Ok(app)
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let source = SourceConfig {
        base_url: std::env::var("SCANNER_BASE_URL")
            .unwrap_or_else(|_| "http://openinsider.com".to_string()),
        fetch_count: env_parse("SCANNER_FETCH_COUNT").unwrap_or(100),
        timeout_seconds: env_parse("SCANNER_FETCH_TIMEOUT").unwrap_or(30),
        ..SourceConfig::default()
    };

    let filter = FilterConfig {
        // "any" lifts the trade-type constraint entirely
        required_trade_type: match std::env::var("SCANNER_TRADE_TYPE") {
            Ok(v) if v.eq_ignore_ascii_case("any") => None,
            Ok(v) => Some(TradeType::from_label(&v)),
            Err(_) => Some(TradeType::Purchase),
        },
        minimum_value: env_parse::<Decimal>("SCANNER_MIN_VALUE"),
        earliest_date: env_parse::<NaiveDate>("SCANNER_EARLIEST_DATE"),
        date_field: match std::env::var("SCANNER_DATE_FIELD") {
            Ok(v) if v.eq_ignore_ascii_case("filing_date") => DateField::FilingDate,
            _ => DateField::TradeDate,
        },
    };

    let mail = MailConfig {
        smtp_host: std::env::var("SCANNER_SMTP_HOST")
            .unwrap_or_else(|_| "smtp.gmail.com".to_string()),
        smtp_port: env_parse("SCANNER_SMTP_PORT").unwrap_or(465),
        username: std::env::var("EMAIL_USER").ok(),
        password: std::env::var("EMAIL_PASS").ok(),
        from: std::env::var("SCANNER_MAIL_FROM").ok(),
        recipient: std::env::var("RECEIVER_EMAIL").ok(),
        ..MailConfig::default()
    };

    let store = StoreConfig {
        path: std::env::var("SCANNER_STORE_PATH")
            .unwrap_or_else(|_| "seen_trades.jsonl".to_string())
            .into(),
        max_entries: env_parse("SCANNER_MAX_SEEN_ENTRIES").unwrap_or(5_000),
    };

    let settings = AppSettings {
        poll_interval_seconds: env_parse("SCANNER_POLL_INTERVAL").unwrap_or(300),
        ..AppSettings::default()
    };

    let config = AppConfig {
        source,
        filter,
        mail,
        store,
        settings,
    };
    config.validate()?;
    Ok(config)
}

/// Mail variable names used by earlier deployments of this scanner
fn apply_legacy_env(config: &mut AppConfig) {
    if let Ok(user) = std::env::var("EMAIL_USER") {
        config.mail.username = Some(user);
    }
    if let Ok(pass) = std::env::var("EMAIL_PASS") {
        config.mail.password = Some(pass);
    }
    if let Ok(recipient) = std::env::var("RECEIVER_EMAIL") {
        config.mail.recipient = Some(recipient);
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

//! OpenInsider Scanner Library
//!
//! A Rust library for polling the openinsider.com screener, filtering
//! newly disclosed insider trades, and emailing an alert digest exactly
//! once per disclosure.

pub mod common;
pub mod config;
pub mod notify;
pub mod openinsider;
pub mod pipeline;

// Re-export commonly used types
pub use common::errors::{Result, RowRejection, ScanError};
pub use common::traits::Notifier;
pub use common::types::{DateField, Fingerprint, ScanReport, TradeRecord, TradeType};
pub use config::loader::{load_config, load_from_env};
pub use config::types::{
    AppConfig, AppSettings, FilterConfig, MailConfig, SourceConfig, StoreConfig,
};
pub use notify::digest::build_digest;
pub use notify::email::SmtpNotifier;
pub use openinsider::fetch::DisclosureFetcher;
pub use openinsider::normalize::normalize_row;
pub use openinsider::table::{parse_tables, select_table, HtmlTable, RawRow, REQUIRED_COLUMNS};
pub use pipeline::filter::TradeFilter;
pub use pipeline::fingerprint::fingerprint;
pub use pipeline::scanner::Scanner;
pub use pipeline::seen_set::{SeenEntry, SeenSetStore};

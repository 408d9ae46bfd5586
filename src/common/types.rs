//! Core domain types shared across the scanner

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of insider transaction, collapsed from the source's type labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Purchase,
    Sale,
    Other,
}

impl TradeType {
    /// Map a source trade-type label onto the enum
    ///
    /// The screener labels transactions with a letter code and a
    /// description, e.g. `"P - Purchase"` or `"S - Sale+OE"`. Bare words
    /// ("purchase") are accepted too so the same parser serves config
    /// values.
    pub fn from_label(label: &str) -> Self {
        let lowered = label.trim().to_lowercase();
        if lowered == "p" || lowered.starts_with("p -") || lowered.contains("purchase") {
            TradeType::Purchase
        } else if lowered == "s" || lowered.starts_with("s -") || lowered.contains("sale") {
            TradeType::Sale
        } else {
            TradeType::Other
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Purchase => write!(f, "Purchase"),
            TradeType::Sale => write!(f, "Sale"),
            TradeType::Other => write!(f, "Other"),
        }
    }
}

/// Which `TradeRecord` date an earliest-date bound applies to
///
/// Filing date and trade date routinely differ by days; mixing them up
/// causes silent misses, so the choice is always explicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateField {
    #[default]
    TradeDate,
    FilingDate,
}

/// One disclosed insider transaction, normalized from a raw screener row
///
/// Constructed fresh each scan and never mutated. `value` is the absolute
/// dollar magnitude of the transaction; `quantity` keeps its sign (sales
/// are negative).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    /// Stock symbol, upper-cased, ASCII-alphabetic
    pub ticker: String,
    /// Insider's name as published
    pub insider_name: String,
    /// Insider's role, when the source provides one
    pub title: Option<String>,
    pub trade_type: TradeType,
    /// Per-share price
    pub price: Decimal,
    /// Share count, negative for dispositions
    pub quantity: i64,
    /// Absolute dollar value of the transaction
    pub value: Decimal,
    pub filing_date: NaiveDate,
    pub trade_date: NaiveDate,
}

impl TradeRecord {
    /// Date selected by a [`DateField`]
    pub fn date(&self, field: DateField) -> NaiveDate {
        match field {
            DateField::TradeDate => self.trade_date,
            DateField::FilingDate => self.filing_date,
        }
    }
}

/// Stable identifier for one disclosure, as a lowercase hex digest
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(hex_digest: String) -> Self {
        Self(hex_digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counters from one scan cycle, surfaced in logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Rows the selected table exposed
    pub rows_parsed: usize,
    /// Rows dropped by the normalizer
    pub rows_rejected: usize,
    /// Rows that passed the filter (seen or not)
    pub rows_eligible: usize,
    /// Rows that were both eligible and unseen
    pub new_trades: usize,
    /// Seen-set entries dropped by the retention cap
    pub pruned: usize,
}

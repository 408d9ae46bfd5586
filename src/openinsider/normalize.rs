//! Row normalization from raw screener cells to typed trade records

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::table::RawRow;
use crate::common::errors::RowRejection;
use crate::common::types::{TradeRecord, TradeType};

/// Canonical form of a column label
///
/// Non-breaking spaces are flattened to plain spaces, the label is
/// lower-cased, and runs of whitespace become single underscores. The
/// source's header spelling drifts across fetches, so every column lookup
/// goes through this.
pub fn canonical_column(raw: &str) -> String {
    raw.replace('\u{a0}', " ")
        .replace("&nbsp;", " ")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert one raw row into a [`TradeRecord`], or reject it
///
/// A rejection drops this row only; the rest of the batch continues.
pub fn normalize_row(row: &RawRow) -> Result<TradeRecord, RowRejection> {
    let ticker_raw = field(row, "ticker")?.trim();
    if !valid_ticker(ticker_raw) {
        return Err(RowRejection::InvalidTicker(ticker_raw.to_string()));
    }
    let ticker = ticker_raw.to_ascii_uppercase();

    let insider_name = field(row, "insider_name")?.trim().to_string();
    let title = row
        .get("title")
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from);
    let trade_type = TradeType::from_label(field(row, "trade_type")?);

    let price_raw = field(row, "price")?;
    let price = parse_money("price", price_raw)?;
    if price < Decimal::ZERO {
        return Err(RowRejection::BadNumber {
            field: "price",
            raw: price_raw.to_string(),
        });
    }

    let quantity = parse_quantity("qty", field(row, "qty")?)?;
    // Sales are published with a leading minus; the record keeps the
    // absolute dollar magnitude.
    let value = parse_money("value", field(row, "value")?)?.abs();
    let filing_date = parse_date("filing_date", field(row, "filing_date")?)?;
    let trade_date = parse_date("trade_date", field(row, "trade_date")?)?;

    Ok(TradeRecord {
        ticker,
        insider_name,
        title,
        trade_type,
        price,
        quantity,
        value,
        filing_date,
        trade_date,
    })
}

fn field<'a>(row: &'a RawRow, name: &'static str) -> Result<&'a str, RowRejection> {
    row.get(name)
        .map(String::as_str)
        .ok_or(RowRejection::MissingColumn(name))
}

/// Strip the decorations the source puts on numbers: dollar signs,
/// thousands separators, explicit plus signs
fn clean_number(raw: &str) -> String {
    raw.trim().replace(['$', ',', '+'], "")
}

fn parse_money(field: &'static str, raw: &str) -> Result<Decimal, RowRejection> {
    clean_number(raw).parse().map_err(|_| RowRejection::BadNumber {
        field,
        raw: raw.to_string(),
    })
}

fn parse_quantity(field: &'static str, raw: &str) -> Result<i64, RowRejection> {
    clean_number(raw).parse().map_err(|_| RowRejection::BadNumber {
        field,
        raw: raw.to_string(),
    })
}

/// Trade dates arrive as `YYYY-MM-DD`; filing dates carry a time component
/// (`YYYY-MM-DD HH:MM:SS`). Only the calendar date matters here.
fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, RowRejection> {
    let token = raw.split_whitespace().next().unwrap_or("");
    token.parse().map_err(|_| RowRejection::BadDate {
        field,
        raw: raw.to_string(),
    })
}

/// Real disclosures carry plain alphabetic tickers; anything else is an
/// advertisement or footer artifact row
fn valid_ticker(ticker: &str) -> bool {
    !ticker.is_empty() && ticker.chars().all(|c| c.is_ascii_alphabetic())
}

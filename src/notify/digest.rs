//! Digest rendering: one subject and body per batch of new trades

use rust_decimal::Decimal;

use crate::common::types::{TradeRecord, TradeType};

/// Render the alert digest for a batch of new trades
///
/// A single trade gets a subject naming the ticker and insider; a batch
/// gets a count. The body carries one block per trade, blank-line
/// separated, readable in any plain-text mail client.
pub fn build_digest(trades: &[&TradeRecord]) -> (String, String) {
    let subject = match trades {
        [only] => format!(
            "🚀 Insider alert: {} {} by {}",
            only.ticker,
            verb(only.trade_type),
            only.insider_name
        ),
        _ => format!("🚀 Insider alert: {} new insider trades", trades.len()),
    };

    let body = trades
        .iter()
        .map(|trade| trade_block(trade))
        .collect::<Vec<_>>()
        .join("\n\n");

    (subject, body)
}

fn verb(trade_type: TradeType) -> &'static str {
    match trade_type {
        TradeType::Purchase => "bought",
        TradeType::Sale => "sold",
        TradeType::Other => "traded",
    }
}

fn trade_block(trade: &TradeRecord) -> String {
    let insider = match &trade.title {
        Some(title) => format!("{} ({})", trade.insider_name, title),
        None => trade.insider_name.clone(),
    };
    format!(
        "Ticker: {}\n\
         Insider: {}\n\
         Trade type: {}\n\
         Amount: {}\n\
         Price: {}\n\
         Trade date: {}\n\
         Link: http://openinsider.com/{}",
        trade.ticker,
        insider,
        trade.trade_type,
        format_dollars(trade.value),
        format_dollars(trade.price),
        trade.trade_date,
        trade.ticker,
    )
}

/// Dollar rendering with thousands separators and at most two decimals
///
/// Equal amounts render identically regardless of how many trailing
/// zeros the source printed them with.
fn format_dollars(amount: Decimal) -> String {
    let canonical = amount.round_dp(2).normalize().to_string();
    let (integer, fraction) = match canonical.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (canonical.as_str(), None),
    };
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("${}{}.{:0<2}", sign, grouped, fraction),
        None => format!("${}{}", sign, grouped),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Common test utilities and fixtures

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use openinsider_scanner::common::errors::{Result, ScanError};
use openinsider_scanner::common::traits::Notifier;

/// One row of the fake screener page, in the source's own cell formats
#[derive(Debug, Clone)]
pub struct ScreenerRow {
    pub filing_date: String,
    pub trade_date: String,
    pub ticker: String,
    pub company: String,
    pub insider: String,
    pub title: String,
    pub trade_type: String,
    pub price: String,
    pub qty: String,
    pub owned: String,
    pub delta_own: String,
    pub value: String,
}

impl ScreenerRow {
    /// A purchase row, formatted the way the live screener publishes one
    pub fn purchase(ticker: &str, insider: &str, value: &str, trade_date: &str) -> Self {
        Self {
            filing_date: format!("{} 16:30:02", trade_date),
            trade_date: trade_date.to_string(),
            ticker: ticker.to_string(),
            company: format!("{} Corp", ticker),
            insider: insider.to_string(),
            title: "CFO".to_string(),
            trade_type: "P - Purchase".to_string(),
            price: "$12.50".to_string(),
            qty: "+6,000".to_string(),
            owned: "66,000".to_string(),
            delta_own: "+10%".to_string(),
            value: value.to_string(),
        }
    }

    /// A sale row; quantity and value carry the leading minus
    pub fn sale(ticker: &str, insider: &str, value: &str, trade_date: &str) -> Self {
        Self {
            trade_type: "S - Sale".to_string(),
            qty: "-6,000".to_string(),
            delta_own: "-10%".to_string(),
            ..Self::purchase(ticker, insider, value, trade_date)
        }
    }

    /// An advertisement artifact like the ones mixed into the real page
    pub fn advertisement() -> Self {
        Self {
            filing_date: "Sponsored".to_string(),
            trade_date: String::new(),
            ticker: "AD123".to_string(),
            company: "Sponsored placement".to_string(),
            insider: String::new(),
            title: String::new(),
            trade_type: String::new(),
            price: String::new(),
            qty: String::new(),
            owned: String::new(),
            delta_own: String::new(),
            value: "Learn more".to_string(),
        }
    }
}

/// Render rows into a page shaped like the live screener
///
/// The data table sits nested inside a layout table, uses `&nbsp;` in its
/// headers, and wraps cells in links and bold tags, so anything that
/// survives this fixture survives the real page.
pub fn screener_page(rows: &[ScreenerRow]) -> String {
    let mut body_rows = String::new();
    for row in rows {
        body_rows.push_str(&format!(
            concat!(
                "<tr>",
                "<td>D</td>",
                "<td><a href=\"/screener-detail\">{filing}</a></td>",
                "<td>{trade}</td>",
                "<td><b><a href=\"/{ticker}\">{ticker}</a></b></td>",
                "<td><a href=\"/{ticker}\">{company}</a></td>",
                "<td><a href=\"/insider\">{insider}</a></td>",
                "<td>{title}</td>",
                "<td>{trade_type}</td>",
                "<td>{price}</td>",
                "<td>{qty}</td>",
                "<td>{owned}</td>",
                "<td>{delta}</td>",
                "<td><b>{value}</b></td>",
                "</tr>\n",
            ),
            filing = row.filing_date,
            trade = row.trade_date,
            ticker = row.ticker,
            company = row.company,
            insider = row.insider,
            title = row.title,
            trade_type = row.trade_type,
            price = row.price,
            qty = row.qty,
            owned = row.owned,
            delta = row.delta_own,
            value = row.value,
        ));
    }

    format!(
        concat!(
            "<html><head><title>Insider Trading Screener</title></head>\n",
            "<body>\n",
            "<table width=\"100%\"><tr><td><a href=\"/\">Home</a></td>",
            "<td><a href=\"/insider-purchases\">Latest Insider Purchases</a></td></tr></table>\n",
            "<table width=\"100%\"><tr><td>\n",
            "<table class=\"tinytable\">\n",
            "<thead><tr><th>X</th><th>Filing&nbsp;Date</th><th>Trade&nbsp;Date</th>",
            "<th>Ticker</th><th>Company&nbsp;Name</th><th>Insider&nbsp;Name</th><th>Title</th>",
            "<th>Trade&nbsp;Type</th><th>Price</th><th>Qty</th><th>Owned</th>",
            "<th>ΔOwn</th><th>Value</th></tr></thead>\n",
            "<tbody>\n{rows}</tbody>\n",
            "</table>\n",
            "</td></tr></table>\n",
            "<table><tr><td>&copy; 2026 openinsider.com</td></tr></table>\n",
            "</body></html>\n",
        ),
        rows = body_rows
    )
}

/// Notifier that records every delivery for later assertions
///
/// Clones share the same recording, so a test can keep one handle and
/// box another into the scanner.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "recording"
    }
}

/// Notifier whose deliveries always fail
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn deliver(&self, _subject: &str, _body: &str) -> Result<()> {
        Err(ScanError::Delivery("relay refused the message".to_string()))
    }

    fn channel_name(&self) -> &'static str {
        "failing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_embeds_rows_inside_the_data_table() {
        let page = screener_page(&[ScreenerRow::purchase(
            "ABC",
            "Doe John",
            "+$75,000",
            "2026-03-01",
        )]);
        assert!(page.contains("tinytable"));
        assert!(page.contains(">ABC</a>"));
        assert!(page.contains("+$75,000"));
    }

    #[tokio::test]
    async fn recording_notifier_accumulates_deliveries() {
        let notifier = RecordingNotifier::new();
        let handle = notifier.clone();
        notifier.deliver("subject", "body").await.unwrap();
        assert_eq!(
            handle.deliveries(),
            vec![("subject".to_string(), "body".to_string())]
        );
    }
}

//! HTTP fetch client for the OpenInsider screener

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::common::errors::{Result, ScanError};
use crate::common::types::TradeType;
use crate::config::types::{FilterConfig, SourceConfig};

/// Fetch client for the screener page
///
/// The screener endpoint and its query string are fixed at construction;
/// one `fetch_latest` call performs one bounded GET.
#[derive(Debug, Clone)]
pub struct DisclosureFetcher {
    /// HTTP client with the per-request timeout baked in
    client: Client,
    /// Fully-built screener URL
    url: Url,
}

impl DisclosureFetcher {
    /// Create a fetcher for an explicit URL
    pub fn new(url: Url, timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ScanError::Configuration(e.to_string()))?;

        Ok(Self { client, url })
    }

    /// Create a fetcher from configuration
    ///
    /// Filter bounds that the screener understands (trade type, minimum
    /// value) are pushed into the query string so the server pre-filters;
    /// the local filter still enforces every bound on whatever comes back.
    pub fn from_config(source: &SourceConfig, filter: &FilterConfig) -> Result<Self> {
        let url = screener_url(source, filter)?;
        Self::new(
            url,
            Duration::from_secs(source.timeout_seconds),
            &source.user_agent,
        )
    }

    /// The URL this fetcher polls
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the current screener page body
    #[instrument(skip(self))]
    pub async fn fetch_latest(&self) -> Result<String> {
        debug!("Fetching disclosures from: {}", self.url);

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched screener page");
        Ok(body)
    }
}

/// Build the screener URL for the configured source and filter
pub fn screener_url(source: &SourceConfig, filter: &FilterConfig) -> Result<Url> {
    let base = format!("{}/screener-opt", source.base_url.trim_end_matches('/'));

    let mut params: Vec<(&str, String)> = vec![
        ("cnt", source.fetch_count.to_string()),
        ("sortcol", "0".to_string()),
    ];
    // Screener type codes: p = purchases, s = sales
    match filter.required_trade_type {
        Some(TradeType::Purchase) => params.push(("t", "p".to_string())),
        Some(TradeType::Sale) => params.push(("t", "s".to_string())),
        Some(TradeType::Other) | None => {}
    }
    // The screener takes its value threshold in $ thousands; rounding down
    // keeps the server-side prefilter at least as permissive as ours.
    if let Some(min) = filter.minimum_value {
        let thousands = (min / rust_decimal::Decimal::from(1_000)).floor();
        params.push(("minval", thousands.normalize().to_string()));
    }

    Url::parse_with_params(&base, &params)
        .map_err(|e| ScanError::Configuration(format!("Invalid source URL {:?}: {}", base, e)))
}

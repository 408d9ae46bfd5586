//! One scan cycle end to end: fetch, decode, filter, dedupe, notify, persist

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::common::errors::Result;
use crate::common::traits::Notifier;
use crate::common::types::{Fingerprint, ScanReport, TradeRecord};
use crate::config::types::AppConfig;
use crate::notify::digest::build_digest;
use crate::notify::email::SmtpNotifier;
use crate::openinsider::fetch::DisclosureFetcher;
use crate::openinsider::normalize::normalize_row;
use crate::openinsider::table::{parse_tables, select_table, REQUIRED_COLUMNS};
use crate::pipeline::filter::TradeFilter;
use crate::pipeline::fingerprint::fingerprint;
use crate::pipeline::seen_set::SeenSetStore;

/// The scanner, wired once at startup and driven by the poll timer
pub struct Scanner {
    /// Screener page fetcher
    fetcher: DisclosureFetcher,
    /// Eligibility bounds
    filter: TradeFilter,
    /// Alert delivery channel
    notifier: Box<dyn Notifier>,
    /// Seen-set location, loaded fresh each cycle
    store_path: PathBuf,
    /// Retention cap applied after each persisting step
    max_seen_entries: usize,
}

impl Scanner {
    pub fn new(
        fetcher: DisclosureFetcher,
        filter: TradeFilter,
        notifier: Box<dyn Notifier>,
        store_path: impl Into<PathBuf>,
        max_seen_entries: usize,
    ) -> Self {
        Self {
            fetcher,
            filter,
            notifier,
            store_path: store_path.into(),
            max_seen_entries,
        }
    }

    /// Wire a scanner from configuration, with email delivery
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = DisclosureFetcher::from_config(&config.source, &config.filter)?;
        let filter = TradeFilter::from_config(&config.filter);
        let notifier = SmtpNotifier::from_config(&config.mail)?;

        Ok(Self::new(
            fetcher,
            filter,
            Box::new(notifier),
            config.store.path.clone(),
            config.store.max_entries,
        ))
    }

    /// URL the scanner polls
    pub fn source_url(&self) -> &str {
        self.fetcher.url().as_str()
    }

    /// Run one scan cycle
    ///
    /// New eligible trades are delivered before anything is written to
    /// disk, so a delivery failure leaves the seen set untouched and the
    /// same trades come around again next cycle. The accepted flip side
    /// is a possible repeat alert when delivery succeeds but the flush
    /// right after it fails.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        let html = self.fetcher.fetch_latest().await?;
        let tables = parse_tables(&html);
        let table = select_table(&tables, &REQUIRED_COLUMNS)?;
        report.rows_parsed = table.rows.len();

        let mut store = SeenSetStore::load(&self.store_path);

        let mut fresh: Vec<(Fingerprint, TradeRecord)> = Vec::new();
        for row in &table.rows {
            let record = match normalize_row(row) {
                Ok(record) => record,
                Err(rejection) => {
                    report.rows_rejected += 1;
                    debug!("Dropped row: {}", rejection);
                    continue;
                }
            };
            if !self.filter.matches(&record) {
                continue;
            }
            report.rows_eligible += 1;

            let fp = fingerprint(&record);
            if store.contains(&fp) || fresh.iter().any(|(picked, _)| *picked == fp) {
                continue;
            }
            fresh.push((fp, record));
        }
        report.new_trades = fresh.len();

        if fresh.is_empty() {
            debug!("No new trades this cycle");
            return Ok(report);
        }

        let records: Vec<&TradeRecord> = fresh.iter().map(|(_, record)| record).collect();
        let (subject, body) = build_digest(&records);
        info!(
            "Delivering {} new trade(s) via {}",
            fresh.len(),
            self.notifier.channel_name()
        );
        self.notifier.deliver(&subject, &body).await?;

        // Only delivered trades are remembered.
        let now = Utc::now();
        for (fp, _) in fresh {
            store.record(fp, now);
        }
        report.pruned = store.prune(self.max_seen_entries);
        store.flush()?;

        Ok(report)
    }
}

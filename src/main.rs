//! OpenInsider Scanner - Main Entry Point
//!
//! Polls the openinsider.com screener for newly disclosed insider trades,
//! filters them, and emails a digest of the ones not announced before.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use openinsider_scanner::{load_config, ScanError, ScanReport, Scanner};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Run a single scan cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting OpenInsider scanner");
    info!("Configuration file: {}", args.config);

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config))?;
    let scanner = Scanner::from_config(&config)?;
    info!("Watching {}", scanner.source_url());

    if args.once {
        let outcome = scanner.run_cycle().await;
        report_cycle(&outcome);
        outcome?;
        return Ok(());
    }

    info!(
        "Polling every {} seconds, Ctrl-C to stop",
        config.settings.poll_interval_seconds
    );
    poll_until_shutdown(
        &scanner,
        Duration::from_secs(config.settings.poll_interval_seconds),
        async {
            let _ = tokio::signal::ctrl_c().await;
        },
    )
    .await;

    Ok(())
}

/// Drive scan cycles on the poll interval until `shutdown` completes
///
/// The shutdown future is armed once, before the first cycle, so a Ctrl-C
/// arriving while a cycle is in flight still ends the loop as soon as that
/// cycle finishes. In-flight cycles always run to completion.
async fn poll_until_shutdown(
    scanner: &Scanner,
    poll_interval: Duration,
    shutdown: impl Future<Output = ()>,
) {
    // The first tick fires immediately, so startup includes a scan.
    let mut ticker = tokio::time::interval(poll_interval);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Received shutdown signal, cleaning up...");
                break;
            }
            _ = ticker.tick() => {
                report_cycle(&scanner.run_cycle().await);
            }
        }
    }
}

/// Log one cycle's outcome at a severity matching what it means
fn report_cycle(outcome: &Result<ScanReport, ScanError>) {
    match outcome {
        Ok(report) => {
            info!(
                "Cycle done: {} rows, {} rejected, {} eligible, {} new, {} pruned",
                report.rows_parsed,
                report.rows_rejected,
                report.rows_eligible,
                report.new_trades,
                report.pruned
            );
        }
        Err(e @ ScanError::Parse(_)) => {
            error!(
                "Cycle failed: {} (the screener page layout may have changed)",
                e
            );
        }
        Err(e @ (ScanError::Delivery(_) | ScanError::Timeout(_))) => {
            error!(
                "Cycle failed: {} (unannounced trades stay unseen and retry next cycle)",
                e
            );
        }
        Err(e) => {
            warn!("Cycle failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openinsider_scanner::{DisclosureFetcher, Notifier, TradeFilter};
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HEADERS_ONLY_PAGE: &str = concat!(
        "<table class=\"tinytable\"><tr>",
        "<th>X</th><th>Filing Date</th><th>Trade Date</th><th>Ticker</th>",
        "<th>Insider Name</th><th>Title</th><th>Trade Type</th>",
        "<th>Price</th><th>Qty</th><th>Value</th></tr></table>",
    );

    struct NullNotifier;

    #[async_trait::async_trait]
    impl Notifier for NullNotifier {
        async fn deliver(&self, _subject: &str, _body: &str) -> openinsider_scanner::Result<()> {
            Ok(())
        }

        fn channel_name(&self) -> &'static str {
            "null"
        }
    }

    #[tokio::test]
    async fn one_shutdown_request_during_a_cycle_stops_the_loop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/screener-opt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(HEADERS_ONLY_PAGE)
                    .set_delay(Duration::from_millis(250)),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/screener-opt", server.uri())).unwrap();
        let fetcher = DisclosureFetcher::new(url, Duration::from_secs(5), "test-agent").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let scanner = Scanner::new(
            fetcher,
            TradeFilter::default(),
            Box::new(NullNotifier),
            dir.path().join("seen.jsonl"),
            100,
        );

        let (tx, rx) = tokio::sync::oneshot::channel();
        let polling = poll_until_shutdown(&scanner, Duration::from_secs(3600), async {
            let _ = rx.await;
        });
        let request_shutdown = async {
            // Land the request while the first cycle's fetch is in flight.
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(());
        };

        let outcome = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(polling, request_shutdown);
        })
        .await;
        assert!(outcome.is_ok(), "one shutdown request did not stop the loop");
    }
}

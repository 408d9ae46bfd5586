//! Trait seams for outbound collaborators

use async_trait::async_trait;

use super::errors::Result;

/// Trait for notification delivery channels
///
/// The scan cycle only ever hands a channel one subject and one plain-text
/// body per batch of new trades. An `Err` return means nothing was
/// reliably sent, and the cycle must not mark those trades as seen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message
    async fn deliver(&self, subject: &str, body: &str) -> Result<()>;

    /// Channel name used in logs
    fn channel_name(&self) -> &'static str;
}

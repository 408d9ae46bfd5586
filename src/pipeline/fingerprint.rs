//! Stable fingerprints for deduplicating disclosures across scans

use sha2::{Digest, Sha256};

use crate::common::types::{Fingerprint, TradeRecord};

/// Prefix baked into every digest input
///
/// Bumping this invalidates all persisted fingerprints at once, which is
/// the intended way to change the identity scheme.
const FINGERPRINT_VERSION: &str = "v1";

/// Compute the identity digest for a disclosure
///
/// Identity is the (ticker, value, trade date) triple. Value goes in
/// canonicalized so `75000` and `75000.00` hash identically. Fields the
/// source re-publishes with corrections (price, title, insider spelling)
/// stay out of the digest so a touched-up row is not re-announced.
pub fn fingerprint(record: &TradeRecord) -> Fingerprint {
    let input = format!(
        "{}|{}|{}|{}",
        FINGERPRINT_VERSION,
        record.ticker,
        record.value.normalize(),
        record.trade_date
    );
    let digest = Sha256::digest(input.as_bytes());
    Fingerprint::new(hex::encode(digest))
}

//! Pipeline module - the scan cycle and its building blocks

pub mod filter;
pub mod fingerprint;
pub mod scanner;
pub mod seen_set;

pub use filter::TradeFilter;
pub use fingerprint::fingerprint;
pub use scanner::Scanner;
pub use seen_set::{SeenEntry, SeenSetStore};

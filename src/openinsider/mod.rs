//! OpenInsider module - fetching and decoding the public screener page

pub mod fetch;
pub mod normalize;
pub mod table;

pub use fetch::DisclosureFetcher;
pub use normalize::normalize_row;
pub use table::{parse_tables, select_table, HtmlTable, RawRow, REQUIRED_COLUMNS};

//! Minimal HTML table extraction for the screener page
//!
//! Deliberately naive string slicing tailored to the tables this scanner
//! reads: tags are located with ASCII-case-insensitive matching, cell text
//! is tag-stripped and entity-decoded, and nothing here knows about
//! attributes beyond skipping them. The screener page carries several
//! layout tables around the data table, so callers select by header set
//! rather than by table position.

use std::collections::HashMap;

use super::normalize::canonical_column;
use crate::common::errors::{Result, ScanError};

/// One parsed row: canonical column name -> raw cell text
pub type RawRow = HashMap<String, String>;

/// One parsed table: canonical headers plus ordered data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Columns a table must expose (canonical form) to be usable
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "ticker",
    "insider_name",
    "trade_type",
    "price",
    "qty",
    "value",
    "filing_date",
    "trade_date",
];

/// Parse every `<table>` in the document, in document order
pub fn parse_tables(html: &str) -> Vec<HtmlTable> {
    tag_blocks(html, "table")
        .into_iter()
        .map(parse_table)
        .collect()
}

/// First table whose header set covers `required`
///
/// Table position on the page is never assumed; a page where no table
/// exposes the required columns signals an upstream layout change.
pub fn select_table<'a>(tables: &'a [HtmlTable], required: &[&str]) -> Result<&'a HtmlTable> {
    tables
        .iter()
        .find(|table| {
            required
                .iter()
                .all(|column| table.headers.iter().any(|h| h == column))
        })
        .ok_or_else(|| {
            ScanError::Parse(format!(
                "no table with required columns {:?} among {} tables",
                required,
                tables.len()
            ))
        })
}

fn parse_table(block: &str) -> HtmlTable {
    // Nested tables are parsed as their own candidates; excise them here so
    // an enclosing layout table only sees its own rows and can never be
    // selected on the strength of a nested table's headers.
    let spans = tag_spans(block, "table");
    let mut cleaned = String::with_capacity(block.len());
    let mut cursor = 0;
    for &(start, end) in spans.iter().skip(1) {
        if start < cursor {
            continue;
        }
        cleaned.push_str(&block[cursor..start]);
        cursor = end.min(block.len());
    }
    cleaned.push_str(&block[cursor..]);

    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for row in tag_blocks(&cleaned, "tr") {
        let lc = row.to_ascii_lowercase();
        let cells = cell_texts(row, &lc);
        if headers.is_empty() {
            // The header row is the first one carrying <th> cells; anything
            // before it is layout noise.
            if find_tag(&lc, "<th", 0).is_some() && !cells.is_empty() {
                headers = cells.iter().map(|cell| canonical_column(cell)).collect();
            }
            continue;
        }
        if cells.is_empty() {
            continue;
        }
        let mut map = RawRow::with_capacity(headers.len());
        for (header, cell) in headers.iter().zip(cells) {
            map.insert(header.clone(), cell);
        }
        rows.push(map);
    }

    HtmlTable { headers, rows }
}

/// Complete `<tag ...>...</tag>` blocks within a fragment, document order
fn tag_blocks<'a>(fragment: &'a str, tag: &str) -> Vec<&'a str> {
    tag_spans(fragment, tag)
        .into_iter()
        .map(|(start, end)| &fragment[start..end])
        .collect()
}

/// Byte spans of each tag block, ordered by opening position
///
/// Nesting-aware: each opening tag pairs with its own closing tag, and an
/// unclosed block runs to the end of the fragment.
fn tag_spans(fragment: &str, tag: &str) -> Vec<(usize, usize)> {
    let lc = fragment.to_ascii_lowercase();
    let open_pat = format!("<{}", tag);
    let close_pat = format!("</{}", tag);

    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut opens: Vec<usize> = Vec::new();
    let mut pos = 0;

    loop {
        let next_open = find_tag(&lc, &open_pat, pos);
        let next_close = find_tag(&lc, &close_pat, pos);
        match (next_open, next_close) {
            (Some(open), Some(close)) if open < close => {
                opens.push(open);
                pos = open + open_pat.len();
            }
            (_, Some(close)) => {
                let end = match lc[close..].find('>') {
                    Some(i) => close + i + 1,
                    None => lc.len(),
                };
                if let Some(start) = opens.pop() {
                    spans.push((start, end));
                }
                pos = close + close_pat.len();
            }
            (Some(open), None) => {
                opens.push(open);
                pos = open + open_pat.len();
            }
            (None, None) => break,
        }
    }
    while let Some(start) = opens.pop() {
        spans.push((start, fragment.len()));
    }

    spans.sort_by_key(|(start, _)| *start);
    spans
}

/// Cell texts (th and td alike) within one row fragment, in order
fn cell_texts(row: &str, lc: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut pos = 0;

    while let Some(open) = next_cell_open(lc, pos) {
        let content_start = match lc[open..].find('>') {
            Some(i) => open + i + 1,
            None => break,
        };
        // A cell runs to its close tag, or to the next cell/row boundary in
        // sloppy markup.
        let mut end = row.len();
        for pat in ["</td", "</th", "<td", "<th", "</tr"] {
            if let Some(at) = find_tag(lc, pat, content_start) {
                end = end.min(at);
            }
        }
        cells.push(clean_cell(&row[content_start..end]));
        pos = end.max(content_start);
    }

    cells
}

fn next_cell_open(lc: &str, from: usize) -> Option<usize> {
    match (find_tag(lc, "<td", from), find_tag(lc, "<th", from)) {
        (Some(td), Some(th)) => Some(td.min(th)),
        (td, th) => td.or(th),
    }
}

/// Locate a tag pattern, requiring a real tag boundary after it so that
/// `<th` never matches `<thead` and `<tr` never matches inside text
fn find_tag(lc: &str, pat: &str, from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(rel) = lc.get(search..)?.find(pat) {
        let at = search + rel;
        match lc.as_bytes().get(at + pat.len()) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/')
            | None => return Some(at),
            _ => search = at + 1,
        }
    }
    None
}

/// Drop tags, decode the entities the screener actually emits, collapse
/// whitespace
fn clean_cell(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

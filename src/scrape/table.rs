//! Pulls the traffic table out of the upstream page.
//!
//! The markup is not well-formed enough for an XML parser and carries no ids,
//! so rows and cells are matched with patterns inside a window anchored on
//! `TABLE_MARKER`. Callers only see `Vec<RawRow>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::TABLE_MARKER;
use crate::error::{AppError, Result};
use crate::types::RawRow;

const TABLE_CLOSE: &str = "</table>";

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<tr>.*?</tr>").expect("row regex is valid"));
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<td.*?>.*?</td>").expect("cell regex is valid"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex is valid"));

/// Split the marker table into rows of cell text, in document order.
/// Header rows (no `<td`) are skipped; row widths are not checked.
pub fn extract_table(html: &str) -> Result<Vec<RawRow>> {
    let window = table_window(html).ok_or(AppError::TableNotFound)?;

    let rows = ROW_RE
        .find_iter(window)
        .map(|m| m.as_str())
        .filter(|row| row.contains("<td"))
        .map(|row| {
            CELL_RE
                .find_iter(row)
                .map(|cell| strip_tags(cell.as_str()))
                .collect()
        })
        .collect();

    Ok(rows)
}

/// From the marker through the next `</table>` inclusive.
/// An unterminated table runs to the end of the document.
fn table_window(html: &str) -> Option<&str> {
    let start = html.find(TABLE_MARKER)?;
    let end = html[start..]
        .find(TABLE_CLOSE)
        .map(|rel| start + rel + TABLE_CLOSE.len())
        .unwrap_or(html.len());
    Some(&html[start..end])
}

fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").trim().to_string()
}

//! Table geometry: column count and horizontal-rule policy.

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};

/// Layout facts resolved once at a table's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableGeometry {
    /// Columns of the first row, with `colspan` counted.
    pub columns: usize,
    /// Rows are separated by `\hline` (the table holds nested tables or
    /// line breaks).
    pub hline: bool,
}

impl TableGeometry {
    /// Inspect the table rooted at `table`.
    pub fn resolve(dom: &Dom, table: NodeId) -> Result<Self> {
        Ok(Self {
            columns: column_count(dom, table)?,
            hline: needs_hline(dom, table),
        })
    }
}

/// Largest `colspan` HTML allows.
pub const MAX_COLSPAN: usize = 1000;

fn invalid_colspan(value: &str) -> Error {
    Error::InvalidAttribute {
        name: "colspan",
        value: value.to_string(),
    }
}

/// Parse a `colspan` attribute value: an integer in `1..=MAX_COLSPAN`.
pub fn parse_colspan(value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_COLSPAN).contains(n))
        .ok_or_else(|| invalid_colspan(value))
}

/// Columns covered by a cell: its `colspan`, or 1 when absent or empty.
pub fn cell_span(dom: &Dom, cell: NodeId) -> Result<usize> {
    match dom.attr(cell, "colspan") {
        Some(span) if !span.trim().is_empty() => parse_colspan(span),
        _ => Ok(1),
    }
}

/// Count the columns of the first `tr` under `table`.
pub fn column_count(dom: &Dom, table: NodeId) -> Result<usize> {
    let row = dom
        .find_within(table, |dom, id| dom.is_tag(id, "tr"))
        .ok_or_else(|| Error::MissingElement("table row (<tr>)".to_string()))?;

    let mut count: usize = 0;
    for cell in dom.children(row) {
        if !matches!(dom.tag(cell), Some("td" | "th")) {
            continue;
        }
        let span = cell_span(dom, cell)?;
        count = count
            .checked_add(span)
            .ok_or_else(|| invalid_colspan(dom.attr_or_empty(cell, "colspan")))?;
    }
    Ok(count)
}

/// Whether the table's descendants include a nested `table` or a `br`.
pub fn needs_hline(dom: &Dom, table: NodeId) -> bool {
    dom.children(table).any(|child| {
        dom.find_within(child, |dom, id| dom.is_tag(id, "table") || dom.is_tag(id, "br"))
            .is_some()
    })
}

/// `tabular` column spec: one `c` per column, `|`-separated with a border.
///
/// # Examples
///
/// ```
/// use folio::latex::column_spec;
///
/// assert_eq!(column_spec(3, false), "ccc");
/// assert_eq!(column_spec(3, true), "c|c|c");
/// ```
pub fn column_spec(columns: usize, border: bool) -> String {
    let separator = if border { "|" } else { "" };
    vec!["c"; columns].join(separator)
}

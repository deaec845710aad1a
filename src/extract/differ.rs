//! Positional row diff between two consecutive snapshots of one table.
//!
//! Rows are compared by index, not by key: row `i` of the new snapshot is
//! emitted when it differs from row `i` of the previous one or has no
//! counterpart there. Rows that disappear from the end of the table produce
//! no output, they are only counted in [`TableDiff::dropped`].

use std::fmt;

use crate::snapshot::{Row, TableSnapshot};

/// Non-fatal header disagreement between the previous and new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderWarning {
    /// At least one of the two snapshots has no header at all.
    Missing,
    /// Same columns, different order.
    Reordered,
    /// Different column sets.
    Mismatch {
        previous: Vec<String>,
        new: Vec<String>,
    },
}

impl fmt::Display for HeaderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderWarning::Missing => write!(f, "CSV has no header"),
            HeaderWarning::Reordered => write!(f, "CSV header columns are reordered"),
            HeaderWarning::Mismatch { previous, new } => write!(
                f,
                "CSV headers do not match: [{}] vs [{}]",
                previous.join(","),
                new.join(",")
            ),
        }
    }
}

/// Output of [`diff`]: the delta record content plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDiff {
    pub header: Vec<String>,
    /// New or edited rows, in the new snapshot's order.
    pub changed: Vec<Row>,
    /// Trailing previous rows with no counterpart in the new snapshot.
    pub dropped: usize,
    pub header_warning: Option<HeaderWarning>,
}

impl TableDiff {
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }

    /// The delta record as a snapshot: header plus changed rows.
    pub fn into_snapshot(self) -> TableSnapshot {
        TableSnapshot::new(self.header, self.changed)
    }
}

pub fn check_headers(previous: &[String], new: &[String]) -> Option<HeaderWarning> {
    if previous.is_empty() || new.is_empty() {
        return Some(HeaderWarning::Missing);
    }
    if previous == new {
        return None;
    }

    let mut lhs = previous.to_vec();
    let mut rhs = new.to_vec();
    lhs.sort();
    rhs.sort();
    if lhs == rhs {
        Some(HeaderWarning::Reordered)
    } else {
        Some(HeaderWarning::Mismatch {
            previous: previous.to_vec(),
            new: new.to_vec(),
        })
    }
}

/// Computes the rows of `new` that are added or changed relative to
/// `previous`.
///
/// Comparison uses the raw field values. In the emitted rows, the first
/// field has its leading whitespace stripped; nothing else is altered. The
/// delta header is the new snapshot's header, or the previous one when the
/// new snapshot has none.
pub fn diff(previous: &TableSnapshot, new: &TableSnapshot) -> TableDiff {
    let header_warning = check_headers(previous.header(), new.header());

    let prev_rows = previous.rows();
    let new_rows = new.rows();

    let changed = new_rows
        .iter()
        .enumerate()
        .filter(|(i, row)| prev_rows.get(*i) != Some(*row))
        .map(|(_, row)| strip_leading_whitespace(row))
        .collect();

    let dropped = prev_rows.len().saturating_sub(new_rows.len());

    let header = if new.header().is_empty() {
        previous.header().to_vec()
    } else {
        new.header().to_vec()
    };

    TableDiff {
        header,
        changed,
        dropped,
        header_warning,
    }
}

fn strip_leading_whitespace(row: &Row) -> Row {
    let mut row = row.clone();
    if let Some(first) = row.first_mut() {
        let trimmed = first.trim_start();
        if trimmed.len() != first.len() {
            *first = trimmed.to_string();
        }
    }
    row
}

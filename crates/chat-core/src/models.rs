use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Name of the key column shared by every per-user table.
pub const USER_COLUMN: &str = "User";

/// One parsed chat line.
///
/// Both `user` and `text` are already case-folded by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Local wall-clock time the message was sent (no timezone in exports).
    pub timestamp: NaiveDateTime,
    /// Sender name as it appears in the export.
    pub user: String,
    /// Message body, the remainder of the line after `"user: "`.
    pub text: String,
}

/// What the parser does with a line whose digits are not a real date/time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Abort the whole load on the first invalid value.
    #[default]
    Strict,
    /// Drop the offending line and keep going.
    Skip,
}

/// A single value in a result [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Label such as a user name, an emoji or a word.
    Text(String),
    /// Non-negative count.
    Count(u64),
    /// No value (left-join miss).
    Missing,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            Cell::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Count(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Row-oriented table with named columns.
///
/// Every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with [`Cell::Missing`], long rows
    /// are truncated to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// First row whose leading cell is the text `label`.
    pub fn row_by_label(&self, label: &str) -> Option<&[Cell]> {
        self.rows
            .iter()
            .find(|row| row.first().and_then(Cell::as_text) == Some(label))
            .map(Vec::as_slice)
    }

    /// Cell at (`label` row, `column`), if both exist.
    pub fn value(&self, label: &str, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.row_by_label(label)?.get(idx)
    }

    /// Count at (`label` row, `column`); `None` for missing or text cells.
    pub fn count(&self, label: &str, column: &str) -> Option<u64> {
        self.value(label, column).and_then(Cell::as_count)
    }

    /// Labels of every row, in row order.
    pub fn labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.first().and_then(Cell::as_text))
            .collect()
    }

    /// Sum of all counts in `column` (missing cells contribute nothing).
    pub fn column_total(&self, column: &str) -> u64 {
        let Some(idx) = self.column_index(column) else {
            return 0;
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(idx).and_then(Cell::as_count))
            .sum()
    }
}

/// One aggregator result: a table plus the label used to title or save it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub table: Table,
}

impl Report {
    pub fn new(title: impl Into<String>, table: Table) -> Self {
        Self {
            title: title.into(),
            table,
        }
    }

    /// Split into the `(table, title)` pair handed to chart renderers.
    pub fn into_parts(self) -> (Table, String) {
        (self.table, self.title)
    }

    /// Pretty JSON rendering of the whole report.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Cumulative per-user summary.
//!
//! The summary starts as a single `User` column holding the distinct users
//! seen at load time (the anchor set). Each folded report appends its metric
//! columns through a left join on that column:
//!
//! * anchor users missing from the report get [`Cell::Missing`];
//! * report rows for users outside the anchor set are discarded.
//!
//! Consequently a user can only ever be tracked if it was present at load
//! time, possibly under a name that was later changed with
//! [`SummaryTable::rename`].

use std::collections::HashMap;

use chat_core::error::{ChatError, Result};
use chat_core::models::{Cell, MessageRecord, Report, Table, USER_COLUMN};
use tracing::debug;

pub const SUMMARY_TITLE: &str = "Summary";

/// Result of one [`SummaryTable::merge`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Names under which the metric columns were added.
    pub added_columns: Vec<String>,
    /// Anchor users that had no row in the incoming table.
    pub unmatched_anchor_users: usize,
    /// Incoming rows dropped for lacking an anchor user.
    pub discarded_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    table: Table,
}

impl SummaryTable {
    /// Anchor the summary on `users`, keeping their order and dropping repeats.
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Table::new([USER_COLUMN]);
        for user in users {
            let user = user.into();
            if table.row_by_label(&user).is_none() {
                table.push_row(vec![Cell::Text(user)]);
            }
        }
        Self { table }
    }

    /// Anchor on the distinct users of `records` in first-appearance order.
    pub fn from_records(records: &[MessageRecord]) -> Self {
        Self::new(records.iter().map(|r| r.user.as_str()))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn users(&self) -> Vec<&str> {
        self.table.labels()
    }

    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    pub fn to_report(&self) -> Report {
        Report::new(SUMMARY_TITLE, self.table.clone())
    }

    /// Left-join `incoming` into the summary on the `User` column.
    ///
    /// `incoming` must start with a `User` column. Its remaining columns are
    /// appended; a name that is already taken gets a `_2`, `_3`, ... suffix.
    pub fn merge(&mut self, incoming: &Table) -> Result<MergeOutcome> {
        if incoming.columns.first().map(String::as_str) != Some(USER_COLUMN) {
            return Err(ChatError::Merge(format!(
                "first column must be {}, got {:?}",
                USER_COLUMN,
                incoming.columns.first()
            )));
        }

        let mut by_user: HashMap<&str, &[Cell]> = HashMap::new();
        for row in &incoming.rows {
            if let Some(user) = row.first().and_then(Cell::as_text) {
                by_user.entry(user).or_insert(row.as_slice());
            }
        }

        let mut outcome = MergeOutcome::default();
        for name in &incoming.columns[1..] {
            let unique = self.unique_column_name(name);
            self.table.columns.push(unique.clone());
            outcome.added_columns.push(unique);
        }

        let metric_count = incoming.columns.len() - 1;
        for row in &mut self.table.rows {
            let label = row.first().and_then(Cell::as_text).unwrap_or_default();
            match by_user.get(label) {
                Some(source) => {
                    for j in 1..=metric_count {
                        row.push(source.get(j).cloned().unwrap_or(Cell::Missing));
                    }
                }
                None => {
                    outcome.unmatched_anchor_users += 1;
                    row.extend(std::iter::repeat(Cell::Missing).take(metric_count));
                }
            }
        }

        let anchors: Vec<&str> = self.table.labels();
        outcome.discarded_rows = by_user
            .keys()
            .filter(|user| !anchors.contains(*user))
            .count();

        debug!(
            "Merged {:?} into summary ({} anchor users unmatched, {} rows discarded)",
            outcome.added_columns, outcome.unmatched_anchor_users, outcome.discarded_rows,
        );

        Ok(outcome)
    }

    /// Relabel the row for `old` as `new`.
    ///
    /// When `new` already has a row the two are combined: counts are added,
    /// a missing value on one side takes the other side's value. Returns
    /// `false` (and changes nothing) if `old` is not in the summary.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let label_of = |row: &Vec<Cell>| row.first().and_then(Cell::as_text).map(str::to_string);

        let Some(old_idx) = self
            .table
            .rows
            .iter()
            .position(|row| label_of(row).as_deref() == Some(old))
        else {
            return false;
        };
        if old == new {
            return true;
        }

        let new_idx = self
            .table
            .rows
            .iter()
            .position(|row| label_of(row).as_deref() == Some(new));

        match new_idx {
            None => {
                self.table.rows[old_idx][0] = Cell::text(new);
            }
            Some(new_idx) => {
                let old_row = self.table.rows.remove(old_idx);
                let target = if new_idx > old_idx { new_idx - 1 } else { new_idx };
                let merged = &mut self.table.rows[target];
                for (cell, extra) in merged.iter_mut().zip(old_row).skip(1) {
                    *cell = combine(cell, extra);
                }
                debug!("Combined summary rows for \"{}\" into \"{}\"", old, new);
            }
        }
        true
    }

    /// First free name among `name`, `name_2`, `name_3`, ...
    fn unique_column_name(&self, name: &str) -> String {
        if self.table.column_index(name).is_none() {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{}_{}", name, n))
            .find(|candidate| self.table.column_index(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }
}

fn combine(existing: &Cell, extra: Cell) -> Cell {
    match (existing, extra) {
        (Cell::Count(a), Cell::Count(b)) => Cell::Count(a + b),
        (Cell::Missing, other) => other,
        (kept, _) => kept.clone(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn per_user(column: &str, rows: &[(&str, u64)]) -> Table {
        let mut table = Table::new([USER_COLUMN, column]);
        for (user, n) in rows {
            table.push_row(vec![Cell::text(*user), Cell::Count(*n)]);
        }
        table
    }

    #[test]
    fn test_new_dedups_and_keeps_order() {
        let summary = SummaryTable::new(["bob", "alice", "bob"]);
        assert_eq!(summary.users(), vec!["bob", "alice"]);
        assert_eq!(summary.columns(), ["User"]);
    }

    #[test]
    fn test_merge_left_join_fills_missing() {
        let mut summary = SummaryTable::new(["alice", "bob"]);
        let outcome = summary
            .merge(&per_user("MessageCount", &[("bob", 3)]))
            .unwrap();

        assert_eq!(outcome.added_columns, vec!["MessageCount"]);
        assert_eq!(outcome.unmatched_anchor_users, 1);
        assert_eq!(summary.table().count("bob", "MessageCount"), Some(3));
        assert!(summary.table().value("alice", "MessageCount").unwrap().is_missing());
    }

    #[test]
    fn test_merge_never_adds_unknown_users() {
        let mut summary = SummaryTable::new(["alice"]);
        let outcome = summary
            .merge(&per_user("MessageCount", &[("alice", 1), ("AllUsers", 9), ("zed", 2)]))
            .unwrap();

        assert_eq!(outcome.discarded_rows, 2);
        assert_eq!(summary.users(), vec!["alice"]);
    }

    #[test]
    fn test_merge_keeps_anchor_row_order() {
        let mut summary = SummaryTable::new(["carol", "alice", "bob"]);
        summary
            .merge(&per_user("N", &[("alice", 1), ("bob", 2), ("carol", 3)]))
            .unwrap();
        assert_eq!(summary.users(), vec!["carol", "alice", "bob"]);
        assert_eq!(summary.table().count("carol", "N"), Some(3));
    }

    #[test]
    fn test_merge_suffixes_repeated_columns() {
        let mut summary = SummaryTable::new(["alice"]);
        summary.merge(&per_user("MessageCount", &[("alice", 1)])).unwrap();
        summary.merge(&per_user("MessageCount", &[("alice", 2)])).unwrap();
        let outcome = summary.merge(&per_user("MessageCount", &[("alice", 3)])).unwrap();

        assert_eq!(outcome.added_columns, vec!["MessageCount_3"]);
        assert_eq!(
            summary.columns(),
            ["User", "MessageCount", "MessageCount_2", "MessageCount_3"]
        );
        assert_eq!(summary.table().count("alice", "MessageCount"), Some(1));
        assert_eq!(summary.table().count("alice", "MessageCount_2"), Some(2));
    }

    #[test]
    fn test_merge_rejects_table_without_user_key() {
        let mut summary = SummaryTable::new(["alice"]);
        let err = summary.merge(&Table::new(["Emoji", "Count"])).unwrap_err();
        assert!(matches!(err, ChatError::Merge(_)));
        assert_eq!(summary.columns(), ["User"]);
    }

    #[test]
    fn test_merge_empty_table_adds_missing_column() {
        let mut summary = SummaryTable::new(["alice"]);
        summary.merge(&Table::new(["User", "X"])).unwrap();
        assert!(summary.table().value("alice", "X").unwrap().is_missing());
    }

    #[test]
    fn test_rename_relabels_in_place() {
        let mut summary = SummaryTable::new(["a", "b"]);
        summary.merge(&per_user("N", &[("a", 4), ("b", 1)])).unwrap();

        assert!(summary.rename("a", "Alice"));
        assert_eq!(summary.users(), vec!["Alice", "b"]);
        assert_eq!(summary.table().count("Alice", "N"), Some(4));
    }

    #[test]
    fn test_rename_unknown_is_noop() {
        let mut summary = SummaryTable::new(["a"]);
        let before = summary.clone();
        assert!(!summary.rename("ghost", "x"));
        assert_eq!(summary, before);
    }

    #[test]
    fn test_rename_onto_existing_user_combines_rows() {
        let mut summary = SummaryTable::new(["maria", "bob", "mô"]);
        summary
            .merge(&per_user("N", &[("maria", 2), ("bob", 1), ("mô", 5)]))
            .unwrap();
        summary.merge(&per_user("K", &[("mô", 7)])).unwrap();

        assert!(summary.rename("mô", "maria"));
        assert_eq!(summary.users(), vec!["maria", "bob"]);
        assert_eq!(summary.table().count("maria", "N"), Some(7));
        assert_eq!(summary.table().count("maria", "K"), Some(7));
        assert!(summary.table().value("bob", "K").unwrap().is_missing());
    }

    #[test]
    fn test_rename_onto_later_row() {
        let mut summary = SummaryTable::new(["x", "y", "z"]);
        summary.merge(&per_user("N", &[("x", 1), ("y", 2), ("z", 3)])).unwrap();

        assert!(summary.rename("x", "z"));
        assert_eq!(summary.users(), vec!["y", "z"]);
        assert_eq!(summary.table().count("z", "N"), Some(4));
    }

    #[test]
    fn test_to_report_title() {
        let summary = SummaryTable::new(["a"]);
        let report = summary.to_report();
        assert_eq!(report.title, "Summary");
        assert_eq!(report.table.len(), 1);
    }
}

//! Per-user statistics over parsed chat records.
//!
//! Every function here is pure: it reads a slice of [`MessageRecord`]s and
//! returns a fresh result. Folding results into the running summary is the
//! caller's job (see [`crate::session::ChatSession`]).

use std::collections::{BTreeMap, HashMap};

use chat_core::models::{Cell, MessageRecord, Report, Table, USER_COLUMN};
use chat_core::time_utils::{weekday_index, WEEKDAY_NAMES};

pub const RANKING_TITLE: &str = "Ranking";
pub const EMOJI_TITLE: &str = "Emojis";
pub const WEEK_TITLE: &str = "WeekFrequency";
pub const WORD_FREQUENCY_TITLE: &str = "WordFrequency";

/// Label of the synthetic totals row appended by [`week_chart`].
pub const ALL_USERS_LABEL: &str = "AllUsers";

/// Code point ranges treated as emoji: faces, symbols & pictographs,
/// transport, flags, dingbats and a wide miscellaneous block.
const EMOJI_RANGES: [(u32, u32); 6] = [
    (0x1F600, 0x1F64F),
    (0x1F300, 0x1F5FF),
    (0x1F680, 0x1F6FF),
    (0x1F1E0, 0x1F1FF),
    (0x2700, 0x27BF),
    (0x24C2, 0x1F251),
];

/// Whether `c` falls in one of the emoji ranges.
pub fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

/// Name of the metric column produced by [`repeated_message`].
pub fn keyword_column(keyword: &str) -> String {
    format!("{}_Frequency", keyword)
}

// ── ranking ───────────────────────────────────────────────────────────────────

/// Message and character totals for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UserTotals {
    user: String,
    messages: u64,
    characters: u64,
}

/// Messages and characters sent per user, most active first.
///
/// Columns: `User`, `MessageCount`, `TotalCharacters`. Users with equal
/// message counts keep the order in which they first appear in the chat.
pub fn ranking(records: &[MessageRecord]) -> Report {
    let mut totals: Vec<UserTotals> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.user.as_str()).or_insert_with(|| {
            totals.push(UserTotals {
                user: record.user.clone(),
                messages: 0,
                characters: 0,
            });
            totals.len() - 1
        });
        totals[slot].messages += 1;
        totals[slot].characters += record.text.chars().count() as u64;
    }

    // `sort_by` is stable, which keeps first-seen order among ties.
    totals.sort_by(|a, b| b.messages.cmp(&a.messages));

    let mut table = Table::new([USER_COLUMN, "MessageCount", "TotalCharacters"]);
    for t in totals {
        table.push_row(vec![
            Cell::Text(t.user),
            Cell::Count(t.messages),
            Cell::Count(t.characters),
        ]);
    }
    Report::new(RANKING_TITLE, table)
}

// ── emoji_count ───────────────────────────────────────────────────────────────

/// Frequency of every emoji character across the whole chat.
///
/// Runs of adjacent emoji are split into single characters, so a sequence
/// like `"😂😂"` counts twice. Columns: `Emoji`, `Count`; most frequent
/// first, ties in first-seen order.
pub fn emoji_count(records: &[MessageRecord]) -> Report {
    let mut counts: Vec<(char, u64)> = Vec::new();
    let mut index: HashMap<char, usize> = HashMap::new();

    for c in records
        .iter()
        .flat_map(|r| r.text.chars())
        .filter(|&c| is_emoji(c))
    {
        match index.get(&c) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(c, counts.len());
                counts.push((c, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let mut table = Table::new(["Emoji", "Count"]);
    for (emoji, count) in counts {
        table.push_row(vec![Cell::Text(emoji.to_string()), Cell::Count(count)]);
    }
    Report::new(EMOJI_TITLE, table)
}

// ── week_chart ────────────────────────────────────────────────────────────────

/// Messages per user per weekday.
///
/// Columns: `User` followed by the seven weekday names, Sunday first. One row
/// per user in ascending name order, then an [`ALL_USERS_LABEL`] row holding
/// the column sums. An empty chat yields no rows at all.
pub fn week_chart(records: &[MessageRecord]) -> Report {
    let mut per_user: BTreeMap<&str, [u64; 7]> = BTreeMap::new();
    for record in records {
        per_user.entry(record.user.as_str()).or_insert([0; 7])[weekday_index(&record.timestamp)] += 1;
    }

    let mut table = Table::new(std::iter::once(USER_COLUMN).chain(WEEKDAY_NAMES));
    if per_user.is_empty() {
        return Report::new(WEEK_TITLE, table);
    }

    let mut all = [0u64; 7];
    for (user, days) in &per_user {
        let mut row = vec![Cell::text(*user)];
        for (i, n) in days.iter().enumerate() {
            all[i] += n;
            row.push(Cell::Count(*n));
        }
        table.push_row(row);
    }

    let mut total_row = vec![Cell::text(ALL_USERS_LABEL)];
    total_row.extend(all.iter().map(|n| Cell::Count(*n)));
    table.push_row(total_row);

    Report::new(WEEK_TITLE, table)
}

// ── repeated_message ──────────────────────────────────────────────────────────

/// Number of messages per user that contain `keyword`.
///
/// Matching is a case-insensitive substring test; `"ok"` also hits
/// `"book"`. The metric column and the title are both `"<keyword>_Frequency"`
/// with the keyword exactly as given. Rows are in ascending user order.
pub fn repeated_message(records: &[MessageRecord], keyword: &str) -> Report {
    let target = keyword.to_lowercase();

    let mut per_user: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        let hit = record.text.to_lowercase().contains(&target);
        *per_user.entry(record.user.as_str()).or_insert(0) += u64::from(hit);
    }

    let column = keyword_column(keyword);
    let mut table = Table::new([USER_COLUMN.to_string(), column.clone()]);
    for (user, n) in per_user {
        table.push_row(vec![Cell::text(user), Cell::Count(n)]);
    }
    Report::new(column, table)
}

// ── word_count ────────────────────────────────────────────────────────────────

/// Word counts for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRow {
    pub user: String,
    /// Sum of all counts in `counts`.
    pub total: u64,
    pub counts: HashMap<String, u64>,
}

/// Sparse user × word frequency matrix.
///
/// Rows are ordered by total words (descending, ties by user name) and the
/// word axis by corpus-wide frequency (descending, ties by first appearance).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordMatrix {
    rows: Vec<WordRow>,
    words: Vec<(String, u64)>,
}

impl WordMatrix {
    pub fn rows(&self) -> &[WordRow] {
        &self.rows
    }

    /// Words with their corpus-wide totals, most frequent first.
    pub fn words(&self) -> &[(String, u64)] {
        &self.words
    }

    pub fn users(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.user.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// How often `user` wrote `word`; absent combinations are 0.
    pub fn count(&self, user: &str, word: &str) -> u64 {
        self.rows
            .iter()
            .find(|r| r.user == user)
            .and_then(|r| r.counts.get(word).copied())
            .unwrap_or(0)
    }

    /// Total words written by `user`, or `None` for an unknown user.
    pub fn row_total(&self, user: &str) -> Option<u64> {
        self.rows.iter().find(|r| r.user == user).map(|r| r.total)
    }

    /// Dense view: `User` column followed by one column per word.
    ///
    /// `limit` keeps only the most frequent words; the width of the dense
    /// table otherwise grows with the vocabulary.
    pub fn to_table(&self, limit: Option<usize>) -> Table {
        let words: Vec<&str> = self
            .words
            .iter()
            .take(limit.unwrap_or(self.words.len()))
            .map(|(w, _)| w.as_str())
            .collect();

        let mut table = Table::new(std::iter::once(USER_COLUMN).chain(words.iter().copied()));
        for row in &self.rows {
            let mut cells = vec![Cell::text(row.user.as_str())];
            cells.extend(
                words
                    .iter()
                    .map(|w| Cell::Count(row.counts.get(*w).copied().unwrap_or(0))),
            );
            table.push_row(cells);
        }
        table
    }

    pub fn to_report(&self, limit: Option<usize>) -> Report {
        Report::new(WORD_FREQUENCY_TITLE, self.to_table(limit))
    }
}

/// Whitespace-delimited word frequencies per user.
///
/// Each user's messages are joined with single spaces, lowercased and split on
/// whitespace.
pub fn word_count(records: &[MessageRecord]) -> WordMatrix {
    let mut messages: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        messages
            .entry(record.user.as_str())
            .or_default()
            .push(record.text.as_str());
    }

    let mut rows: Vec<WordRow> = Vec::with_capacity(messages.len());
    let mut words: Vec<(String, u64)> = Vec::new();
    let mut word_index: HashMap<String, usize> = HashMap::new();

    for (user, texts) in messages {
        let joined = texts.join(" ").to_lowercase();
        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut total = 0u64;

        for word in joined.split_whitespace() {
            *counts.entry(word.to_string()).or_insert(0) += 1;
            total += 1;

            match word_index.get(word) {
                Some(&i) => words[i].1 += 1,
                None => {
                    word_index.insert(word.to_string(), words.len());
                    words.push((word.to_string(), 1));
                }
            }
        }

        rows.push(WordRow {
            user: user.to_string(),
            total,
            counts,
        });
    }

    rows.sort_by(|a, b| b.total.cmp(&a.total));
    words.sort_by(|a, b| b.1.cmp(&a.1));

    WordMatrix { rows, words }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_chat;

    fn records(raw: &str) -> Vec<MessageRecord> {
        parse_chat(raw).unwrap()
    }

    const SAMPLE: &str = "\
01/02/2023 10:00 - alice: hi bob
01/02/2023 10:01 - bob: hi alice
02/02/2023 11:00 - carol: morning all 😀
03/02/2023 09:15 - bob: ok ok 👍👍
05/02/2023 20:00 - carol: Book club tonight? 😀😂
05/02/2023 20:05 - alice: OK";

    // ── ranking ───────────────────────────────────────────────────────────────

    #[test]
    fn test_ranking_two_users() {
        let recs = records("01/02/2023 10:00 - alice: hi bob\n01/02/2023 10:01 - bob: hi alice");
        let report = ranking(&recs);

        assert_eq!(report.title, "Ranking");
        assert_eq!(report.table.columns, vec!["User", "MessageCount", "TotalCharacters"]);
        assert_eq!(report.table.count("alice", "MessageCount"), Some(1));
        assert_eq!(report.table.count("bob", "MessageCount"), Some(1));
        assert_eq!(report.table.count("alice", "TotalCharacters"), Some(6));
        assert_eq!(report.table.count("bob", "TotalCharacters"), Some(8));
    }

    #[test]
    fn test_ranking_sum_equals_record_count() {
        let recs = records(SAMPLE);
        let report = ranking(&recs);
        assert_eq!(report.table.column_total("MessageCount"), recs.len() as u64);
    }

    #[test]
    fn test_ranking_ties_keep_first_seen_order() {
        let recs = records(SAMPLE);
        let report = ranking(&recs);
        // Everyone sent two messages; alice spoke first, then bob, then carol.
        assert_eq!(report.table.labels(), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_ranking_descending_by_count() {
        let recs = records(
            "01/02/2023 10:00 - a: x\n01/02/2023 10:00 - b: x\n01/02/2023 10:00 - b: x",
        );
        assert_eq!(ranking(&recs).table.labels(), vec!["b", "a"]);
    }

    #[test]
    fn test_ranking_counts_characters_not_bytes() {
        let recs = records("01/02/2023 10:00 - ana: olá 😀");
        assert_eq!(ranking(&recs).table.count("ana", "TotalCharacters"), Some(5));
    }

    #[test]
    fn test_ranking_empty() {
        let report = ranking(&[]);
        assert!(report.table.is_empty());
        assert_eq!(report.table.columns.len(), 3);
    }

    // ── emoji_count ───────────────────────────────────────────────────────────

    #[test]
    fn test_emoji_count_expands_runs() {
        let recs = records(SAMPLE);
        let report = emoji_count(&recs);

        assert_eq!(report.title, "Emojis");
        assert_eq!(report.table.count("😀", "Count"), Some(2));
        assert_eq!(report.table.count("👍", "Count"), Some(2));
        assert_eq!(report.table.count("😂", "Count"), Some(1));
        // Ties keep first-seen order: 😀 appears before 👍.
        assert_eq!(report.table.labels(), vec!["😀", "👍", "😂"]);
    }

    #[test]
    fn test_emoji_count_ignores_plain_text() {
        let recs = records("01/02/2023 10:00 - a: plain ascii, àccents & digits 123");
        assert!(emoji_count(&recs).table.is_empty());
    }

    #[test]
    fn test_is_emoji_ranges() {
        assert!(is_emoji('😀'));
        assert!(is_emoji('🚀'));
        assert!(is_emoji('✂'));
        assert!(is_emoji('🇧'));
        assert!(is_emoji('Ⓜ'));
        assert!(!is_emoji('a'));
        assert!(!is_emoji('é'));
        assert!(!is_emoji('\u{24C1}'));
    }

    // ── week_chart ────────────────────────────────────────────────────────────

    #[test]
    fn test_week_chart_columns_and_totals() {
        let recs = records(SAMPLE);
        let report = week_chart(&recs);
        let table = &report.table;

        assert_eq!(report.title, "WeekFrequency");
        assert_eq!(
            table.columns,
            vec!["User", "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]
        );
        assert_eq!(table.labels(), vec!["alice", "bob", "carol", "AllUsers"]);

        // 01/02/2023 is a Wednesday, 05/02/2023 a Sunday.
        assert_eq!(table.count("alice", "Wednesday"), Some(1));
        assert_eq!(table.count("alice", "Sunday"), Some(1));
        assert_eq!(table.count("bob", "Friday"), Some(1));
        assert_eq!(table.count("carol", "Monday"), Some(0));

        for day in WEEKDAY_NAMES {
            let users_sum: u64 = ["alice", "bob", "carol"]
                .iter()
                .map(|u| table.count(u, day).unwrap())
                .sum();
            assert_eq!(table.count(ALL_USERS_LABEL, day), Some(users_sum));
        }

        let grand_total: u64 = WEEKDAY_NAMES
            .iter()
            .map(|d| table.count(ALL_USERS_LABEL, d).unwrap())
            .sum();
        assert_eq!(grand_total, recs.len() as u64);
    }

    #[test]
    fn test_week_chart_empty_has_no_rows() {
        let report = week_chart(&[]);
        assert!(report.table.is_empty());
        assert_eq!(report.table.columns.len(), 8);
    }

    // ── repeated_message ──────────────────────────────────────────────────────

    #[test]
    fn test_repeated_message_substring_case_insensitive() {
        let recs = records(SAMPLE);
        let report = repeated_message(&recs, "OK");

        assert_eq!(report.title, "OK_Frequency");
        assert_eq!(report.table.columns, vec!["User", "OK_Frequency"]);
        // "ok ok 👍👍" counts once per message, not per occurrence.
        assert_eq!(report.table.count("bob", "OK_Frequency"), Some(1));
        // "book club" contains "ok".
        assert_eq!(report.table.count("carol", "OK_Frequency"), Some(1));
        assert_eq!(report.table.count("alice", "OK_Frequency"), Some(1));
    }

    #[test]
    fn test_repeated_message_absent_keyword_is_zero_for_all() {
        let recs = records(SAMPLE);
        let report = repeated_message(&recs, "zzyzx");
        assert_eq!(report.table.len(), 3);
        for user in ["alice", "bob", "carol"] {
            assert_eq!(report.table.count(user, "zzyzx_Frequency"), Some(0));
        }
    }

    #[test]
    fn test_repeated_message_accented_keyword() {
        let recs = records("01/02/2023 10:00 - luís: PÉSSIMO dia\n01/02/2023 10:01 - mô: ótimo");
        let report = repeated_message(&recs, "Péssimo");
        assert_eq!(report.table.count("luís", "Péssimo_Frequency"), Some(1));
        assert_eq!(report.table.count("mô", "Péssimo_Frequency"), Some(0));
    }

    // ── word_count ────────────────────────────────────────────────────────────

    #[test]
    fn test_word_count_row_sums_match_tokens() {
        let recs = records(SAMPLE);
        let matrix = word_count(&recs);

        for user in ["alice", "bob", "carol"] {
            let joined: Vec<&str> = recs
                .iter()
                .filter(|r| r.user == user)
                .map(|r| r.text.as_str())
                .collect();
            let expected = joined.join(" ").split_whitespace().count() as u64;
            let row_sum: u64 = matrix
                .words()
                .iter()
                .map(|(w, _)| matrix.count(user, w))
                .sum();
            assert_eq!(row_sum, expected, "row sum for {user}");
            assert_eq!(matrix.row_total(user), Some(expected));
        }
    }

    #[test]
    fn test_word_count_orderings() {
        let recs = records(
            "01/02/2023 10:00 - a: x y\n\
             01/02/2023 10:00 - b: y y z w\n\
             01/02/2023 10:00 - c: z",
        );
        let matrix = word_count(&recs);

        // Totals: b=4, a=2, c=1.
        assert_eq!(matrix.users(), vec!["b", "a", "c"]);
        // y=3, z=2, then x and w at 1 in first-seen order (a before b).
        let words: Vec<&str> = matrix.words().iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["y", "z", "x", "w"]);
    }

    #[test]
    fn test_word_count_dense_table() {
        let recs = records("01/02/2023 10:00 - a: x y\n01/02/2023 10:00 - b: y");
        let matrix = word_count(&recs);
        let table = matrix.to_table(None);

        assert_eq!(table.columns, vec!["User", "y", "x"]);
        assert_eq!(table.count("b", "x"), Some(0));
        assert_eq!(table.count("a", "x"), Some(1));

        let narrow = matrix.to_table(Some(1));
        assert_eq!(narrow.columns, vec!["User", "y"]);
        assert_eq!(matrix.to_report(None).title, "WordFrequency");
    }

    #[test]
    fn test_word_count_sparse_lookup_defaults_to_zero() {
        let recs = records("01/02/2023 10:00 - a: hello");
        let matrix = word_count(&recs);
        assert_eq!(matrix.count("a", "goodbye"), 0);
        assert_eq!(matrix.count("nobody", "hello"), 0);
        assert_eq!(matrix.row_total("nobody"), None);
    }

    #[test]
    fn test_word_count_empty() {
        let matrix = word_count(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.to_table(None).is_empty());
    }
}

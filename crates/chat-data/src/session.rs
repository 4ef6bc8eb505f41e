//! Analysis session over one chat export.
//!
//! A [`ChatSession`] owns the parsed records and the cumulative
//! [`SummaryTable`]. Aggregator methods read the records and fold their
//! per-user columns into the summary; [`ChatSession::rename`] rewrites user
//! names in both.

use std::path::Path;

use chat_core::error::Result;
use chat_core::models::{MessageRecord, Report};
use tracing::{debug, info};

use crate::aggregator::{self, WordMatrix, WORD_FREQUENCY_TITLE};
use crate::parser::{LineParser, ParseStats, ParsedChat, ParserOptions};
use crate::reader::load_chat_file;
use crate::summary::SummaryTable;

#[derive(Debug, Clone)]
pub struct ChatSession {
    records: Vec<MessageRecord>,
    summary: SummaryTable,
    stats: ParseStats,
}

impl ChatSession {
    /// Load the export at `path`. A missing file is an error; there is no
    /// partially loaded session.
    pub fn open(path: impl AsRef<Path>, options: ParserOptions) -> Result<Self> {
        let parsed = load_chat_file(path.as_ref(), options)?;
        Ok(Self::from_parsed(parsed))
    }

    /// Build a session from chat text already in memory.
    pub fn from_text(raw: &str, options: ParserOptions) -> Result<Self> {
        let parsed = LineParser::new(options).parse(raw)?;
        Ok(Self::from_parsed(parsed))
    }

    /// Build a session from records that were parsed elsewhere.
    pub fn from_records(records: Vec<MessageRecord>) -> Self {
        let stats = ParseStats {
            lines_read: records.len(),
            records: records.len(),
            ..ParseStats::default()
        };
        Self::from_parsed(ParsedChat { records, stats })
    }

    fn from_parsed(parsed: ParsedChat) -> Self {
        let summary = SummaryTable::from_records(&parsed.records);
        debug!(
            "Session has {} records from {} users",
            parsed.records.len(),
            summary.users().len()
        );
        Self {
            records: parsed.records,
            summary,
            stats: parsed.stats,
        }
    }

    /// Number of parsed messages.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn summary(&self) -> &SummaryTable {
        &self.summary
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Rename `old` to `new` in every record and in the summary.
    ///
    /// Names are compared exactly; parsed names are lowercase. Returns how many
    /// records changed, so an unknown `old` yields `0` and changes nothing.
    /// Reports produced before the call keep the old name.
    pub fn rename(&mut self, old: &str, new: &str) -> usize {
        let mut changed = 0;
        for record in self.records.iter_mut().filter(|r| r.user == old) {
            record.user = new.to_string();
            changed += 1;
        }
        let in_summary = self.summary.rename(old, new);

        if changed > 0 || in_summary {
            info!("Renamed \"{}\" to \"{}\" in {} messages", old, new, changed);
        } else {
            debug!("Rename skipped: no user named \"{}\"", old);
        }
        changed
    }

    /// Message and character ranking; folded into the summary.
    pub fn ranking(&mut self) -> Result<Report> {
        let report = aggregator::ranking(&self.records);
        self.summary.merge(&report.table)?;
        Ok(report)
    }

    /// Corpus-wide emoji frequency. Not per user, so nothing is folded.
    pub fn emoji_count(&self) -> Report {
        aggregator::emoji_count(&self.records)
    }

    /// Weekday activity per user; weekday columns are folded into the summary.
    pub fn week_chart(&mut self) -> Result<Report> {
        let report = aggregator::week_chart(&self.records);
        self.summary.merge(&report.table)?;
        Ok(report)
    }

    /// Messages per user containing `keyword`; folded into the summary.
    pub fn repeated_message(&mut self, keyword: &str) -> Result<Report> {
        let report = aggregator::repeated_message(&self.records, keyword);
        self.summary.merge(&report.table)?;
        Ok(report)
    }

    /// Per-user word frequencies and their title. Never folded: its columns
    /// depend on the vocabulary.
    pub fn word_count(&self) -> (WordMatrix, String) {
        (
            aggregator::word_count(&self.records),
            WORD_FREQUENCY_TITLE.to_string(),
        )
    }

    /// Snapshot of the cumulative summary as a report.
    pub fn summary_report(&self) -> Report {
        self.summary.to_report()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

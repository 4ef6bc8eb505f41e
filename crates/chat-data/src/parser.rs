//! Line grammar for exported chat logs.
//!
//! Every message line looks like `12/05/2023 14:30 - John Doe: Hello world`.
//! Anything else (system notices, wrapped continuation lines, blank lines) is
//! noise and is dropped without a diagnostic.

use std::sync::OnceLock;

use chat_core::error::ChatError;
use chat_core::models::{DatePolicy, MessageRecord};
use chat_core::time_utils::timestamp_from_parts;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// `day/month/year hour:minute - user: message`, unanchored within a line.
const LINE_PATTERN: &str = r"(\d{1,2})/(\d{1,2})/(\d{1,4}) (\d{1,2}):(\d{1,2}) - (.+?): (.*)";

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LINE_PATTERN).expect("line pattern is valid"))
}

// ── Errors & options ──────────────────────────────────────────────────────────

/// A line matched the grammar but its stamp is not a real date/time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: \"{value}\" is not a valid day/month/year hour:minute")]
pub struct ParseError {
    /// 1-based line number in the source text.
    pub line: usize,
    /// The matched `date time` text.
    pub value: String,
}

impl From<ParseError> for ChatError {
    fn from(err: ParseError) -> Self {
        ChatError::InvalidTimestamp {
            line: err.line,
            value: err.value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub date_policy: DatePolicy,
}

/// Counters collected while parsing one chat export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Physical lines seen.
    pub lines_read: usize,
    /// Records produced.
    pub records: usize,
    /// Lines that did not match the grammar.
    pub skipped_lines: usize,
    /// Matching lines dropped for an impossible date/time (skip policy only).
    pub invalid_dates: usize,
}

/// Records plus the counters describing how they were obtained.
#[derive(Debug, Clone, Default)]
pub struct ParsedChat {
    pub records: Vec<MessageRecord>,
    pub stats: ParseStats,
}

// ── LineParser ────────────────────────────────────────────────────────────────

/// Turns raw chat text into [`MessageRecord`]s in source order.
#[derive(Debug, Clone, Default)]
pub struct LineParser {
    options: ParserOptions,
}

impl LineParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parse a single, already case-folded line.
    ///
    /// * `Ok(None)` – the line is not a message line.
    /// * `Err(_)` – it is, but the stamp cannot be assembled.
    pub fn parse_line(
        &self,
        line_no: usize,
        line: &str,
    ) -> Result<Option<MessageRecord>, ParseError> {
        let Some(caps) = line_regex().captures(line) else {
            return Ok(None);
        };

        let timestamp = timestamp_from_parts(&caps[1], &caps[2], &caps[3], &caps[4], &caps[5])
            .ok_or_else(|| ParseError {
                line: line_no,
                value: format!("{}/{}/{} {}:{}", &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]),
            })?;

        Ok(Some(MessageRecord {
            timestamp,
            user: caps[6].to_string(),
            text: caps[7].to_string(),
        }))
    }

    /// Parse a whole export.
    ///
    /// The input is lowercased once up front, so user names and message text
    /// are both case-folded in the output.
    pub fn parse(&self, raw: &str) -> Result<ParsedChat, ChatError> {
        let folded = raw.to_lowercase();
        let mut parsed = ParsedChat::default();

        for (idx, line) in folded.lines().enumerate() {
            parsed.stats.lines_read += 1;
            match self.parse_line(idx + 1, line) {
                Ok(Some(record)) => parsed.records.push(record),
                Ok(None) => parsed.stats.skipped_lines += 1,
                Err(err) => match self.options.date_policy {
                    DatePolicy::Strict => return Err(err.into()),
                    DatePolicy::Skip => {
                        warn!("Skipping message with invalid timestamp: {}", err);
                        parsed.stats.invalid_dates += 1;
                    }
                },
            }
        }

        parsed.stats.records = parsed.records.len();
        debug!(
            "Parsed {} records from {} lines ({} skipped, {} invalid dates)",
            parsed.stats.records,
            parsed.stats.lines_read,
            parsed.stats.skipped_lines,
            parsed.stats.invalid_dates,
        );

        Ok(parsed)
    }
}

/// Parse `raw` with the default (strict) options.
pub fn parse_chat(raw: &str) -> Result<Vec<MessageRecord>, ChatError> {
    LineParser::default().parse(raw).map(|parsed| parsed.records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

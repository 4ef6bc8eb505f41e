use clap::Parser;
use std::path::PathBuf;

use crate::error::{ChatError, Result};
use crate::models::DatePolicy;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Per-user statistics for exported chat logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chat-stats",
    about = "Per-user statistics for exported chat logs",
    version
)]
pub struct Settings {
    /// Chat export to analyse
    #[arg(long, env = "CHAT_STATS_FILE", default_value = "WppFolder/chat.txt")]
    pub file: PathBuf,

    /// Report to print
    #[arg(long, default_value = "ranking", value_parser = ["ranking", "emoji", "week", "keyword", "words", "summary"])]
    pub report: String,

    /// Text to count for the keyword report (case-insensitive substring)
    #[arg(long)]
    pub keyword: Option<String>,

    /// Rename a user before reporting, as OLD=NEW (repeatable; OLD is the lowercased name)
    #[arg(long = "rename", value_name = "OLD=NEW")]
    pub renames: Vec<String>,

    /// Print at most this many rows
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub top: Option<u32>,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Drop lines whose date/time is impossible instead of failing
    #[arg(long)]
    pub skip_invalid_dates: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`load`](Self::load) but from an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Check combinations clap cannot express on its own.
    pub fn validate(&self) -> Result<()> {
        if self.report == "keyword" && self.keyword.is_none() {
            return Err(ChatError::Config(
                "the keyword report needs --keyword".to_string(),
            ));
        }
        self.parsed_renames().map(|_| ())
    }

    /// Split every `--rename OLD=NEW` into an `(old, new)` pair, in order.
    ///
    /// Only the first `=` separates the names, so `NEW` may itself contain `=`.
    pub fn parsed_renames(&self) -> Result<Vec<(String, String)>> {
        self.renames
            .iter()
            .map(|raw| match raw.split_once('=') {
                Some((old, new)) if !old.is_empty() && !new.is_empty() => {
                    Ok((old.to_string(), new.to_string()))
                }
                _ => Err(ChatError::Config(format!(
                    "--rename expects OLD=NEW, got \"{}\"",
                    raw
                ))),
            })
            .collect()
    }

    pub fn date_policy(&self) -> DatePolicy {
        if self.skip_invalid_dates {
            DatePolicy::Skip
        } else {
            DatePolicy::Strict
        }
    }

    pub fn top_rows(&self) -> Option<usize> {
        self.top.map(|n| n as usize)
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

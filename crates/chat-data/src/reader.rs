//! Chat export loading.
//!
//! Reads one UTF-8 export from disk and hands it to the [`LineParser`].

use std::path::Path;

use chat_core::error::{ChatError, Result};
use tracing::{debug, info};

use crate::parser::{LineParser, ParsedChat, ParserOptions};

/// Read and parse the chat export at `path`.
///
/// Fails with [`ChatError::FileNotFound`] when nothing exists at `path`, and
/// with [`ChatError::FileRead`] when the file cannot be read as UTF-8 text.
/// Nothing is returned on failure; there is no partial load.
pub fn load_chat_file(path: &Path, options: ParserOptions) -> Result<ParsedChat> {
    if !path.exists() {
        return Err(ChatError::FileNotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|source| ChatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", raw.len(), path.display());

    let parsed = LineParser::new(options).parse(&raw)?;
    info!(
        "Loaded {} messages from {}",
        parsed.records.len(),
        path.display()
    );
    Ok(parsed)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Shared model for the chat statistics workspace.
//!
//! Holds the parsed message record, the result-table types every aggregator
//! produces, the error type, CLI settings and text rendering.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{ChatError, Result};

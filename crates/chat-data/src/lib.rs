//! Parsing and aggregation for exported chat logs.
//!
//! Reads a chat export, turns its message lines into records, computes the
//! per-user reports and folds them into a cumulative summary table.

pub mod aggregator;
pub mod parser;
pub mod reader;
pub mod session;
pub mod summary;

pub use session::ChatSession;

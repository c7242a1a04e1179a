//! Shared domain types for the DEX reader.
//!
//! Holds the record and summary models, the error type, field coercion for
//! DEX counters and timestamps, console number formatting and CLI settings.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

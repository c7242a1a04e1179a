//! Data layer for the DEX reader.
//!
//! Discovers and reads DEX logs, tokenizes them into tagged records,
//! correlates product and sales records into per-slot rows, aggregates rows
//! across many files and exports them to CSV.

pub mod aggregator;
pub mod correlator;
pub mod pipeline;
pub mod reader;
pub mod tokenizer;
pub mod writer;

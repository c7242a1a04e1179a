//! Single-file processing pipeline.
//!
//! Reads one DEX log, tokenizes it, extracts machine info and correlates the
//! per-slot sales rows. Each call is independent and returns fresh values.

use std::path::Path;

use dex_core::error::Result;
use dex_core::models::{CorrelationMode, CorrelationReport, MachineInfo, SalesRecord};
use tracing::debug;

use crate::correlator::{extract_machine_info, SalesCorrelator};
use crate::reader::read_dex_file;
use crate::tokenizer::tokenize;

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything extracted from one DEX log.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    /// Machine identity and totals, stamped with the source file.
    pub machine: MachineInfo,
    /// One row per usable `PA2` record, in file order.
    pub sales: Vec<SalesRecord>,
    /// How reliable the slot correlation was.
    pub report: CorrelationReport,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Process already-loaded DEX text.
///
/// `source` is only used to fill in `source_file` and `file_path`.
pub fn process_text(text: &str, source: Option<&Path>, mode: CorrelationMode) -> ProcessedFile {
    let groups = tokenize(text);
    let mut machine = extract_machine_info(&groups);
    let correlation = SalesCorrelator::new(mode).correlate(&groups, &machine);

    if let Some(path) = source {
        machine.source_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        machine.file_path = path.to_string_lossy().into_owned();
    }

    debug!(
        "Machine {}: {} records, {} sales rows",
        machine.machine_id,
        groups.len(),
        correlation.records.len()
    );

    ProcessedFile {
        machine,
        sales: correlation.records,
        report: correlation.report,
    }
}

/// Read and process one DEX log.
///
/// Fails only when the file cannot be read or is not UTF-8 text.
pub fn process_file(path: &Path, mode: CorrelationMode) -> Result<ProcessedFile> {
    let text = read_dex_file(path)?;
    Ok(process_text(&text, Some(path), mode))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

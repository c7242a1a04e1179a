//! Batch processing and sales aggregation across many DEX logs.

use std::path::{Path, PathBuf};

use dex_core::error::{DexError, Result};
use dex_core::models::{cents_to_dollars, CorrelationMode, MachineInfo, SalesRecord};
use tracing::{info, warn};

use crate::pipeline::{process_file, ProcessedFile};

// ── SalesTotals ───────────────────────────────────────────────────────────────

/// Vend and revenue totals accumulated across sales rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesTotals {
    /// Number of slot rows.
    pub products: usize,
    pub total_vends: u64,
    pub total_sales_cents: u64,
    pub cash_sales_cents: u64,
    pub cashless_sales_cents: u64,
}

impl SalesTotals {
    /// Add a single row's counts to the running totals. Sums saturate.
    pub fn add_record(&mut self, record: &SalesRecord) {
        self.products = self.products.saturating_add(1);
        self.total_vends = self.total_vends.saturating_add(record.total_vends);
        self.total_sales_cents = self
            .total_sales_cents
            .saturating_add(record.total_sales_cents);
        self.cash_sales_cents = self.cash_sales_cents.saturating_add(record.cash_sales_cents);
        self.cashless_sales_cents = self
            .cashless_sales_cents
            .saturating_add(record.cashless_sales_cents);
    }

    pub fn from_records(records: &[SalesRecord]) -> Self {
        let mut totals = Self::default();
        for record in records {
            totals.add_record(record);
        }
        totals
    }

    pub fn total_sales_dollars(&self) -> f64 {
        cents_to_dollars(self.total_sales_cents)
    }

    pub fn cash_sales_dollars(&self) -> f64 {
        cents_to_dollars(self.cash_sales_cents)
    }

    pub fn cashless_sales_dollars(&self) -> f64 {
        cents_to_dollars(self.cashless_sales_cents)
    }
}

/// The `n` best-selling rows by total vends, highest first.
///
/// Ties keep their original order.
pub fn top_products(records: &[SalesRecord], n: usize) -> Vec<&SalesRecord> {
    let mut ranked: Vec<&SalesRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.total_vends.cmp(&a.total_vends));
    ranked.truncate(n);
    ranked
}

// ── MachineSummary ────────────────────────────────────────────────────────────

/// Per-file view of one machine: its reported totals next to the sum of its
/// slot rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineSummary {
    pub machine_id: String,
    pub source_file: String,
    /// `VA1` total in cents; 0 when the log had no usable `VA1`.
    pub total_sales_cents: u64,
    /// `VA1` vend count; 0 when the log had no usable `VA1`.
    pub total_vends: u64,
    /// Sales rows produced from this file.
    pub slot_rows: usize,
    /// Summed slot totals for this file.
    pub slot_sales_cents: u64,
}

impl MachineSummary {
    fn new(machine: &MachineInfo, sales: &[SalesRecord]) -> Self {
        let slots = SalesTotals::from_records(sales);
        Self {
            machine_id: machine.machine_id.clone(),
            source_file: machine.source_file.clone(),
            total_sales_cents: machine.total_sales_cents.unwrap_or(0),
            total_vends: machine.total_vends.unwrap_or(0),
            slot_rows: slots.products,
            slot_sales_cents: slots.total_sales_cents,
        }
    }

    pub fn total_sales_dollars(&self) -> f64 {
        cents_to_dollars(self.total_sales_cents)
    }
}

// ── BatchResult ───────────────────────────────────────────────────────────────

/// A file that could not be processed and why.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: DexError,
}

/// Where one input file ended up, as an index into `machines` or `failures`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Processed(usize),
    Failed(usize),
}

/// Combined output of processing many files.
///
/// `sales` is file order then row order; `machines` and `summaries` hold one
/// entry per successfully processed file in the same order. `outcomes` has
/// one entry per input file in input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub sales: Vec<SalesRecord>,
    pub machines: Vec<MachineInfo>,
    pub summaries: Vec<MachineSummary>,
    pub failures: Vec<FileFailure>,
    pub outcomes: Vec<FileOutcome>,
    /// Files whose slot correlation was flagged as unreliable.
    pub misaligned_files: usize,
}

impl BatchResult {
    /// Fold one file's outcome into the batch. Failures never abort it.
    pub fn push(&mut self, path: &Path, outcome: Result<ProcessedFile>) {
        match outcome {
            Ok(processed) => {
                info!("Processed: {}", path.display());
                if !processed.report.aligned() {
                    self.misaligned_files += 1;
                }
                self.outcomes.push(FileOutcome::Processed(self.machines.len()));
                self.summaries
                    .push(MachineSummary::new(&processed.machine, &processed.sales));
                self.machines.push(processed.machine);
                self.sales.extend(processed.sales);
            }
            Err(error) => {
                warn!("Error processing {}: {}", path.display(), error);
                self.outcomes.push(FileOutcome::Failed(self.failures.len()));
                self.failures.push(FileFailure {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
    }

    /// Number of files that were processed successfully.
    pub fn files_processed(&self) -> usize {
        self.machines.len()
    }

    pub fn totals(&self) -> SalesTotals {
        SalesTotals::from_records(&self.sales)
    }
}

/// Process every path in order, collecting rows, machine info and failures.
pub fn process_files(paths: &[PathBuf], mode: CorrelationMode) -> BatchResult {
    let mut batch = BatchResult::default();
    for path in paths {
        batch.push(path, process_file(path, mode));
    }

    info!(
        "Batch finished: {} files processed, {} failed, {} sales rows",
        batch.files_processed(),
        batch.failures.len(),
        batch.sales.len()
    );
    batch
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! CSV export of sales rows.

use std::io::Write;
use std::path::Path;

use dex_core::error::Result;
use dex_core::models::SalesRecord;
use tracing::{info, warn};

/// Column headers, in the order rows are written.
pub const CSV_HEADERS: [&str; 16] = [
    "machine_id",
    "slot",
    "price_cents",
    "price_dollars",
    "vends_cash",
    "cash_sales_cents",
    "cash_sales_dollars",
    "vends_cashless",
    "cashless_sales_cents",
    "cashless_sales_dollars",
    "total_vends",
    "total_sales_cents",
    "total_sales_dollars",
    "last_sale_datetime",
    "last_sale_date",
    "last_sale_time",
];

/// Write rows with a header line to any writer. Returns the number of rows.
///
/// An empty slice writes nothing at all, not even the header.
pub fn write_sales<W: Write>(records: &[SalesRecord], writer: W) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

/// Write rows to a CSV file at `path`, replacing any existing file.
///
/// With no rows this is a no-op: a warning is logged and no file is created.
pub fn write_sales_csv(records: &[SalesRecord], path: &Path) -> Result<usize> {
    if records.is_empty() {
        warn!("No sales data to export; {} not written", path.display());
        return Ok(0);
    }

    let file = std::fs::File::create(path)?;
    let written = write_sales(records, std::io::BufWriter::new(file))?;
    info!("Exported {} records to {}", written, path.display());
    Ok(written)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Console report for a processed batch.

use dex_core::formatting::{format_cents, format_count, format_currency, percentage};
use dex_data::aggregator::{top_products, BatchResult, FileOutcome, SalesTotals};

/// One status line per input file, in input order.
pub fn render_file_status(batch: &BatchResult) -> String {
    let mut out = String::new();
    for outcome in &batch.outcomes {
        let line = match *outcome {
            FileOutcome::Processed(i) => batch
                .machines
                .get(i)
                .map(|machine| format!("  ✅ {}\n", machine.file_path)),
            FileOutcome::Failed(i) => batch.failures.get(i).map(|failure| {
                format!(
                    "  ❌ Error processing {}: {}\n",
                    failure.path.display(),
                    failure.error
                )
            }),
        };
        out.push_str(&line.unwrap_or_default());
    }
    out
}

/// Render the sales summary, top sellers and per-machine details.
pub fn render_summary(batch: &BatchResult, top: usize) -> String {
    if batch.sales.is_empty() {
        return "No sales data found.\n".to_string();
    }

    let totals = batch.totals();
    let mut lines = Vec::new();

    lines.push(String::new());
    lines.push("=== SALES SUMMARY ===".to_string());
    lines.extend(sales_lines(&totals));

    lines.push(String::new());
    lines.push("=== TOP SELLING PRODUCTS ===".to_string());
    for record in top_products(&batch.sales, top) {
        lines.push(format!(
            "Slot {}: {} vends, {} revenue, {} each",
            record.slot,
            format_count(record.total_vends),
            format_cents(record.total_sales_cents),
            format_cents(record.price_cents),
        ));
    }

    lines.push(String::new());
    lines.push("=== MACHINE INFORMATION ===".to_string());
    for machine in &batch.summaries {
        lines.push(format!("Machine ID: {}", machine.machine_id));
        lines.push(format!("File: {}", machine.source_file));
        lines.push(format!(
            "Total machine sales: {}",
            format_currency(machine.total_sales_dollars())
        ));
        lines.push(format!(
            "Total machine vends: {}",
            format_count(machine.total_vends)
        ));
        lines.push(format!(
            "Slot rows: {} ({} in slot sales)",
            machine.slot_rows,
            format_cents(machine.slot_sales_cents)
        ));
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn sales_lines(totals: &SalesTotals) -> Vec<String> {
    let total = totals.total_sales_dollars();
    let cash = totals.cash_sales_dollars();
    let cashless = totals.cashless_sales_dollars();
    vec![
        format!("Total products: {}", format_count(totals.products as u64)),
        format!("Total vends: {}", format_count(totals.total_vends)),
        format!("Total sales: {}", format_currency(total)),
        format!(
            "Cash sales: {} ({:.1}%)",
            format_currency(cash),
            percentage(cash, total, 1)
        ),
        format!(
            "Cashless sales: {} ({:.1}%)",
            format_currency(cashless),
            percentage(cashless, total, 1)
        ),
    ]
}

/// Render the closing lines printed after every successful run.
pub fn render_footer(batch: &BatchResult, output: Option<&std::path::Path>) -> String {
    let mut out = format!(
        "\n✅ Processing complete!\n   Total records: {}\n   Machines processed: {}\n   Files failed: {}\n",
        batch.sales.len(),
        batch.files_processed(),
        batch.failures.len()
    );
    if let Some(path) = output {
        out.push_str(&format!("   Output saved to: {}\n", path.display()));
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

mod bootstrap;
mod summary;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use dex_core::settings::Settings;
use dex_data::aggregator::process_files;
use dex_data::reader::expand_inputs;
use dex_data::writer::write_sales_csv;

fn main() -> Result<ExitCode> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("DEX reader v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Inputs: {:?}, correlation: {}",
        settings.inputs,
        settings.correlation
    );

    let stdout = std::io::stdout();
    let found_sales = run(&settings, &mut stdout.lock())?;

    Ok(if found_sales {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Process the configured inputs and write the console report to `out`.
///
/// Returns `false` when no sales data was found in any input.
fn run(settings: &Settings, out: &mut impl Write) -> Result<bool> {
    let paths = expand_inputs(&settings.inputs).context("Failed to expand input paths")?;
    writeln!(out, "Processing {} files:", paths.len())?;

    let batch = process_files(&paths, settings.correlation);
    write!(out, "{}", summary::render_file_status(&batch))?;

    if batch.misaligned_files > 0 {
        tracing::warn!(
            "{} file(s) had mismatched PA1/PA2/PA5 counts; try --correlation block",
            batch.misaligned_files
        );
    }

    if batch.sales.is_empty() {
        writeln!(
            out,
            "\n❌ No sales data found. Check your input files and try again."
        )?;
        return Ok(false);
    }

    let output = if settings.writes_csv() {
        write_sales_csv(&batch.sales, &settings.output).with_context(|| {
            format!("Failed to write CSV to {}", settings.output.display())
        })?;
        Some(settings.output.as_path())
    } else {
        None
    };

    if settings.prints_summary() {
        write!(
            out,
            "{}",
            summary::render_summary(&batch, usize::from(settings.top))
        )?;
    }

    write!(out, "{}", summary::render_footer(&batch, output))?;
    Ok(true)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

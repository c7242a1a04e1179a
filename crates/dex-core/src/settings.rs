use clap::Parser;
use std::path::PathBuf;

use crate::models::CorrelationMode;

/// Default input when no paths are given.
pub const DEFAULT_INPUT: &str = "DEX-files/*.log";

/// Default CSV destination.
pub const DEFAULT_OUTPUT: &str = "dex_sales_detailed.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Read DEX vending machine log files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dex-reader",
    about = "Read DEX vending machine log files and export per-slot sales to CSV",
    version,
    after_help = "Examples:\n  \
        dex-reader                                   process DEX-files/*.log\n  \
        dex-reader DEX-files/machine.log             process one file\n  \
        dex-reader \"logs/**/*.log\" -o report.csv     process a glob pattern\n  \
        dex-reader logs/ --summary                   scan a directory and print a summary\n  \
        dex-reader a.log b.log c.log                 process several files"
)]
pub struct Settings {
    /// Input file(s), directories or glob patterns
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    pub inputs: Vec<String>,

    /// Output CSV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "DEX_READER_OUTPUT")]
    pub output: PathBuf,

    /// Do not write the CSV file (implies --summary)
    #[arg(long)]
    pub no_csv: bool,

    /// Print summary information
    #[arg(long)]
    pub summary: bool,

    /// How PA2/PA5 records are matched to their PA1 product record
    #[arg(long, value_enum, default_value_t = CorrelationMode::Positional)]
    pub correlation: CorrelationMode,

    /// Number of slots listed under top selling products
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..))]
    pub top: u16,

    /// Logging level
    #[arg(
        long,
        default_value = "INFO",
        env = "DEX_READER_LOG_LEVEL",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::parse().resolve()
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args).resolve()
    }

    /// Apply flags that override other settings.
    fn resolve(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// Whether the CSV should be written.
    pub fn writes_csv(&self) -> bool {
        !self.no_csv
    }

    /// Whether the console summary should be printed.
    pub fn prints_summary(&self) -> bool {
        self.summary || self.no_csv
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

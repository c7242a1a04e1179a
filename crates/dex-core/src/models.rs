use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Record-type tags consumed by the correlator.
///
/// Every other tag is still tokenized and grouped, just never read.
pub mod tags {
    /// Machine identity; field 0 is the machine serial / asset id.
    pub const MACHINE_ID: &str = "ID1";
    /// Machine-wide totals; field 0 is sales in cents, field 1 the vend count.
    pub const MACHINE_TOTALS: &str = "VA1";
    /// Per-slot product info; field 0 is the slot, field 1 the price in cents.
    pub const PRODUCT_INFO: &str = "PA1";
    /// Per-slot sales counters (cash vends, cash cents, cashless vends, cashless cents).
    pub const SALES_DATA: &str = "PA2";
    /// Per-slot last sale; field 0 is `YYMMDD`, field 1 is `HHMM`.
    pub const LAST_SALE: &str = "PA5";
}

/// Machine identifier used when a log carries no `ID1` record.
pub const UNKNOWN_MACHINE: &str = "Unknown";

/// Convert an amount in minor units (cents) to major units (dollars).
pub fn cents_to_dollars(cents: u64) -> f64 {
    cents as f64 / 100.0
}

// ── RawRecordGroup ────────────────────────────────────────────────────────────

/// Tokenized DEX records grouped by their tag.
///
/// Each tag maps to its occurrences in file order; each occurrence is the
/// list of fields that followed the tag. The file order across tags is kept
/// separately as `(tag, occurrence index)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecordGroup {
    groups: HashMap<String, Vec<Vec<String>>>,
    sequence: Vec<(String, usize)>,
}

impl RawRecordGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence of `tag`.
    pub fn push(&mut self, tag: impl Into<String>, fields: Vec<String>) {
        let tag = tag.into();
        let occurrences = self.groups.entry(tag.clone()).or_default();
        occurrences.push(fields);
        self.sequence.push((tag, occurrences.len() - 1));
    }

    /// All occurrences of `tag` in file order; empty when the tag never appeared.
    pub fn get(&self, tag: &str) -> &[Vec<String>] {
        self.groups.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Every retained record in file order as `(tag, occurrence index)`.
    pub fn sequence(&self) -> &[(String, usize)] {
        &self.sequence
    }

    /// Total number of retained records across all tags.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

// ── MachineInfo ───────────────────────────────────────────────────────────────

/// Identity and machine-wide totals for one processed log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineInfo {
    /// Machine identifier from `ID1`, or [`UNKNOWN_MACHINE`].
    pub machine_id: String,
    /// Total sales in cents from `VA1`; `None` when no usable `VA1` exists.
    pub total_sales_cents: Option<u64>,
    /// Total vend count from `VA1`; `None` when no usable `VA1` exists.
    pub total_vends: Option<u64>,
    /// `total_sales_cents / 100`.
    pub total_sales_dollars: Option<f64>,
    /// File name component of the source path (empty for in-memory input).
    #[serde(default)]
    pub source_file: String,
    /// Source path exactly as it was given.
    #[serde(default)]
    pub file_path: String,
}

impl Default for MachineInfo {
    fn default() -> Self {
        Self {
            machine_id: UNKNOWN_MACHINE.to_string(),
            total_sales_cents: None,
            total_vends: None,
            total_sales_dollars: None,
            source_file: String::new(),
            file_path: String::new(),
        }
    }
}

impl MachineInfo {
    /// Record the machine totals, deriving the dollar amount.
    pub fn with_totals(mut self, total_sales_cents: u64, total_vends: u64) -> Self {
        self.total_sales_cents = Some(total_sales_cents);
        self.total_vends = Some(total_vends);
        self.total_sales_dollars = Some(cents_to_dollars(total_sales_cents));
        self
    }

    /// Whether a usable `VA1` record contributed totals.
    pub fn has_totals(&self) -> bool {
        self.total_sales_cents.is_some()
    }
}

// ── SalesRecord ───────────────────────────────────────────────────────────────

/// Cash and cashless counters for one slot as read from `PA2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCounters {
    pub vends_cash: u64,
    pub cash_sales_cents: u64,
    pub vends_cashless: u64,
    pub cashless_sales_cents: u64,
}

/// Last-sale information for one slot as read from `PA5`.
///
/// `datetime` is set only when both raw components parsed; otherwise `date`
/// and `time` hold the raw strings (or are empty when the record was absent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastSale {
    pub datetime: Option<NaiveDateTime>,
    pub date: String,
    pub time: String,
}

impl LastSale {
    /// A successfully parsed timestamp with its ISO date and `HH:MM` strings.
    pub fn parsed(datetime: NaiveDateTime) -> Self {
        Self {
            datetime: Some(datetime),
            date: datetime.format("%Y-%m-%d").to_string(),
            time: datetime.format("%H:%M").to_string(),
        }
    }

    /// Unparseable components kept verbatim.
    pub fn raw(date: &str, time: &str) -> Self {
        Self {
            datetime: None,
            date: date.to_string(),
            time: time.to_string(),
        }
    }
}

/// One normalized sales row per product slot.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub machine_id: String,
    pub slot: String,
    pub price_cents: u64,
    pub price_dollars: f64,
    pub vends_cash: u64,
    pub cash_sales_cents: u64,
    pub cash_sales_dollars: f64,
    pub vends_cashless: u64,
    pub cashless_sales_cents: u64,
    pub cashless_sales_dollars: f64,
    /// `vends_cash + vends_cashless`.
    pub total_vends: u64,
    /// `cash_sales_cents + cashless_sales_cents`.
    pub total_sales_cents: u64,
    pub total_sales_dollars: f64,
    pub last_sale_datetime: Option<NaiveDateTime>,
    pub last_sale_date: String,
    pub last_sale_time: String,
}

impl SalesRecord {
    /// Build a row, deriving every total and dollar amount from the counters.
    pub fn new(
        machine_id: impl Into<String>,
        slot: impl Into<String>,
        price_cents: u64,
        counters: SlotCounters,
        last_sale: LastSale,
    ) -> Self {
        let total_sales_cents = counters
            .cash_sales_cents
            .saturating_add(counters.cashless_sales_cents);
        Self {
            machine_id: machine_id.into(),
            slot: slot.into(),
            price_cents,
            price_dollars: cents_to_dollars(price_cents),
            vends_cash: counters.vends_cash,
            cash_sales_cents: counters.cash_sales_cents,
            cash_sales_dollars: cents_to_dollars(counters.cash_sales_cents),
            vends_cashless: counters.vends_cashless,
            cashless_sales_cents: counters.cashless_sales_cents,
            cashless_sales_dollars: cents_to_dollars(counters.cashless_sales_cents),
            total_vends: counters.vends_cash.saturating_add(counters.vends_cashless),
            total_sales_cents,
            total_sales_dollars: cents_to_dollars(total_sales_cents),
            last_sale_datetime: last_sale.datetime,
            last_sale_date: last_sale.date,
            last_sale_time: last_sale.time,
        }
    }
}

// ── Correlation ───────────────────────────────────────────────────────────────

/// How `PA2`/`PA5` records are matched to their `PA1` product record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMode {
    /// The i-th `PA2` pairs with the i-th `PA1` and the i-th `PA5`.
    #[default]
    Positional,
    /// Each `PA2`/`PA5` pairs with the nearest preceding `PA1` in file order.
    Block,
}

impl fmt::Display for CorrelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationMode::Positional => write!(f, "positional"),
            CorrelationMode::Block => write!(f, "block"),
        }
    }
}

/// Diagnostics describing how trustworthy a correlation was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationReport {
    pub mode: CorrelationMode,
    /// Number of `PA1` occurrences.
    pub product_records: usize,
    /// Number of `PA2` occurrences (including ones too short to emit a row).
    pub sales_records: usize,
    /// Number of `PA5` occurrences.
    pub time_records: usize,
    /// `PA2` rows that fell back to a synthetic `Slot_<n>` label.
    pub unbound_sales: usize,
}

impl CorrelationReport {
    /// `false` when the join had to guess: group sizes disagree in positional
    /// mode, or some sales rows had no product record in either mode.
    pub fn aligned(&self) -> bool {
        if self.unbound_sales > 0 {
            return false;
        }
        match self.mode {
            CorrelationMode::Positional => {
                self.product_records == self.sales_records
                    && (self.time_records == 0 || self.time_records == self.sales_records)
            }
            CorrelationMode::Block => true,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

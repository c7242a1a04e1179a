//! Cross-record correlation for DEX logs.
//!
//! Reads machine identity and totals from `ID1`/`VA1`, then joins product
//! (`PA1`), sales (`PA2`) and last-sale (`PA5`) records into one
//! [`SalesRecord`] per slot.

use std::collections::HashMap;

use dex_core::data_processors::{field_int, parse_dex_timestamp, parse_int_or};
use dex_core::models::{
    tags, CorrelationMode, CorrelationReport, LastSale, MachineInfo, RawRecordGroup, SalesRecord,
    SlotCounters,
};
use tracing::{debug, warn};

/// Minimum number of fields a `PA2` needs to produce a row.
const SALES_FIELDS: usize = 4;

/// Minimum number of fields a `VA1` needs before its totals are trusted.
const TOTALS_FIELDS: usize = 4;

// ── Machine info ──────────────────────────────────────────────────────────────

/// Read the machine identifier and machine-wide totals.
///
/// The identifier is the first `ID1` record's first field, trimmed, or
/// `"Unknown"`. Totals come from the first `VA1` record only when it has at
/// least four fields; malformed numbers become 0. Never fails.
pub fn extract_machine_info(groups: &RawRecordGroup) -> MachineInfo {
    let mut info = MachineInfo::default();

    if let Some(id) = groups
        .get(tags::MACHINE_ID)
        .first()
        .and_then(|fields| fields.first())
    {
        info.machine_id = id.trim().to_string();
    }

    if let Some(totals) = groups.get(tags::MACHINE_TOTALS).first() {
        if totals.len() >= TOTALS_FIELDS {
            info = info.with_totals(field_int(totals, 0), field_int(totals, 1));
        } else {
            debug!(
                "Ignoring {} record with {} fields",
                tags::MACHINE_TOTALS,
                totals.len()
            );
        }
    }

    info
}

// ── Sales data ────────────────────────────────────────────────────────────────

/// Build one [`SalesRecord`] per usable `PA2` record using positional
/// correlation: the i-th `PA2` is paired with the i-th `PA1` and `PA5`.
pub fn extract_sales_data(groups: &RawRecordGroup, machine_info: &MachineInfo) -> Vec<SalesRecord> {
    SalesCorrelator::new(CorrelationMode::Positional)
        .correlate(groups, machine_info)
        .records
}

/// Rows produced by a correlation together with its diagnostics.
#[derive(Debug, Clone)]
pub struct Correlation {
    pub records: Vec<SalesRecord>,
    pub report: CorrelationReport,
}

/// Joins `PA1`/`PA2`/`PA5` records according to a [`CorrelationMode`].
pub struct SalesCorrelator {
    mode: CorrelationMode,
}

impl SalesCorrelator {
    pub fn new(mode: CorrelationMode) -> Self {
        Self { mode }
    }

    /// Emit one row per `PA2` record with at least four fields.
    ///
    /// Rows follow `PA2` file order. A row whose product record cannot be
    /// found gets the label `Slot_<n>` (n = 1-based `PA2` position) and a
    /// price of 0. Every row carries `machine_info.machine_id`.
    pub fn correlate(&self, groups: &RawRecordGroup, machine_info: &MachineInfo) -> Correlation {
        let products = groups.get(tags::PRODUCT_INFO);
        let sales = groups.get(tags::SALES_DATA);
        let times = groups.get(tags::LAST_SALE);

        let bindings = match self.mode {
            CorrelationMode::Positional => positional_bindings(sales.len()),
            CorrelationMode::Block => block_bindings(groups),
        };

        let mut records = Vec::with_capacity(sales.len());
        let mut unbound_sales = 0usize;

        for (i, sale) in sales.iter().enumerate() {
            if sale.len() < SALES_FIELDS {
                debug!("Skipping {} #{} with {} fields", tags::SALES_DATA, i + 1, sale.len());
                continue;
            }

            let binding = bindings[i];
            let product = binding.product.and_then(|p| products.get(p));
            if product.is_none() {
                unbound_sales += 1;
            }

            let slot = match product {
                Some(fields) => fields
                    .first()
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
                None => format!("Slot_{}", i + 1),
            };
            let price_cents = product
                .and_then(|fields| fields.get(1))
                .map(|price| parse_int_or(price.trim(), 0))
                .unwrap_or(0);

            let counters = SlotCounters {
                vends_cash: field_int(sale, 0),
                cash_sales_cents: field_int(sale, 1),
                vends_cashless: field_int(sale, 2),
                cashless_sales_cents: field_int(sale, 3),
            };
            let last_sale = resolve_last_sale(binding.time.and_then(|t| times.get(t)));

            records.push(SalesRecord::new(
                machine_info.machine_id.as_str(),
                slot,
                price_cents,
                counters,
                last_sale,
            ));
        }

        let report = CorrelationReport {
            mode: self.mode,
            product_records: products.len(),
            sales_records: sales.len(),
            time_records: times.len(),
            unbound_sales,
        };

        if !report.aligned() {
            warn!(
                "Machine {}: {} correlation is unreliable ({} {}, {} {}, {} {}, {} rows without product)",
                machine_info.machine_id,
                report.mode,
                report.product_records,
                tags::PRODUCT_INFO,
                report.sales_records,
                tags::SALES_DATA,
                report.time_records,
                tags::LAST_SALE,
                report.unbound_sales,
            );
        }

        Correlation { records, report }
    }
}

// ── Binding strategies ────────────────────────────────────────────────────────

/// Indices of the `PA1` and `PA5` occurrences paired with one `PA2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Binding {
    product: Option<usize>,
    time: Option<usize>,
}

/// `PA2[i]` pairs with `PA1[i]` and `PA5[i]`; lookups past the end miss later.
fn positional_bindings(sales: usize) -> Vec<Binding> {
    (0..sales)
        .map(|i| Binding {
            product: Some(i),
            time: Some(i),
        })
        .collect()
}

/// Each `PA2` pairs with the nearest preceding `PA1`; that product's first
/// `PA5` (seen while it was the current product) supplies the last sale.
fn block_bindings(groups: &RawRecordGroup) -> Vec<Binding> {
    let mut current: Option<usize> = None;
    let mut sale_owners: Vec<Option<usize>> = Vec::new();
    let mut time_of_product: HashMap<usize, usize> = HashMap::new();

    for (tag, index) in groups.sequence() {
        match tag.as_str() {
            tags::PRODUCT_INFO => current = Some(*index),
            tags::SALES_DATA => sale_owners.push(current),
            tags::LAST_SALE => {
                if let Some(product) = current {
                    time_of_product.entry(product).or_insert(*index);
                }
            }
            _ => {}
        }
    }

    sale_owners
        .into_iter()
        .map(|product| Binding {
            product,
            time: product.and_then(|p| time_of_product.get(&p).copied()),
        })
        .collect()
}

// ── Last sale ─────────────────────────────────────────────────────────────────

/// Turn an optional `PA5` record into a [`LastSale`].
///
/// Missing records, fewer than two fields, or an empty date or time give an
/// empty value. Non-empty components that fail to parse are kept raw.
fn resolve_last_sale(record: Option<&Vec<String>>) -> LastSale {
    let Some(fields) = record else {
        return LastSale::default();
    };
    let (Some(date), Some(time)) = (fields.first(), fields.get(1)) else {
        return LastSale::default();
    };
    if date.is_empty() || time.is_empty() {
        return LastSale::default();
    }

    match parse_dex_timestamp(date, time) {
        Ok(datetime) => LastSale::parsed(datetime),
        Err(e) => {
            debug!("Keeping raw last-sale value {:?} {:?}: {}", date, time, e);
            LastSale::raw(date, time)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

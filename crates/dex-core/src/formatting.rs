/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use dex_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format an amount in cents as dollars with two decimals and thousands
/// separators.
///
/// Works on the integer amount, so no floating-point rounding can creep in.
///
/// # Examples
///
/// ```
/// use dex_core::formatting::format_cents;
///
/// assert_eq!(format_cents(150), "$1.50");
/// assert_eq!(format_cents(123_456_789), "$1,234,567.89");
/// assert_eq!(format_cents(5), "$0.05");
/// ```
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", format_count(cents / 100), cents % 100)
}

/// Format a dollar amount held as `f64`, rounding to cents.
///
/// Negative amounts render as `$-x.yy`.
///
/// # Examples
///
/// ```
/// use dex_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56), "$1,234.56");
/// assert_eq!(format_currency(-9.99), "$-9.99");
/// ```
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    if amount < 0.0 && cents > 0 {
        format!("$-{}", &format_cents(cents)[1..])
    } else {
        format_cents(cents)
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero.
///
/// # Examples
///
/// ```
/// use dex_core::formatting::percentage;
///
/// assert!((percentage(1500.0, 2000.0, 1) - 75.0).abs() < 1e-9);
/// assert_eq!(percentage(10.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

use rust_decimal::Decimal;
use tax_core::calculations::common::round_whole;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator, in both western (`"1,234.56"`) and
/// Indian (`"8,00,000"`) grouping. Empty or whitespace-only input is treated
/// as 0. Negative values parse; rejecting them is left to the engine.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Groups the digits of a non-negative integer string the Indian way: the
/// last three digits, then pairs (`"12345678"` -> `"1,23,45,678"`).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Formats an amount for display: rounded half away from zero to a whole
/// number, Indian digit grouping, prefixed with `symbol`.
///
/// ```
/// use rust_decimal::Decimal;
/// use tax_cli::utils::format_amount;
///
/// assert_eq!(format_amount("₹", Decimal::new(8_000_005, 1)), "₹8,00,001");
/// ```
pub fn format_amount(
    symbol: &str,
    amount: Decimal,
) -> String {
    let rounded = round_whole(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().trunc().normalize().to_string();
    format!("{symbol}{sign}{}", group_indian(&digits))
}

/// Formats a percentage with two decimal places, e.g. `6.83%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

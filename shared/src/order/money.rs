//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for display and serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `unit_price * quantity`, rounded
pub fn line_total(unit_price: f64, quantity: u32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Exact sum of `(unit_price, quantity)` lines
pub(crate) fn sum_lines_decimal(lines: impl IntoIterator<Item = (f64, u32)>) -> Decimal {
    lines
        .into_iter()
        .map(|(unit_price, quantity)| to_decimal(unit_price) * Decimal::from(quantity))
        .sum()
}

/// Sum of `(unit_price, quantity)` lines, rounded once at the end
pub fn sum_lines(lines: impl IntoIterator<Item = (f64, u32)>) -> f64 {
    to_f64(sum_lines_decimal(lines))
}

/// Sum of already computed amounts
pub fn sum_amounts(amounts: impl IntoIterator<Item = f64>) -> f64 {
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

/// Compare two amounts within [`MONEY_TOLERANCE`]
pub fn amounts_equal(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}

/// Render an amount as `$12.50` / `-$3.00`
pub fn format_currency(amount: f64) -> String {
    let rounded = to_decimal(amount)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

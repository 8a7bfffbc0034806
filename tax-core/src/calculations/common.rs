//! Decimal helpers shared by the engine and the presentation layer.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(6.825)), dec!(6.83));
/// assert_eq!(round_half_up(dec!(6.824)), dec!(6.82));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to a whole currency unit, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(2100.5)), dec!(2101));
/// assert_eq!(round_whole(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Floors a value at zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-50000)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(700000)), dec!(700000));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    if value > Decimal::ZERO { value } else { Decimal::ZERO }
}

//! Money Helpers
//!
//! Prices are held as `Decimal` in whole rand. The payment provider works in
//! integer cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol shown next to prices
pub const CURRENCY_SYMBOL: &str = "R";

/// ISO currency code sent to the payment provider
pub const CURRENCY_CODE: &str = "zar";

/// Format a price for display, rounded to whole rand (`R450`)
pub fn format_price(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{CURRENCY_SYMBOL}{}", rounded.normalize())
}

/// Convert a price to cents, rounding half away from zero
///
/// Returns `None` when the amount does not fit the provider's integer range.
pub fn to_minor_units(value: Decimal) -> Option<i64> {
    value
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

//! VAT computation for order totals.
//!
//! Prices are `rust_decimal::Decimal` in their natural form (`44.99`, not
//! cents). Totals carry exactly two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Multiplier applied to a base price (19% VAT).
pub const VAT_RATE: Decimal = dec!(1.19);

const CENT_PRECISION: u32 = 2;

/// Apply VAT to a base price and round to cents.
///
/// Rounding is half-up (midpoint away from zero), not banker's rounding:
/// `1.50 * 1.19 = 1.785` rounds to `1.79`.
pub fn with_tax(base: Decimal) -> Decimal {
    (base * VAT_RATE).round_dp_with_strategy(CENT_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

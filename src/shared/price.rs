//! Price and size utilities for order construction.
//!
//! The crypto endpoint takes prices in whole cents. Prices are scaled to
//! cents, truncated to an integer and scaled back, so binary artifacts near
//! a cent boundary fall to the lower cent (`0.29 * 100 = 28.999…` → `0.28`).

/// Price scale: the endpoint accepts two decimals.
pub const CENTS_PER_UNIT: f64 = 100.0;

/// Truncate a price toward zero to whole cents.
///
/// Returns `None` for NaN and infinities. Magnitudes beyond the `i64` cent
/// range saturate.
///
/// # Example
///
/// ```
/// use robinhood_crypto::shared::price::truncate_price;
///
/// assert_eq!(truncate_price(12.3456), Some(12.34));
/// assert_eq!(truncate_price(-1.239), Some(-1.23));
/// ```
pub fn truncate_price(price: f64) -> Option<f64> {
    if !price.is_finite() {
        return None;
    }
    let cents = (price * CENTS_PER_UNIT) as i64;
    Some(cents as f64 / CENTS_PER_UNIT)
}

/// Number of whole units a currency amount buys at `price`.
///
/// Rounds to nearest with ties away from zero. The caller guarantees a
/// positive, finite price.
pub fn quantity_for_amount(amount: f64, price: f64) -> f64 {
    (amount / price).round()
}

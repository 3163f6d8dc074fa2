//! Network URL constants for the Robinhood crypto API.

/// Default REST API base URL for crypto trading.
pub const DEFAULT_API_URL: &str = "https://nummus.robinhood.com";

/// Path of the crypto orders collection, relative to the API base URL.
///
/// The trailing slash is part of the resource name; order ids are appended
/// directly after it.
pub const CRYPTO_ORDERS_PATH: &str = "/orders/";

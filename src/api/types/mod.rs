//! Request and response types for the Robinhood crypto REST API.

pub mod crypto_order;
pub mod currency_pair;

// Re-export all types for convenience
pub use crypto_order::*;
pub use currency_pair::*;

//! Shared utilities and types used by the request builder and response types.

pub mod price;
pub mod serde_util;
pub mod types;

// Re-export commonly used items
pub use price::{quantity_for_amount, truncate_price};
pub use types::*;

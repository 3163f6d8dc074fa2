//! # Robinhood crypto SDK
//!
//! A typed Rust client for Robinhood's crypto order endpoints: place an
//! order, look one up by id, and cancel it.
//!
//! ## Modules
//!
//! - [`api`]: REST client, transport seam, request/response types, errors
//! - [`shared`]: Order enums, price helpers, serde helpers
//! - [`network`]: Endpoint URL constants
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use robinhood_crypto::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RobinhoodClient::builder(DEFAULT_API_URL)
//!         .header("Authorization", "Bearer <token>")
//!         .crypto_account_id("<account id>")
//!         .build()?;
//!
//!     let order = client
//!         .place_crypto_order(
//!             &CurrencyPair::new("<pair id>"),
//!             CryptoOrderOpts::new(OrderSide::Buy)
//!                 .with_type(OrderType::Limit)
//!                 .with_amount_in_dollars(100.0)
//!                 .with_price(33.33),
//!         )
//!         .await?;
//!     println!("Order {} is {}", order.id, order.state);
//!
//!     order.cancel().await?;
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Shared utilities, types, and constants.
pub mod shared;

/// Network URL constants.
pub mod network;

/// REST API client module for crypto orders.
pub mod api;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use robinhood_crypto::prelude::*;
/// ```
pub mod prelude {
    // API module exports
    pub use crate::api::{
        ApiError, ApiRequest, ApiResult, CryptoOrder, CryptoOrderOpts, CryptoOrderRequest,
        CurrencyPair, ErrorResponse, RobinhoodClient, RobinhoodClientBuilder, Transport,
    };
    #[cfg(feature = "http")]
    pub use crate::api::HttpTransport;

    // Network constants
    pub use crate::network::DEFAULT_API_URL;

    // Shared types
    pub use crate::shared::{OrderSide, OrderType, TimeInForce};
}

//! REST API client module for Robinhood crypto orders.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use robinhood_crypto::api::{CryptoOrderOpts, CurrencyPair, RobinhoodClient};
//! use robinhood_crypto::shared::OrderSide;
//!
//! let client = RobinhoodClient::builder("https://nummus.robinhood.com")
//!     .header("Authorization", "Bearer <token>")
//!     .crypto_account_id("<account id>")
//!     .build()?;
//!
//! let order = client
//!     .place_crypto_order(
//!         &CurrencyPair::new("<pair id>"),
//!         CryptoOrderOpts::new(OrderSide::Buy).with_quantity(0.01),
//!     )
//!     .await?;
//!
//! // Orders remember the client that produced them.
//! let latest = order.refresh().await?;
//! latest.cancel().await?;
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>` which is an alias for `Result<T, ApiError>`.
//! A refused cancellation is its own variant, separate from transport failures:
//!
//! ```rust,ignore
//! match order.cancel().await {
//!     Ok(()) => println!("cancelled"),
//!     Err(ApiError::Rejected(reason)) => println!("service refused: {}", reason),
//!     Err(ApiError::NoClient) => println!("order was not fetched through a client"),
//!     Err(e) => println!("other error: {}", e),
//! }
//! ```
//!
//! # Custom transports
//!
//! Requests go through the [`Transport`] trait. The default is the
//! reqwest-backed [`HttpTransport`]; supply another with
//! [`RobinhoodClientBuilder::transport`].

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{RobinhoodClient, RobinhoodClientBuilder};
pub use error::{ApiError, ApiResult, ErrorResponse};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{do_and_decode, get_and_decode, ApiRequest, Method, Transport};
pub use types::*;

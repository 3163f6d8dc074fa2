//! Robinhood crypto REST client implementation.
//!
//! The [`RobinhoodClient`] places, looks up and (through the returned
//! [`CryptoOrder`]) cancels crypto orders.
//!
//! # Example
//!
//! ```rust,ignore
//! use robinhood_crypto::api::{CryptoOrderOpts, CurrencyPair, RobinhoodClient};
//! use robinhood_crypto::shared::{OrderSide, OrderType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RobinhoodClient::builder("https://nummus.robinhood.com")
//!         .header("Authorization", "Bearer <token>")
//!         .crypto_account_id("<account id>")
//!         .build()?;
//!
//!     let btc = CurrencyPair::new("3d961844-d360-45fc-989b-f6fca761d511");
//!     let order = client
//!         .place_crypto_order(
//!             &btc,
//!             CryptoOrderOpts::new(OrderSide::Buy)
//!                 .with_type(OrderType::Limit)
//!                 .with_amount_in_dollars(100.0)
//!                 .with_price(33.33),
//!         )
//!         .await?;
//!
//!     order.cancel().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::api::error::{ApiError, ApiResult};
use crate::api::transport::{do_and_decode, get_and_decode, ApiRequest, Transport};
use crate::api::types::{CryptoOrder, CryptoOrderOpts, CryptoOrderRequest, CurrencyPair};
use crate::network::CRYPTO_ORDERS_PATH;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring [`RobinhoodClient`].
#[derive(Debug, Clone)]
pub struct RobinhoodClientBuilder {
    base_url: String,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
    crypto_account_id: String,
    transport: Option<Arc<dyn Transport>>,
}

impl RobinhoodClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
            crypto_account_id: String::new(),
            transport: None,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a header sent with every request (e.g. `Authorization`).
    ///
    /// Headers and the timeout configure the built-in transport only.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Crypto account that placed orders are booked against.
    pub fn crypto_account_id(mut self, id: impl Into<String>) -> Self {
        self.crypto_account_id = id.into();
        self
    }

    /// Use `transport` instead of the built-in reqwest transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiResult<RobinhoodClient> {
        let transport = match self.transport {
            Some(transport) => {
                if !self.default_headers.is_empty() {
                    tracing::warn!(
                        count = self.default_headers.len(),
                        "Default headers are ignored when a custom transport is set"
                    );
                }
                transport
            }
            None => Self::default_transport(self.timeout, &self.default_headers)?,
        };

        Ok(RobinhoodClient {
            transport,
            base_url: self.base_url,
            crypto_account_id: self.crypto_account_id,
        })
    }

    #[cfg(feature = "http")]
    fn default_transport(
        timeout: Duration,
        default_headers: &[(String, String)],
    ) -> ApiResult<Arc<dyn Transport>> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in default_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| {
                ApiError::InvalidParameter(format!("Invalid header name '{}': {}", name, e))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                ApiError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(Arc::new(crate::api::transport::HttpTransport::new(timeout, headers)?))
    }

    #[cfg(not(feature = "http"))]
    fn default_transport(
        _timeout: Duration,
        _default_headers: &[(String, String)],
    ) -> ApiResult<Arc<dyn Transport>> {
        Err(ApiError::InvalidParameter(
            "no transport configured; enable the `http` feature or call `transport()`".to_string(),
        ))
    }
}

/// Robinhood crypto REST client.
///
/// Cheap to clone: clones share the transport. Every [`CryptoOrder`] it
/// returns carries a clone so the order can cancel or refresh itself.
#[derive(Debug, Clone)]
pub struct RobinhoodClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    crypto_account_id: String,
}

impl RobinhoodClient {
    /// Create a new client with the given base URL and default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        RobinhoodClientBuilder::new(base_url).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(base_url: impl Into<String>) -> RobinhoodClientBuilder {
        RobinhoodClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the crypto orders collection, with trailing slash.
    pub fn orders_url(&self) -> String {
        format!("{}{}", self.base_url, CRYPTO_ORDERS_PATH)
    }

    pub fn crypto_account_id(&self) -> &str {
        &self.crypto_account_id
    }

    /// The transport requests go through.
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    // =========================================================================
    // Crypto order endpoints
    // =========================================================================

    /// Place a crypto order on `pair`.
    ///
    /// The returned order has this client attached. A reject reason in the
    /// response is reported through [`CryptoOrder::is_rejected`], not as an
    /// error.
    pub async fn place_crypto_order(
        &self,
        pair: &CurrencyPair,
        opts: CryptoOrderOpts,
    ) -> ApiResult<CryptoOrder> {
        if self.crypto_account_id.is_empty() {
            return Err(ApiError::InvalidParameter(
                "crypto_account_id is not configured".to_string(),
            ));
        }
        if pair.id.is_empty() {
            return Err(ApiError::InvalidParameter(
                "currency pair id cannot be empty".to_string(),
            ));
        }

        let payload = CryptoOrderRequest::build(&self.crypto_account_id, pair, &opts)?;
        tracing::debug!(
            pair = %pair.id,
            ref_id = %payload.ref_id,
            side = %opts.side,
            quantity = payload.quantity,
            price = payload.price,
            "Placing crypto order"
        );

        let request = ApiRequest::post(self.orders_url()).json(&payload)?;
        let order: CryptoOrder = do_and_decode(self.transport(), request).await?;
        Ok(order.with_client(self.clone()))
    }

    /// Fetch a crypto order by id.
    pub async fn get_crypto_order(&self, order_id: &str) -> ApiResult<CryptoOrder> {
        if order_id.is_empty() {
            return Err(ApiError::InvalidParameter("order id cannot be empty".to_string()));
        }

        let url = format!("{}{}", self.orders_url(), urlencoding::encode(order_id));
        let order: CryptoOrder = get_and_decode(self.transport(), &url).await?;
        Ok(order.with_client(self.clone()))
    }
}

//! Crypto order types: the caller's intent, the wire payload, and the
//! order record the service returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::api::client::RobinhoodClient;
use crate::api::error::{ApiError, ApiResult};
use crate::api::transport::{do_and_decode, ApiRequest};
use crate::api::types::currency_pair::CurrencyPair;
use crate::shared::serde_util::{is_zero, null_default, string_f64};
use crate::shared::{quantity_for_amount, truncate_price, OrderSide, OrderType, TimeInForce};

// ============================================================================
// CryptoOrderOpts
// ============================================================================

/// What the caller wants to trade.
///
/// Size the order either with `quantity` or with `amount_in_dollars`; when
/// `quantity` is zero it is derived from the amount and `price`.
///
/// ```rust,ignore
/// let opts = CryptoOrderOpts::new(OrderSide::Buy)
///     .with_type(OrderType::Limit)
///     .with_amount_in_dollars(100.0)
///     .with_price(33.33);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CryptoOrderOpts {
    pub side: OrderSide,
    pub order_type: OrderType,
    /// Total to spend or receive, in quote currency
    pub amount_in_dollars: f64,
    /// Units of the base asset; zero means "derive from amount"
    pub quantity: f64,
    /// Limit or reference price
    pub price: f64,
    pub time_in_force: TimeInForce,
    /// Equity-only flags. The crypto endpoint has no field for them.
    pub extended_hours: bool,
    pub stop: bool,
    pub force: bool,
}

impl CryptoOrderOpts {
    /// Market, good-till-cancelled, unsized order on `side`.
    pub fn new(side: OrderSide) -> Self {
        Self {
            side,
            order_type: OrderType::default(),
            amount_in_dollars: 0.0,
            quantity: 0.0,
            price: 0.0,
            time_in_force: TimeInForce::default(),
            extended_hours: false,
            stop: false,
            force: false,
        }
    }

    /// Set the order type.
    pub fn with_type(mut self, order_type: OrderType) -> Self {
        self.order_type = order_type;
        self
    }

    /// Set the quantity in units of the base asset.
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Size the order by quote-currency amount instead of quantity.
    pub fn with_amount_in_dollars(mut self, amount: f64) -> Self {
        self.amount_in_dollars = amount;
        self
    }

    /// Set the limit or reference price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the time in force.
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// Set the equity extended-hours flag (not sent for crypto).
    pub fn with_extended_hours(mut self, extended_hours: bool) -> Self {
        self.extended_hours = extended_hours;
        self
    }

    /// Set the equity stop flag (not sent for crypto).
    pub fn with_stop(mut self, stop: bool) -> Self {
        self.stop = stop;
        self
    }

    /// Set the equity force flag (not sent for crypto).
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

// ============================================================================
// CryptoOrderRequest
// ============================================================================

/// Request body for POST /orders/.
///
/// Empty strings, zero numbers and unset enums are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CryptoOrderRequest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency_pair_id: String,
    /// Price, truncated to cents
    #[serde(default, skip_serializing_if = "is_zero")]
    pub price: f64,
    /// Idempotency reference for deduplicating retried submissions
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<OrderSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub quantity: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<OrderType>,
}

impl CryptoOrderRequest {
    /// Build the payload for `opts` on `pair`, deriving quantity, truncating
    /// the price and attaching a fresh `ref_id`.
    ///
    /// Amount-based sizing needs a positive price and must come out to a
    /// non-zero quantity; otherwise `InvalidParameter` is returned and
    /// nothing is sent.
    pub fn build(
        account_id: &str,
        pair: &CurrencyPair,
        opts: &CryptoOrderOpts,
    ) -> ApiResult<Self> {
        let quantity = if opts.quantity != 0.0 {
            opts.quantity
        } else {
            Self::derive_quantity(opts)?
        };
        if !quantity.is_finite() {
            return Err(ApiError::InvalidParameter(format!(
                "quantity must be finite, got {}",
                quantity
            )));
        }

        let price = truncate_price(opts.price).ok_or_else(|| {
            ApiError::InvalidParameter(format!("price must be finite, got {}", opts.price))
        })?;

        if opts.extended_hours || opts.stop || opts.force {
            tracing::debug!(
                extended_hours = opts.extended_hours,
                stop = opts.stop,
                force = opts.force,
                "Crypto orders ignore extended_hours/stop/force"
            );
        }

        Ok(Self {
            account_id: account_id.to_string(),
            currency_pair_id: pair.id.clone(),
            price,
            ref_id: Uuid::new_v4().to_string(),
            side: Some(opts.side),
            time_in_force: Some(opts.time_in_force),
            quantity,
            order_type: Some(opts.order_type),
        })
    }

    fn derive_quantity(opts: &CryptoOrderOpts) -> ApiResult<f64> {
        if opts.amount_in_dollars == 0.0 {
            return Err(ApiError::InvalidParameter(
                "either quantity or amount_in_dollars must be set".to_string(),
            ));
        }
        if !(opts.price.is_finite() && opts.price > 0.0) {
            return Err(ApiError::InvalidParameter(format!(
                "price must be positive to size an order by amount, got {}",
                opts.price
            )));
        }

        let quantity = quantity_for_amount(opts.amount_in_dollars, opts.price);
        if quantity == 0.0 || !quantity.is_finite() {
            return Err(ApiError::InvalidParameter(format!(
                "amount {} at price {} does not buy a whole unit",
                opts.amount_in_dollars, opts.price
            )));
        }

        tracing::debug!(
            amount = opts.amount_in_dollars,
            price = opts.price,
            quantity,
            "Derived order quantity from amount"
        );
        Ok(quantity)
    }
}

// ============================================================================
// CryptoOrder
// ============================================================================

/// A crypto order as reported by the service.
///
/// Orders returned by [`RobinhoodClient`] carry the client that fetched them,
/// so [`cancel`](Self::cancel) and [`refresh`](Self::refresh) work without
/// passing it again. An order decoded from JSON some other way has no client
/// until [`with_client`](Self::with_client) is called.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoOrder {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Account URL or id the order belongs to
    #[serde(deserialize_with = "null_default")]
    pub account: String,
    #[serde(deserialize_with = "null_default")]
    pub currency_pair_id: String,
    #[serde(with = "string_f64")]
    pub average_price: f64,
    #[serde(with = "string_f64")]
    pub price: f64,
    #[serde(with = "string_f64")]
    pub stop_price: f64,
    #[serde(deserialize_with = "null_default")]
    pub quantity: String,
    #[serde(deserialize_with = "null_default")]
    pub cumulative_quantity: String,
    #[serde(deserialize_with = "null_default")]
    pub side: String,
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub order_type: String,
    #[serde(deserialize_with = "null_default")]
    pub time_in_force: String,
    /// Opaque execution state, e.g. `unconfirmed`, `filled`, `canceled`
    #[serde(deserialize_with = "null_default")]
    pub state: String,
    /// Empty unless the service rejected the order
    #[serde(deserialize_with = "null_default")]
    pub reject_reason: String,
    /// Cancellation URL; empty once the order can no longer be cancelled
    #[serde(rename = "cancel", deserialize_with = "null_default")]
    pub cancel_url: String,
    /// Fill records, passed through untyped
    #[serde(deserialize_with = "null_default")]
    pub executions: Vec<Value>,
    #[serde(deserialize_with = "null_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_default")]
    pub last_transaction_at: String,
    #[serde(deserialize_with = "null_default")]
    pub url: String,

    #[serde(skip)]
    client: Option<RobinhoodClient>,
}

impl CryptoOrder {
    /// Attach the client used for follow-up requests.
    pub fn with_client(mut self, client: RobinhoodClient) -> Self {
        self.client = Some(client);
        self
    }

    /// The attached client, if any.
    pub fn client(&self) -> Option<&RobinhoodClient> {
        self.client.as_ref()
    }

    /// Whether the service rejected this order.
    pub fn is_rejected(&self) -> bool {
        !self.reject_reason.is_empty()
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }

    pub fn last_transaction_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_transaction_at)
    }

    /// The URL a cancel request goes to: the one the service sent, or
    /// `<orders_url><id>/cancel/`.
    pub fn cancel_url_or_default(&self, orders_url: &str) -> String {
        if self.cancel_url.is_empty() {
            format!("{}{}/cancel/", orders_url, urlencoding::encode(&self.id))
        } else {
            self.cancel_url.clone()
        }
    }

    /// Cancel this order through the attached client.
    ///
    /// Fails with [`ApiError::NoClient`] before any request if no client is
    /// attached.
    pub async fn cancel(&self) -> ApiResult<()> {
        let client = self.client.as_ref().ok_or(ApiError::NoClient)?;
        self.cancel_with(client).await
    }

    /// Cancel this order through `client`.
    ///
    /// A confirmation carrying a reject reason is returned as
    /// [`ApiError::Rejected`].
    pub async fn cancel_with(&self, client: &RobinhoodClient) -> ApiResult<()> {
        if self.cancel_url.is_empty() && self.id.is_empty() {
            return Err(ApiError::InvalidParameter(
                "order has neither an id nor a cancel URL".to_string(),
            ));
        }

        let url = self.cancel_url_or_default(&client.orders_url());
        let confirmation: CryptoOrder =
            do_and_decode(client.transport(), ApiRequest::post(url)).await?;

        if confirmation.is_rejected() {
            tracing::warn!(
                order_id = %self.id,
                reason = %confirmation.reject_reason,
                "Cancel rejected"
            );
            return Err(ApiError::Rejected(confirmation.reject_reason));
        }
        Ok(())
    }

    /// Fetch the current state of this order through the attached client.
    pub async fn refresh(&self) -> ApiResult<CryptoOrder> {
        let client = self.client.as_ref().ok_or(ApiError::NoClient)?;
        client.get_crypto_order(&self.id).await
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

//! Currency pair types for the crypto API.

use serde::{Deserialize, Serialize};

use crate::shared::serde_util::{null_default, string_f64};

/// A tradable crypto pair such as BTC-USD.
///
/// Only `id` is needed to place an order; the rest mirrors what the
/// currency-pairs listing returns and is empty when the pair was built with
/// [`CurrencyPair::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyPair {
    /// Remote-assigned pair id (UUID)
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Ticker symbol, e.g. `BTC-USD`
    #[serde(deserialize_with = "null_default")]
    pub symbol: String,
    /// Display name, e.g. `Bitcoin to US Dollar`
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// `tradable` or `untradable`
    #[serde(deserialize_with = "null_default")]
    pub tradability: String,
    #[serde(with = "string_f64")]
    pub min_order_size: f64,
    #[serde(with = "string_f64")]
    pub max_order_size: f64,
    #[serde(with = "string_f64")]
    pub min_order_price_increment: f64,
    #[serde(with = "string_f64")]
    pub min_order_quantity_increment: f64,
}

impl CurrencyPair {
    /// A pair known only by its id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Whether the service currently accepts orders for this pair.
    pub fn is_tradable(&self) -> bool {
        self.tradability == "tradable"
    }
}

//! Shared type definitions for the Robinhood crypto SDK.
//!
//! Order enums serialize as the lower-cased variant name, which is the form
//! the crypto endpoint accepts.

use serde::{Deserialize, Serialize};

// ============================================================================
// OrderSide
// ============================================================================

/// Direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy the base asset with the quote currency
    Buy,
    /// Sell the base asset for the quote currency
    Sell,
}

impl OrderSide {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// OrderType
// ============================================================================

/// Execution style of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute at the best available price
    #[default]
    Market,
    /// Execute at the given price or better
    Limit,
    /// Becomes a market order once the stop price trades
    Stop,
    /// Becomes a limit order once the stop price trades
    StopLimit,
}

impl OrderType {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::Stop => "stop",
            Self::StopLimit => "stoplimit",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TimeInForce
// ============================================================================

/// How long an order stays eligible for execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good for the trading day
    Gfd,
    /// Good till cancelled
    #[default]
    Gtc,
    /// Immediate or cancel
    Ioc,
    /// At the opening
    Opg,
}

impl TimeInForce {
    /// Get the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gfd => "gfd",
            Self::Gtc => "gtc",
            Self::Ioc => "ioc",
            Self::Opg => "opg",
        }
    }
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

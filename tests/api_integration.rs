//! Integration tests for the Robinhood crypto REST client.
//!
//! These run the client against a scripted in-memory transport that records
//! every request. For live API tests, enable the `live_tests` feature and set
//! the `ROBINHOOD_API_URL` environment variable.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use robinhood_crypto::api::*;
use robinhood_crypto::shared::{OrderSide, OrderType, TimeInForce};

const BASE_URL: &str = "https://nummus.test";
const PAIR_ID: &str = "3d961844-d360-45fc-989b-f6fca761d511";

// =============================================================================
// Scripted transport
// =============================================================================

#[derive(Debug, Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResult<Vec<u8>>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn respond_json(&self, body: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(serde_json::to_vec(&body).unwrap()));
    }

    fn respond_err(&self, err: ApiError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Vec<u8>> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Deserialize("no scripted response".to_string())))
    }
}

fn client_with(transport: &Arc<ScriptedTransport>) -> RobinhoodClient {
    RobinhoodClient::builder(BASE_URL)
        .crypto_account_id("acct-1")
        .transport(transport.clone())
        .build()
        .unwrap()
}

fn order_json(id: &str, reject_reason: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "account": "https://nummus.test/accounts/acct-1/",
        "average_price": null,
        "cancel": null,
        "created_at": "2021-03-01T15:04:05.123456-05:00",
        "cumulative_quantity": "0.000000000000000000",
        "currency_pair_id": PAIR_ID,
        "executions": [],
        "id": id,
        "last_transaction_at": null,
        "price": "33.33",
        "quantity": "3.000000000000000000",
        "reject_reason": reject_reason,
        "side": "buy",
        "state": "unconfirmed",
        "stop_price": null,
        "time_in_force": "gtc",
        "type": "limit",
        "updated_at": "2021-03-01T15:04:05.223456-05:00"
    })
}

fn body_json(request: &ApiRequest) -> serde_json::Map<String, serde_json::Value> {
    let body = request.body.as_ref().expect("request has a body");
    serde_json::from_slice(body).unwrap()
}

// =============================================================================
// Order placement
// =============================================================================

mod place_order {
    use super::*;

    #[tokio::test]
    async fn test_place_posts_payload_and_attaches_client() {
        let transport = ScriptedTransport::new();
        transport.respond_json(order_json("ord-1", None));
        let client = client_with(&transport);

        let opts = CryptoOrderOpts::new(OrderSide::Buy)
            .with_type(OrderType::Limit)
            .with_amount_in_dollars(100.0)
            .with_price(33.3399);
        let order = client
            .place_crypto_order(&CurrencyPair::new(PAIR_ID), opts)
            .await
            .unwrap();

        assert_eq!(order.id, "ord-1");
        assert_eq!(order.price, 33.33);
        assert!(order.client().is_some());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, "https://nummus.test/orders/");
        assert_eq!(req.header_value("Content-Type"), Some("application/json"));

        let body = body_json(req);
        assert_eq!(body["account_id"], "acct-1");
        assert_eq!(body["currency_pair_id"], PAIR_ID);
        assert_eq!(body["price"], serde_json::json!(33.33));
        assert_eq!(body["quantity"], serde_json::json!(3.0));
        assert_eq!(body["side"], "buy");
        assert_eq!(body["type"], "limit");
        assert_eq!(body["time_in_force"], "gtc");
        assert!(body["ref_id"].as_str().is_some_and(|s| !s.is_empty()));
    }

    #[tokio::test]
    async fn test_each_placement_gets_a_new_ref_id() {
        let transport = ScriptedTransport::new();
        transport.respond_json(order_json("ord-1", None));
        transport.respond_json(order_json("ord-2", None));
        let client = client_with(&transport);

        let opts = CryptoOrderOpts::new(OrderSide::Sell).with_quantity(1.0);
        let pair = CurrencyPair::new(PAIR_ID);
        client.place_crypto_order(&pair, opts.clone()).await.unwrap();
        client.place_crypto_order(&pair, opts).await.unwrap();

        let requests = transport.requests();
        assert_ne!(body_json(&requests[0])["ref_id"], body_json(&requests[1])["ref_id"]);
    }

    #[tokio::test]
    async fn test_zero_price_amount_order_sends_nothing() {
        let transport = ScriptedTransport::new();
        let client = client_with(&transport);

        let opts = CryptoOrderOpts::new(OrderSide::Buy).with_amount_in_dollars(100.0);
        let err = client
            .place_crypto_order(&CurrencyPair::new(PAIR_ID), opts)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_propagates_unchanged() {
        let transport = ScriptedTransport::new();
        transport.respond_err(ApiError::BadRequest(ErrorResponse::from_text(
            "Insufficient buying power.".to_string(),
        )));
        let client = client_with(&transport);

        let err = client
            .place_crypto_order(
                &CurrencyPair::new(PAIR_ID),
                CryptoOrderOpts::new(OrderSide::Buy).with_quantity(1.0),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.to_string(), "Bad request: Insufficient buying power.");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_placement_is_a_value() {
        let transport = ScriptedTransport::new();
        transport.respond_json(order_json("ord-1", Some("market closed")));
        let client = client_with(&transport);

        let order = client
            .place_crypto_order(
                &CurrencyPair::new(PAIR_ID),
                CryptoOrderOpts::new(OrderSide::Buy)
                    .with_quantity(1.0)
                    .with_time_in_force(TimeInForce::Ioc),
            )
            .await
            .unwrap();

        assert!(order.is_rejected());
        assert_eq!(order.reject_reason, "market closed");
    }

    #[tokio::test]
    async fn test_malformed_response_is_deserialize_error() {
        let transport = ScriptedTransport::new();
        transport
            .responses
            .lock()
            .unwrap()
            .push_back(Ok(b"<html>bad gateway</html>".to_vec()));
        let client = client_with(&transport);

        let err = client
            .place_crypto_order(
                &CurrencyPair::new(PAIR_ID),
                CryptoOrderOpts::new(OrderSide::Buy).with_quantity(1.0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialize(_)));
    }
}

// =============================================================================
// Cancellation
// =============================================================================

mod cancel_order {
    use super::*;

    async fn placed(transport: &Arc<ScriptedTransport>) -> CryptoOrder {
        transport.respond_json(order_json("ord-1", None));
        client_with(transport)
            .place_crypto_order(
                &CurrencyPair::new(PAIR_ID),
                CryptoOrderOpts::new(OrderSide::Buy).with_quantity(1.0),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_cancel_success() {
        let transport = ScriptedTransport::new();
        let order = placed(&transport).await;
        transport.respond_json(order_json("ord-1", None));

        order.cancel().await.unwrap();

        let requests = transport.requests();
        let cancel = &requests[1];
        assert_eq!(cancel.method, Method::Post);
        assert_eq!(cancel.url, "https://nummus.test/orders/ord-1/cancel/");
        assert!(cancel.body.is_none());
    }

    #[tokio::test]
    async fn test_cancel_rejected_carries_reason() {
        let transport = ScriptedTransport::new();
        let order = placed(&transport).await;
        transport.respond_json(order_json("ord-1", Some("insufficient funds")));

        let err = order.cancel().await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref reason) if reason == "insufficient funds"));
        assert!(err.to_string().contains("insufficient funds"));
    }

    #[tokio::test]
    async fn test_cancel_uses_returned_cancel_url() {
        let transport = ScriptedTransport::new();
        let mut response = order_json("ord-1", None);
        response["cancel"] = serde_json::json!("https://nummus.test/orders/ord-1/cancel-now/");
        transport.respond_json(response);
        let order = client_with(&transport)
            .place_crypto_order(
                &CurrencyPair::new(PAIR_ID),
                CryptoOrderOpts::new(OrderSide::Buy).with_quantity(1.0),
            )
            .await
            .unwrap();
        transport.respond_json(order_json("ord-1", None));

        order.cancel().await.unwrap();
        assert_eq!(
            transport.requests()[1].url,
            "https://nummus.test/orders/ord-1/cancel-now/"
        );
    }

    #[tokio::test]
    async fn test_cancel_transport_error_propagates() {
        let transport = ScriptedTransport::new();
        let order = placed(&transport).await;
        let not_found = ErrorResponse::from_text("Not found.".to_string());
        transport.respond_err(ApiError::NotFound(not_found));

        let err = order.cancel().await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_cancel_without_client_is_misuse() {
        let order: CryptoOrder = serde_json::from_value(order_json("ord-1", None)).unwrap();
        assert!(order.client().is_none());
        assert!(matches!(order.cancel().await, Err(ApiError::NoClient)));
    }

    #[tokio::test]
    async fn test_cancel_with_explicit_client() {
        let transport = ScriptedTransport::new();
        transport.respond_json(order_json("ord-1", None));
        let client = client_with(&transport);

        let order: CryptoOrder = serde_json::from_value(order_json("ord-1", None)).unwrap();
        order.cancel_with(&client).await.unwrap();

        assert_eq!(transport.requests()[0].url, "https://nummus.test/orders/ord-1/cancel/");
    }

    #[tokio::test]
    async fn test_with_client_enables_cancel() {
        let transport = ScriptedTransport::new();
        transport.respond_json(order_json("ord-1", None));
        let client = client_with(&transport);

        let stored = serde_json::json!({"id": "ord-1"});
        let order: CryptoOrder = serde_json::from_value(stored).unwrap();
        assert!(order.client().is_none());
        order.with_client(client).cancel().await.unwrap();
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://nummus.test/orders/ord-1/cancel/");
    }
}

// =============================================================================
// Lookup
// =============================================================================

mod get_order {
    use super::*;

    #[tokio::test]
    async fn test_get_order_by_id() {
        let transport = ScriptedTransport::new();
        let mut response = order_json("ord-9", None);
        response["price"] = serde_json::json!("1234.50");
        response["state"] = serde_json::json!("filled");
        transport.respond_json(response);
        let client = client_with(&transport);

        let order = client.get_crypto_order("ord-9").await.unwrap();
        assert_eq!(order.id, "ord-9");
        assert_eq!(order.price, 1234.50);
        assert_eq!(order.state, "filled");
        assert!(order.client().is_some());

        let req = &transport.requests()[0];
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.url, "https://nummus.test/orders/ord-9");
        assert!(req.body.is_none());
    }

    #[tokio::test]
    async fn test_refresh_reuses_attached_client() {
        let transport = ScriptedTransport::new();
        transport.respond_json(order_json("ord-1", None));
        let mut filled = order_json("ord-1", None);
        filled["state"] = serde_json::json!("filled");
        transport.respond_json(filled);
        let client = client_with(&transport);

        let order = client.get_crypto_order("ord-1").await.unwrap();
        let latest = order.refresh().await.unwrap();

        assert_eq!(latest.state, "filled");
        assert_eq!(order.state, "unconfirmed");
        assert_eq!(transport.requests()[1].url, "https://nummus.test/orders/ord-1");
    }

    #[tokio::test]
    async fn test_get_order_error_propagates() {
        let transport = ScriptedTransport::new();
        transport.respond_err(ApiError::Unauthorized(ErrorResponse::from_text(
            "Authentication credentials were not provided.".to_string(),
        )));
        let client = client_with(&transport);

        let err = client.get_crypto_order("ord-1").await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
    }
}

// =============================================================================
// Response types
// =============================================================================

mod response_types {
    use super::*;

    #[test]
    fn test_executions_are_untyped_records() {
        let mut json = order_json("ord-1", None);
        json["executions"] = serde_json::json!([
            {"effective_price": "1234.50", "quantity": "0.5", "id": "ex-1"},
            {"anything": {"nested": true}}
        ]);
        let order: CryptoOrder = serde_json::from_value(json).unwrap();
        assert_eq!(order.executions.len(), 2);
        assert_eq!(order.executions[0]["id"], "ex-1");
        assert_eq!(order.executions[1]["anything"]["nested"], true);
    }

    #[test]
    fn test_non_object_executions_are_kept() {
        let mut json = order_json("ord-1", None);
        json["executions"] = serde_json::json!(["ex-1", 42, null]);
        let order: CryptoOrder = serde_json::from_value(json).unwrap();
        assert_eq!(order.executions.len(), 3);
        assert_eq!(order.executions[0], "ex-1");
        assert_eq!(order.executions[1], 42);
        assert!(order.executions[2].is_null());
    }

    #[test]
    fn test_null_executions_decode_empty() {
        let mut json = order_json("ord-1", None);
        json["executions"] = serde_json::Value::Null;
        let order: CryptoOrder = serde_json::from_value(json).unwrap();
        assert!(order.executions.is_empty());
    }

    #[test]
    fn test_string_prices_round_trip() {
        let mut json = order_json("ord-1", None);
        json["average_price"] = serde_json::json!("1234.50");
        json["stop_price"] = serde_json::json!("1200.00");
        let order: CryptoOrder = serde_json::from_value(json).unwrap();
        assert_eq!(order.average_price, 1234.50);
        assert_eq!(order.stop_price, 1200.0);

        let again = serde_json::to_value(&order).unwrap();
        assert_eq!(again["average_price"], "1234.5");
        assert_eq!(again["type"], "limit");
        assert_eq!(again["cancel"], "");
    }
}

// =============================================================================
// Live API Tests (require ROBINHOOD_API_URL environment variable)
// =============================================================================

#[cfg(feature = "live_tests")]
mod live_tests {
    use super::*;

    fn get_client() -> Option<RobinhoodClient> {
        let url = std::env::var("ROBINHOOD_API_URL").ok()?;
        let mut builder = RobinhoodClient::builder(url);
        if let Ok(token) = std::env::var("ROBINHOOD_TOKEN") {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.build().ok()
    }

    #[tokio::test]
    async fn test_live_unknown_order_is_not_found() {
        let Some(client) = get_client() else {
            println!("Skipping live test: ROBINHOOD_API_URL not set");
            return;
        };

        let result = client
            .get_crypto_order("00000000-0000-0000-0000-000000000000")
            .await;
        assert!(result.is_err(), "Unexpected order: {:?}", result);
    }
}

//! Transport seam between the order types and the network.
//!
//! [`Transport`] takes a prepared [`ApiRequest`] and returns the body of a
//! successful response. [`do_and_decode`] and [`get_and_decode`] turn that
//! body into a typed value. [`HttpTransport`] is the reqwest implementation
//! used by default; tests and callers with their own HTTP stack can supply
//! any other implementation through
//! [`RobinhoodClientBuilder::transport`](crate::api::RobinhoodClientBuilder::transport).

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully prepared request, ready to hand to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// A GET request with no body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST request with no body.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `body` as JSON and set `Content-Type: application/json`.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let payload = serde_json::to_vec(body)?;
        self.body = Some(payload);
        Ok(self.header("Content-Type", "application/json"))
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Executes prepared requests.
///
/// Implementations return the raw body of a 2xx response and map anything
/// else to an [`ApiError`]. They must be safe to share between tasks; the
/// client holds one behind an `Arc` and every order result clones it.
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ApiResult<Vec<u8>>;
}

/// Execute `request` and decode the response body into `T`.
pub async fn do_and_decode<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> ApiResult<T> {
    tracing::debug!(method = %request.method, url = %request.url, "Sending request");
    let body = transport.execute(request).await?;
    decode(&body)
}

/// GET `url` and decode the response body into `T`.
pub async fn get_and_decode<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
) -> ApiResult<T> {
    do_and_decode(transport, ApiRequest::get(url)).await
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Deserialize(format!("Failed to deserialize response: {}", e)))
}

// =============================================================================
// reqwest implementation
// =============================================================================

#[cfg(feature = "http")]
pub use http_impl::HttpTransport;

#[cfg(feature = "http")]
mod http_impl {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use reqwest::{Client, StatusCode};

    use super::{ApiRequest, Method, Transport};
    use crate::api::error::{ApiError, ApiResult, ErrorResponse};

    /// [`Transport`] backed by a pooled `reqwest::Client`.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        http_client: Client,
    }

    impl HttpTransport {
        /// Build a transport with the given timeout and default headers.
        pub fn new(timeout: Duration, default_headers: HeaderMap) -> ApiResult<Self> {
            let http_client = Client::builder()
                .timeout(timeout)
                .pool_max_idle_per_host(10)
                .default_headers(default_headers)
                .build()?;
            Ok(Self { http_client })
        }

        /// Parse an error response into an ApiError.
        async fn parse_error_response(response: reqwest::Response) -> ApiError {
            let status = response.status();
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to read error response body: {}", e);
                    let text = format!("HTTP {} (body unreadable: {})", status, e);
                    return Self::map_status_error(status, ErrorResponse::from_text(text));
                }
            };

            Self::error_from_body(status, error_text)
        }

        /// Build the error for a non-success `status` from its body text.
        ///
        /// JSON bodies carrying `detail`/`error`/`non_field_errors` are parsed;
        /// anything else is kept verbatim.
        fn error_from_body(status: StatusCode, text: String) -> ApiError {
            let error_response = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .filter(|r| r.message.is_some() || !r.non_field_errors.is_empty())
                .unwrap_or_else(|| ErrorResponse::from_text(text));

            Self::map_status_error(status, error_response)
        }

        /// Map HTTP status code to ApiError.
        fn map_status_error(status: StatusCode, response: ErrorResponse) -> ApiError {
            match status {
                StatusCode::UNAUTHORIZED => ApiError::Unauthorized(response),
                StatusCode::NOT_FOUND => ApiError::NotFound(response),
                StatusCode::BAD_REQUEST => ApiError::BadRequest(response),
                StatusCode::FORBIDDEN => ApiError::Forbidden(response),
                StatusCode::CONFLICT => ApiError::Conflict(response),
                StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited(response),
                _ if status.is_server_error() => ApiError::ServerError(response),
                _ => ApiError::UnexpectedStatus(status.as_u16(), response),
            }
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn execute(&self, request: ApiRequest) -> ApiResult<Vec<u8>> {
            let mut builder = match request.method {
                Method::Get => self.http_client.get(&request.url),
                Method::Post => self.http_client.post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            if response.status().is_success() {
                return Ok(response.bytes().await?.to_vec());
            }
            Err(Self::parse_error_response(response).await)
        }
    }

}

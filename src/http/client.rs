//! Low-level HTTP client — `HyperFillHttp`.
//!
//! One method per backend endpoint. Returns wire types (conversion to domain
//! types happens in the domain sub-clients). The orderbook backend takes every
//! request body as JSON in a multipart `payload` field; JSON-RPC goes through
//! [`HyperFillHttp::post_json`].

use crate::domain::agent::wire::AgentResponse;
use crate::domain::order::wire::{
    AvailableFundsPayload, BestOrderPayload, CancelOrderPayload, OrderLookupPayload,
    RegisterOrderPayload, RegisterOrderResponse,
};
use crate::domain::orderbook::wire::{OrderbookPayload, OrderbookResponse};
use crate::error::HttpError;
use crate::http::retry::RetryPolicy;

use reqwest::multipart::Form;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A request body, serialized once and re-attached on every attempt.
#[derive(Debug, Clone)]
enum RequestBody {
    Empty,
    Json(String),
    /// JSON sent as the multipart form field `payload`.
    Payload(String),
}

/// Low-level HTTP client for the HyperFill REST APIs.
#[derive(Clone)]
pub struct HyperFillHttp {
    api_url: String,
    agent_url: String,
    client: Client,
}

impl HyperFillHttp {
    pub fn new(api_url: &str, agent_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            agent_url: agent_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn agent_url(&self) -> &str {
        &self.agent_url
    }

    // ── Orders ───────────────────────────────────────────────────────────

    /// Never retried: a failed registration is reported, not replayed.
    pub async fn register_order(
        &self,
        payload: &RegisterOrderPayload,
    ) -> Result<RegisterOrderResponse, HttpError> {
        let url = format!("{}/api/register_order", self.api_url);
        self.post_payload(&url, payload, RetryPolicy::None).await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}/api/order", self.api_url);
        let payload = OrderLookupPayload {
            order_id: order_id.to_string(),
        };
        self.post_payload(&url, &payload, RetryPolicy::Idempotent)
            .await
    }

    pub async fn cancel_order(
        &self,
        payload: &CancelOrderPayload,
    ) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}/api/cancel_order", self.api_url);
        self.post_payload(&url, payload, RetryPolicy::None).await
    }

    pub async fn get_best_order(
        &self,
        payload: &BestOrderPayload,
    ) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}/api/get_best_order", self.api_url);
        self.post_payload(&url, payload, RetryPolicy::Idempotent)
            .await
    }

    pub async fn check_available_funds(
        &self,
        payload: &AvailableFundsPayload,
    ) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}/api/check_available_funds", self.api_url);
        self.post_payload(&url, payload, RetryPolicy::Idempotent)
            .await
    }

    pub async fn settlement_health(&self) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}/api/settlement_health", self.api_url);
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Orderbooks ───────────────────────────────────────────────────────

    pub async fn get_orderbook(&self, symbol: &str) -> Result<OrderbookResponse, HttpError> {
        let url = format!("{}/api/orderbook", self.api_url);
        let payload = OrderbookPayload {
            symbol: symbol.to_string(),
        };
        self.post_payload(&url, &payload, RetryPolicy::Idempotent)
            .await
    }

    // ── Agent ────────────────────────────────────────────────────────────

    pub async fn start_agent(&self) -> Result<AgentResponse, HttpError> {
        let url = format!("{}/start-bot", self.agent_url);
        self.get(&url, RetryPolicy::None).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, RequestBody::Empty, retry)
            .await
    }

    /// POST a plain JSON body (JSON-RPC).
    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let body = RequestBody::Json(encode(body)?);
        self.request_with_retry(reqwest::Method::POST, url, body, retry)
            .await
    }

    /// POST `payload` as the multipart `payload` field.
    pub(crate) async fn post_payload<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        payload: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let body = RequestBody::Payload(encode(payload)?);
        self.request_with_retry(reqwest::Method::POST, url, body, retry)
            .await
    }

    async fn request_with_retry<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: RequestBody,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let Some(config) = retry.config() else {
            return self.do_request(&method, url, &body).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T>(&method, url, &body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if config.should_retry(&e) && attempt < config.max_retries {
                        let delay = match &e {
                            HttpError::RateLimited {
                                retry_after_ms: Some(ms),
                            } => Duration::from_millis(*ms),
                            _ => config.delay_for_attempt(attempt),
                        };
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: &RequestBody,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        match body {
            RequestBody::Empty => {}
            RequestBody::Json(json) => {
                req = req
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(json.clone());
            }
            RequestBody::Payload(json) => {
                req = req.multipart(Form::new().text("payload", json.clone()));
            }
        }

        let resp = req.send().await.map_err(map_transport)?;
        let status = resp.status();

        if status.is_success() {
            return resp.json::<T>().await.map_err(map_transport);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let body_text = resp.text().await.unwrap_or_default();

        // The backend reports validation failures as a 4xx with the usual
        // `{status_code, message, errors}` envelope; hand that to the caller.
        if matches!(body, RequestBody::Payload(_))
            && (400..=499).contains(&status_code)
            && !matches!(status_code, 401 | 404 | 429)
        {
            if let Ok(parsed) = serde_json::from_str::<T>(&body_text) {
                return Ok(parsed);
            }
        }

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<String, HttpError> {
    serde_json::to_string(body).map_err(|e| HttpError::Encode(e.to_string()))
}

fn map_transport(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Reqwest(e)
    }
}

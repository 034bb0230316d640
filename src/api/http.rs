use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;

use super::error::ApiError;
use super::rate_limiter::RateLimiter;
use super::transport::{HttpResponse, HttpTransport, SignedRequest};
use crate::models::{ClientConfig, RetryConfig};

/// Production transport: `reqwest` plus retries and optional pacing
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    retry: RetryConfig,
    rate_limiter: Option<RateLimiter>,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::RequestBuild(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            retry: config.retry,
            rate_limiter: config.rate_limit.map(RateLimiter::new),
        })
    }

    async fn send_once(&self, request: &SignedRequest) -> Result<reqwest::Response, reqwest::Error> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.acquire().await;
        }

        self.http_client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .body(request.raw_body.clone())
            .send()
            .await
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Server-requested wait in whole seconds, honoured on 429 and 503
fn retry_after(status: StatusCode, headers: &HeaderMap) -> Option<Duration> {
    if status != StatusCode::TOO_MANY_REQUESTS && status != StatusCode::SERVICE_UNAVAILABLE {
        return None;
    }
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn into_http_response(response: reqwest::Response) -> HttpResponse {
    let status = response.status();
    HttpResponse::with_reader(
        status,
        Box::pin(async move {
            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| e.to_string())
        }),
    )
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: SignedRequest) -> Result<HttpResponse, ApiError> {
        let mut attempt = 0;

        loop {
            let retries_left = attempt < self.retry.max_retries;

            let wait = match self.send_once(&request).await {
                Ok(response) if retries_left && is_retryable_status(response.status()) => {
                    log::warn!(
                        "{} {} returned {}, retrying ({}/{})",
                        request.method,
                        request.path,
                        response.status(),
                        attempt + 1,
                        self.retry.max_retries
                    );
                    retry_after(response.status(), response.headers())
                        .unwrap_or_else(|| self.retry.backoff(attempt))
                }
                Ok(response) => return Ok(into_http_response(response)),
                Err(e) if retries_left && is_retryable_error(&e) => {
                    log::warn!(
                        "{} {} failed: {}, retrying ({}/{})",
                        request.method,
                        request.path,
                        e,
                        attempt + 1,
                        self.retry.max_retries
                    );
                    self.retry.backoff(attempt)
                }
                Err(e) => {
                    log::error!(
                        "{} {} giving up after {} attempt(s)",
                        request.method,
                        request.path,
                        attempt + 1
                    );
                    return Err(e.into());
                }
            };

            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}

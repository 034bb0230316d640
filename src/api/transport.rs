use std::fmt;

use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};

use super::error::ApiError;

/// A fully prepared request: URL resolved, raw body built, headers signed
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    /// Versioned path that was signed (e.g. `/v1/futures`)
    pub path: String,
    pub headers: HeaderMap,
    pub raw_body: Vec<u8>,
}

type BodyReader = BoxFuture<'static, Result<Vec<u8>, String>>;

/// Response handed back by a transport
///
/// The body is read lazily so that fatal statuses can be rejected without
/// ever touching the stream.
pub struct HttpResponse {
    status: StatusCode,
    body: Option<BodyReader>,
}

impl HttpResponse {
    /// Response whose body is already in memory
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status,
            body: Some(Box::pin(async move { Ok::<_, String>(body) })),
        }
    }

    /// Response whose body is produced on demand
    pub fn with_reader(status: StatusCode, reader: BodyReader) -> Self {
        Self {
            status,
            body: Some(reader),
        }
    }

    /// Response without a body stream
    pub fn without_body(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Consume the response and read the whole body
    pub async fn read_body(self) -> Result<Vec<u8>, ApiError> {
        match self.body {
            Some(reader) => reader.await.map_err(ApiError::BodyUnreadable),
            None => Err(ApiError::BodyUnreadable("response has no body".to_string())),
        }
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Executes prepared requests; swapped for a stub in tests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: SignedRequest) -> Result<HttpResponse, ApiError>;
}

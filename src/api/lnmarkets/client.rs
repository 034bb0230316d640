use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{
    error::ApiError,
    http::ReqwestTransport,
    response::{parse_response, ApiResponse},
    signing::{build_raw_body, compute_signature, Params},
    transport::{HttpTransport, SignedRequest},
};
use crate::models::{ClientConfig, Credentials};

pub const HEADER_ACCESS_KEY: HeaderName = HeaderName::from_static("lnm-access-key");
pub const HEADER_ACCESS_PASSPHRASE: HeaderName = HeaderName::from_static("lnm-access-passphrase");
pub const HEADER_ACCESS_SIGNATURE: HeaderName = HeaderName::from_static("lnm-access-signature");
pub const HEADER_ACCESS_TIMESTAMP: HeaderName = HeaderName::from_static("lnm-access-timestamp");

/// What a single call sends, before signing
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Endpoint relative to the version prefix (e.g. `futures/ticker`)
    pub endpoint: String,
    pub with_auth: bool,
    pub params: Params,
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn new(method: Method, endpoint: impl Into<String>, with_auth: bool) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            with_auth,
            params: Params::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Attach a JSON body serialized from `payload`
    pub fn with_json<B: Serialize>(mut self, payload: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| ApiError::RequestBuild(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(body);
        Ok(self)
    }
}

/// LN Markets REST client
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct LnMarketsClient {
    credentials: Credentials,
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl LnMarketsClient {
    /// Client against the production endpoint with default settings
    pub fn new(credentials: Credentials) -> Result<Self, ApiError> {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(credentials, config, Arc::new(transport))
    }

    /// Client over a caller-provided transport
    pub fn with_transport(
        credentials: Credentials,
        mut config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        credentials.validate()?;
        // the signed path starts at the version segment
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&config.base_url)
            .map_err(|e| ApiError::RequestBuild(format!("Invalid base URL {}: {}", config.base_url, e)))?;

        Ok(Self {
            credentials,
            config,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolve the URL, build the raw body and sign it
    pub fn prepare_request(&self, descriptor: &RequestDescriptor) -> Result<SignedRequest, ApiError> {
        let path = format!("/{}/{}", self.config.version, descriptor.endpoint);
        let url = Url::parse(&format!("{}{}", self.config.base_url, path))
            .map_err(|e| ApiError::RequestBuild(format!("Invalid request URL for {}: {}", path, e)))?;

        let raw_body = build_raw_body(descriptor.body.as_deref(), &descriptor.params)?;
        let timestamp = self.credentials.timestamp();

        let mut headers = HeaderMap::new();
        if descriptor.with_auth {
            let signature = compute_signature(
                timestamp,
                descriptor.method.as_str(),
                &path,
                &raw_body,
                self.credentials.secret(),
            );
            headers.insert(HEADER_ACCESS_KEY, header_value(self.credentials.key(), "API key")?);
            headers.insert(
                HEADER_ACCESS_PASSPHRASE,
                header_value(self.credentials.passphrase(), "passphrase")?,
            );
            headers.insert(HEADER_ACCESS_SIGNATURE, header_value(&signature, "signature")?);
        }
        headers.insert(HEADER_ACCESS_TIMESTAMP, header_value(timestamp, "timestamp")?);

        if descriptor.body.as_ref().is_some_and(|b| !b.is_empty()) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(SignedRequest {
            method: descriptor.method.clone(),
            url,
            path,
            headers,
            raw_body,
        })
    }

    /// Sign, send and decode one call
    pub async fn request<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<ApiResponse<T>, ApiError> {
        let request = self.prepare_request(&descriptor)?;
        log::debug!("{} {}", request.method, request.path);

        let call = async {
            let response = self.transport.execute(request).await.map_err(|e| match e {
                ApiError::RequestExecution(_) | ApiError::Timeout(_) => e,
                other => ApiError::RequestExecution(other.to_string()),
            })?;
            parse_response(response).await
        };

        match self.config.call_timeout() {
            Some(deadline) => tokio::time::timeout(deadline, call).await.map_err(|_| {
                ApiError::Timeout(format!(
                    "{} {} exceeded {:?}",
                    descriptor.method, descriptor.endpoint, deadline
                ))
            })?,
            None => call.await,
        }
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::RequestBuild(format!("Invalid {}: {}", what, e)))
}

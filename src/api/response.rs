use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::transport::HttpResponse;

const EMPTY_ARRAY: &[u8] = b"[]";
const ERROR_KEY: &str = "error";

/// Outcome of a call that reached the exchange and returned a readable payload
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// Payload decoded into the expected shape
    Data(T),
    /// The exchange answered with a bare `[]`
    NoData,
    /// The payload carried an `error` field
    Rejected { status: u16, message: String },
}

impl<T> ApiResponse<T> {
    pub fn data(self) -> Option<T> {
        match self {
            ApiResponse::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ApiResponse::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Strict view: an API-level rejection becomes `ApiError::Rejected`
    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        match self {
            ApiResponse::Data(data) => Ok(Some(data)),
            ApiResponse::NoData => Ok(None),
            ApiResponse::Rejected { status, message } => Err(ApiError::Rejected { status, message }),
        }
    }
}

/// Classify the status, read the body and decode the envelope
pub async fn parse_response<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<ApiResponse<T>, ApiError> {
    let status = response.status();
    if status.as_u16() >= 500 {
        return Err(ApiError::FatalStatus(status.as_u16()));
    }

    let body = response.read_body().await?;

    if status.as_u16() > 299 {
        log::warn!("LN Markets responded with status {}", status);
    }

    decode_envelope(status, &body)
}

fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<ApiResponse<T>, ApiError> {
    if body == EMPTY_ARRAY {
        return Ok(ApiResponse::NoData);
    }

    let value: Value = serde_json::from_slice(body)?;

    if let Some(error) = value.get(ERROR_KEY).filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        log::warn!("LN Markets API error ({}): {}", status, message);
        return Ok(ApiResponse::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    Ok(ApiResponse::Data(serde_json::from_value(value)?))
}

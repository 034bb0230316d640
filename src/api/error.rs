use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("error during request creation: {0}")]
    RequestBuild(String),

    #[error("error during request execution: {0}")]
    RequestExecution(String),

    #[error("error during response parsing: invalid status code {0}")]
    FatalStatus(u16),

    #[error("error during response parsing: can not read response body: {0}")]
    BodyUnreadable(String),

    #[error("error during response parsing: json decoding: {0}")]
    Decode(String),

    #[error("Invalid credentials: missing {0}")]
    InvalidCredentials(&'static str),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Exchange API error: {status} - {message}")]
    Rejected { status: u16, message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::RequestExecution(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for ApiError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        ApiError::RequestBuild(err.to_string())
    }
}

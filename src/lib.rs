//! Async client for the LN Markets futures REST API.
//!
//! Requests are signed with HMAC-SHA256 over `timestamp + method + path + body`
//! and sent through a pluggable [`HttpTransport`]. Every endpoint returns an
//! [`ApiResponse`] envelope: decoded data, an empty `[]` answer, or the
//! exchange's `error` message.

pub mod api;
pub mod models;

pub use api::lnmarkets::types::{
    NewPositionRequest, OrderSide, OrderType, TickerResponse, UpdateType, UserResponse,
};
pub use api::{
    ApiError, ApiResponse, HttpResponse, HttpTransport, LnMarketsClient, ReqwestTransport,
    SignedRequest,
};
pub use models::{ClientConfig, Credentials, RetryConfig};

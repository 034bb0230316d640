pub mod error;
pub mod http;
pub mod lnmarkets;
pub mod rate_limiter;
pub mod response;
pub mod signing;
pub mod transport;

pub use error::ApiError;
pub use http::ReqwestTransport;
pub use lnmarkets::{LnMarketsClient, RequestDescriptor};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use response::{parse_response, ApiResponse};
pub use signing::{build_raw_body, compute_signature, Params};
pub use transport::{HttpResponse, HttpTransport, SignedRequest};

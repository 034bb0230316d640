use reqwest::Method;

use super::client::{LnMarketsClient, RequestDescriptor};
use super::types::UserResponse;
use crate::api::{error::ApiError, response::ApiResponse};

const USER: &str = "user";

impl LnMarketsClient {
    /// Account information of the authenticated user
    pub async fn user(&self) -> Result<ApiResponse<UserResponse>, ApiError> {
        self.request(RequestDescriptor::new(Method::GET, USER, true)).await
    }
}

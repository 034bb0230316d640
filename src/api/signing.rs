use std::collections::BTreeMap;

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::ApiError;

type HmacSha256 = Hmac<Sha256>;

/// Query or form parameters, kept sorted by key so the encoded body is stable
pub type Params = BTreeMap<String, String>;

/// Generate the HMAC-SHA256 signature for an LN Markets request
///
/// The prehash is `timestamp + method + path + raw_body` with no separators.
/// `path` must carry the version prefix (e.g. `/v1/futures`).
pub fn compute_signature(
    timestamp: &str,
    method: &str,
    path: &str,
    raw_body: &[u8],
    secret: &str,
) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(raw_body);

    general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Build the bytes that are both signed and sent as the request body
///
/// A non-empty `body` wins and is returned untouched. Otherwise `params` are
/// form-encoded; no params yields an empty body.
pub fn build_raw_body(body: Option<&[u8]>, params: &Params) -> Result<Vec<u8>, ApiError> {
    match body {
        Some(bytes) if !bytes.is_empty() => Ok(bytes.to_vec()),
        _ => Ok(serde_urlencoded::to_string(params)?.into_bytes()),
    }
}

use std::fmt;

use crate::api::error::ApiError;

/// API credentials for one LN Markets account
///
/// The timestamp is captured once and sent with every request issued by the
/// client that owns these credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
    passphrase: String,
    timestamp: String,
}

impl Credentials {
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            passphrase: passphrase.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Read `LNMARKETS_API_KEY`, `LNMARKETS_SECRET` and `LNMARKETS_PASSPHRASE`,
    /// stamped with the current time in Unix milliseconds
    pub fn from_env() -> Result<Self, ApiError> {
        let read = |name: &str, field: &'static str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ApiError::InvalidCredentials(field))
        };

        let credentials = Self::new(
            read("LNMARKETS_API_KEY", "api key")?,
            read("LNMARKETS_SECRET", "secret")?,
            read("LNMARKETS_PASSPHRASE", "passphrase")?,
            chrono::Utc::now().timestamp_millis().to_string(),
        );
        credentials.validate()?;
        Ok(credentials)
    }

    /// Reject credentials with an empty field
    pub fn validate(&self) -> Result<(), ApiError> {
        let fields = [
            (&self.key, "api key"),
            (&self.secret, "secret"),
            (&self.passphrase, "passphrase"),
            (&self.timestamp, "timestamp"),
        ];
        match fields.iter().find(|(value, _)| value.trim().is_empty()) {
            Some((_, name)) => Err(ApiError::InvalidCredentials(*name)),
            None => Ok(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Key preview (last 4 characters)
    pub fn key_preview(&self) -> String {
        let len = self.key.chars().count();
        if len <= 4 {
            "*".repeat(len)
        } else {
            let tail: String = self.key.chars().skip(len - 4).collect();
            format!("{}...{}", "*".repeat(4), tail)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key_preview())
            .field("secret", &"***REDACTED***")
            .field("passphrase", &"***REDACTED***")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

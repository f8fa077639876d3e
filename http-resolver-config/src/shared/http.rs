use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Settings of the outbound HTTP client used to download source documents.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// Total time allowed for a single request, body included.
    ///
    /// When unset the transport defaults apply, which means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_timeout_ms == Some(0) {
            return Err(ValidationError::RequestTimeoutZero);
        }

        Ok(())
    }
}

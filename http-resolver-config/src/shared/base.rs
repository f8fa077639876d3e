use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// At least one source must be configured.
    #[error("`sources` must contain at least one url")]
    SourcesEmpty,
    /// A source could not be parsed as an absolute url.
    #[error("Invalid source url `{url}`: {reason}")]
    InvalidSourceUrl { url: String, reason: String },
    /// A source uses a scheme other than `http` or `https`.
    #[error("Unsupported scheme `{scheme}` in source url `{url}`, expected `http` or `https`")]
    UnsupportedSourceScheme { url: String, scheme: String },
    /// A request timeout of zero would fail every request.
    #[error("`http.request_timeout_ms` cannot be zero")]
    RequestTimeoutZero,
}

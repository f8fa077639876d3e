use std::error;
use std::fmt;

/// Convenient result type for resolver operations using [`ResolverError`] as the error type.
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Main error type of the resolver.
///
/// Every [`ResolverError`] is classified by an [`ErrorKind`] and carries a static description
/// plus an optional dynamic detail. Resolution stops at the first failure, so errors are never
/// aggregated.
#[derive(Debug, Clone)]
pub struct ResolverError {
    repr: ErrorRepr,
}

#[derive(Debug, Clone)]
enum ErrorRepr {
    WithDescription(ErrorKind, &'static str),
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
}

/// Categories of failures, one per boundary the resolution crosses.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    // Request Errors
    InvalidParameters,

    // Resolution Fetch Errors
    SourceFetchFailed,

    // Manifest Apply Errors
    ManifestFetchFailed,
    ManifestDecodeError,
    ManifestApplyError,

    // Control Errors
    OperationCanceled,
    ConfigError,
}

impl ErrorKind {
    /// Returns `true` for failures of the manifest apply path.
    ///
    /// These failures leave the cluster partially mutated, and the host process is expected to
    /// terminate on them so that its supervisor restarts it.
    pub fn is_process_fatal(&self) -> bool {
        matches!(
            self,
            ErrorKind::ManifestFetchFailed
                | ErrorKind::ManifestDecodeError
                | ErrorKind::ManifestApplyError
        )
    }
}

impl ResolverError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
        }
    }

    /// Returns the dynamic detail of this error, if any.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            ErrorRepr::WithDescription(..) => None,
        }
    }

    /// Returns `true` if this error is process fatal, see [`ErrorKind::is_process_fatal`].
    pub fn is_process_fatal(&self) -> bool {
        self.kind().is_process_fatal()
    }
}

/// Errors compare equal when their kinds match, descriptions and details are ignored.
impl PartialEq for ResolverError {
    fn eq(&self, other: &ResolverError) -> bool {
        self.kind() == other.kind()
    }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.repr {
            ErrorRepr::WithDescription(kind, desc) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)
            }
            ErrorRepr::WithDescriptionAndDetail(kind, desc, ref detail) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;
                f.write_str(" -> ")?;
                detail.fmt(f)
            }
        }
    }
}

impl error::Error for ResolverError {}

impl From<(ErrorKind, &'static str)> for ResolverError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> ResolverError {
        ResolverError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

impl From<(ErrorKind, &'static str, String)> for ResolverError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> ResolverError {
        ResolverError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

/// Converts configuration validation failures into [`ErrorKind::ConfigError`].
impl From<http_resolver_config::shared::ValidationError> for ResolverError {
    fn from(err: http_resolver_config::shared::ValidationError) -> ResolverError {
        ResolverError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::ConfigError,
                "Invalid resolver configuration",
                err.to_string(),
            ),
        }
    }
}

/// Converts [`reqwest::Error`] raised while building the HTTP client into
/// [`ErrorKind::ConfigError`].
///
/// Errors of actual requests are classified by the caller, which knows which path failed.
impl From<reqwest::Error> for ResolverError {
    fn from(err: reqwest::Error) -> ResolverError {
        ResolverError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::ConfigError,
                "Failed to build HTTP client",
                err.to_string(),
            ),
        }
    }
}

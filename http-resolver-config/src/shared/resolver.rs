use serde::{Deserialize, Serialize};
use url::Url;

use crate::Config;
use crate::shared::{ApplyConfig, HttpConfig, ValidationError};

/// Complete configuration of the HTTP resolver.
///
/// The source list is ordered: manifests are applied and documents concatenated
/// in exactly this order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Remote endpoints serving both the manifest stream and the resolvable document.
    pub sources: Vec<String>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
}

impl Config for ResolverConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["sources"];
}

impl ResolverConfig {
    /// Validates the complete resolver configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.source_urls()?;
        self.http.validate()
    }

    /// Parses the configured sources, preserving their order.
    pub fn source_urls(&self) -> Result<Vec<Url>, ValidationError> {
        if self.sources.is_empty() {
            return Err(ValidationError::SourcesEmpty);
        }

        self.sources.iter().map(|source| parse_source(source)).collect()
    }
}

fn parse_source(source: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(source).map_err(|err| ValidationError::InvalidSourceUrl {
        url: source.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ValidationError::UnsupportedSourceScheme {
            url: source.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}

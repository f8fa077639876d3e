//! Contract between a resolver and the remote resolution controller hosting it.
//!
//! The host routes a resolution request to a resolver by matching the request's labels against
//! [`Resolver::selector`], checks the request with [`Resolver::validate_params`] and then calls
//! [`Resolver::resolve`]. The returned [`ResolvedResource`] is persisted by the host and handed
//! to pipeline execution.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::concurrency::cancel::CancelRx;
use crate::error::ResolverResult;

/// Label carrying the resolver type, matched by the host when dispatching requests.
pub const LABEL_KEY_RESOLVER_TYPE: &str = "resolution.tekton.dev/type";

/// One named parameter of a resolution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Value of a [`Param`], in one of the three shapes the host supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Array(Vec<String>),
    Object(BTreeMap<String, String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::Array(value)
    }
}

/// Where a resolved document came from, reported back to the host for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefSource {
    pub uri: String,
    pub digest: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
}

/// A resolved document as exposed to the host.
pub trait ResolvedResource {
    /// Raw bytes of the resolved document.
    fn data(&self) -> &[u8];

    /// Annotations stored next to the resolved document.
    fn annotations(&self) -> BTreeMap<String, String>;

    /// Source of the resolved document, if known.
    fn ref_source(&self) -> Option<&RefSource>;
}

/// A remote resolver plugged into the host.
pub trait Resolver {
    type Resource: ResolvedResource;

    /// Called once by the host before any resolution.
    fn initialize(&self) -> impl Future<Output = ResolverResult<()>> + Send;

    /// Display name of the resolver.
    fn name(&self) -> &'static str;

    /// Labels a resolution request must carry to be routed to this resolver.
    fn selector(&self) -> BTreeMap<String, String>;

    /// Checks the request parameters before [`Resolver::resolve`] is attempted.
    fn validate_params(&self, params: &[Param]) -> ResolverResult<()>;

    /// Resolves a request, aborting as soon as `cancel_rx` fires.
    fn resolve(
        &self,
        params: &[Param],
        cancel_rx: CancelRx,
    ) -> impl Future<Output = ResolverResult<Self::Resource>> + Send;
}

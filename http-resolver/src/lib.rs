//! Remote resolver serving pipeline documents from HTTP sources.
//!
//! For each configured source the resolver first creates the Kubernetes objects described by the
//! source's manifest stream, then downloads the source document and appends it to the resolved
//! artifact. The entry point is [`resolver::HttpResolver`], which implements the host contract
//! defined in [`framework`].

pub mod artifact;
pub mod concurrency;
pub mod error;
pub mod fetch;
pub mod framework;
pub mod k8s;
mod macros;
pub mod manifest;
pub mod resolver;

//! Kubernetes integration of the resolver.
//!
//! The resolver only ever creates objects, so the abstraction is a single operation on the
//! [`K8sClient`] trait. The default client, [`http::HttpK8sClient`], is backed by the [`kube`]
//! crate and uses the ambient configuration (in-cluster service account or local
//! `~/.kube/config`). Tests provide their own implementation of the trait.

mod base;
pub mod http;

pub use base::*;

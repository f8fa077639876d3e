//! Shared test infrastructure: a recording in-memory cluster client and a mock HTTP server
//! serving source documents.

#![allow(dead_code)]

pub mod k8s_client;
pub mod source;

//! Configuration management for the HTTP resolver.
//!
//! Provides environment detection, layered configuration loading from YAML
//! files and environment variables, and the shared configuration types used by
//! the resolver library and its controller binary.

mod environment;
mod load;
pub mod shared;

pub use environment::*;
pub use load::*;

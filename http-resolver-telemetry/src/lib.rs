//! Tracing setup shared by the resolver binaries and tests.

mod logging;

pub use logging::*;

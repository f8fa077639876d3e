//! Decoding of manifest streams and their application to the cluster.

mod apply;
mod decode;

pub use apply::*;
pub use decode::*;

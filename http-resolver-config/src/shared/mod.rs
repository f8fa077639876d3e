mod apply;
mod base;
mod http;
mod resolver;

pub use apply::*;
pub use base::*;
pub use http::*;
pub use resolver::*;

//! Transport layer for the file picker service.
//!
//! The only transport is HTTP (feature: `http`, on by default). Configuration
//! and error types are always compiled so the library can be configured
//! without pulling in the web stack.

mod config;
mod error;

#[cfg(feature = "http")]
pub mod http;

pub use config::{parse_origins, HttpConfig};
pub use error::{TransportError, TransportResult};

#[cfg(feature = "http")]
pub use http::{build_router, HttpTransport};

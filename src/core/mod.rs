//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the service,
//! including error handling, configuration, filename security, server state,
//! and the HTTP transport.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{resolve, FilesRoot, PathRejection, ResolvedPath, RootError};
pub use server::FilePickerServer;
pub use transport::{HttpConfig, TransportError};

//! File Picker Library
//!
//! This crate provides a small HTTP service that lists and serves the files
//! of one configured directory, refusing any filename that would reach
//! outside it.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, filename security, server state
//!   and the HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **files**: directory listing and the service that owns the root
//!
//! # Example
//!
//! ```rust,no_run
//! use file_picker::core::security::{resolve, FilesRoot};
//! use file_picker::domains::files::lister;
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = FilesRoot::open("./files")?;
//!     for entry in lister::list(&root)? {
//!         println!("{} ({} bytes)", entry.name, entry.size);
//!     }
//!     let path = resolve(&root, "report.pdf")?;
//!     println!("{}", path.as_path().display());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, FilePickerServer, Result};

//! Files domain - listing and resolving entries of the files root.
//!
//! This module provides:
//! - **Lister**: single-level, name-sorted listing of the root
//! - **Service**: the startup-built object that owns the root
//!
//! Filename validation itself lives in `core::security`.

pub mod lister;
pub mod service;

pub use lister::FileEntry;
pub use service::FileService;

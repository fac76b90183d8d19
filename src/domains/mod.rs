//! Domains module containing business logic organized by bounded contexts.
//!
//! The service currently has a single domain, `files`, which lists the
//! configured directory and resolves requested filenames inside it.

pub mod files;

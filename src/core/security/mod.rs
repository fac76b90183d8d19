// Security module for filename resolution and root containment
//
// This module decides whether an untrusted filename refers to a regular file
// inside the configured files directory. Nothing outside that directory is
// ever returned, symlinks included.

pub mod path_resolver;
pub mod root;

pub use path_resolver::{is_within_root, resolve, validate_name, PathRejection, ResolvedPath};
pub use root::{FilesRoot, RootError};

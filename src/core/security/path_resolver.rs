use std::fs;
use std::path::{Path, PathBuf};

use super::root::{FilesRoot, RootError};

/// Reasons a requested filename is refused.
#[derive(Debug, thiserror::Error)]
pub enum PathRejection {
    /// Empty, or contains a separator, `..`, or a NUL byte.
    #[error("Invalid filename: {name:?}")]
    InvalidName { name: String },

    /// The name passed the textual check but its canonical form escapes the root.
    #[error("Filename {name:?} resolves outside the files directory")]
    SecurityViolation { name: String },

    /// Inside the root, but not an existing regular file.
    #[error("File not found: {name:?}")]
    NotFound { name: String },

    /// The root itself is gone or unusable.
    #[error(transparent)]
    Configuration(#[from] RootError),
}

/// A canonical path to a regular file inside the root, valid at the time it
/// was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Resolves an untrusted filename to a file directly inside `root`.
///
/// The name is checked textually first and rejected without any filesystem
/// access if it is empty or contains `/`, `\`, `..` or NUL. Otherwise it is
/// joined onto the root, both paths are canonicalized (following symlinks),
/// and the candidate is accepted only if the canonical root is one of its
/// ancestors by path component. Accepted candidates must be regular files.
///
/// # Examples
///
/// ```rust,no_run
/// use file_picker::core::security::{resolve, FilesRoot};
///
/// let root = FilesRoot::open("./files")?;
/// let path = resolve(&root, "report.pdf")?;
/// println!("{}", path.as_path().display());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn resolve(root: &FilesRoot, name: &str) -> Result<ResolvedPath, PathRejection> {
    validate_name(name)?;

    let canonical_root = root.canonical()?;
    let candidate = root.path().join(name);

    // A dangling symlink fails here as well, which is reported as not found
    let canonical = candidate
        .canonicalize()
        .map_err(|_| PathRejection::NotFound {
            name: name.to_string(),
        })?;

    if !is_within_root(&canonical, &canonical_root) {
        return Err(PathRejection::SecurityViolation {
            name: name.to_string(),
        });
    }

    let is_regular_file = fs::metadata(&canonical)
        .map(|metadata| metadata.is_file())
        .unwrap_or(false);

    if !is_regular_file {
        return Err(PathRejection::NotFound {
            name: name.to_string(),
        });
    }

    Ok(ResolvedPath(canonical))
}

/// Textual filename check. Never touches the filesystem.
///
/// Both separators are refused on every platform so that a name accepted on
/// one host is accepted everywhere.
pub fn validate_name(name: &str) -> Result<(), PathRejection> {
    let forbidden = name.is_empty()
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");

    if forbidden {
        return Err(PathRejection::InvalidName {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Checks if a path is within (or equal to) a root directory.
///
/// Comparison is per path component, so `/data/foobar` is not inside
/// `/data/foo`.
pub fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

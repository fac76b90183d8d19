use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised when the configured files directory itself is unusable.
#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error("Files directory not found: '{path}'")]
    Missing { path: PathBuf },

    #[error("Files path is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    #[error("Cannot read files directory '{path}': {error}")]
    Unreadable { path: PathBuf, error: io::Error },

    #[error("Cannot create files directory '{path}': {error}")]
    CreateFailed { path: PathBuf, error: io::Error },
}

/// The single directory this service is scoped to.
///
/// A `FilesRoot` is built once at startup and passed explicitly to the
/// resolver and the lister. It stores an absolute path; the canonical form is
/// recomputed on every call so that a directory removed after startup is
/// reported instead of silently served from a stale value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesRoot {
    path: PathBuf,
}

impl FilesRoot {
    /// Build a root from a possibly relative path without touching the
    /// filesystem beyond reading the current directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, RootError> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).map_err(|error| RootError::Unreadable {
            path: path.to_path_buf(),
            error,
        })?;

        Ok(Self { path: absolute })
    }

    /// Build a root and verify it is an existing directory.
    ///
    /// The stored path is the canonical form, so log lines and joins use the
    /// same spelling the containment check compares against.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RootError> {
        let root = Self::new(path)?;
        let canonical = root.canonical()?;
        Ok(Self { path: canonical })
    }

    /// Create the directory (and parents) when it does not exist yet.
    pub fn create_if_missing(path: impl AsRef<Path>) -> Result<(), RootError> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(());
        }

        fs::create_dir_all(path).map_err(|error| RootError::CreateFailed {
            path: path.to_path_buf(),
            error,
        })
    }

    /// The absolute path this root was configured with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the root to its canonical form and check it is a directory.
    pub fn canonical(&self) -> Result<PathBuf, RootError> {
        let canonical = self.path.canonicalize().map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                RootError::Missing {
                    path: self.path.clone(),
                }
            } else {
                RootError::Unreadable {
                    path: self.path.clone(),
                    error,
                }
            }
        })?;

        let metadata = fs::metadata(&canonical).map_err(|error| RootError::Unreadable {
            path: canonical.clone(),
            error,
        })?;

        if !metadata.is_dir() {
            return Err(RootError::NotADirectory { path: canonical });
        }

        Ok(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_makes_relative_path_absolute() {
        let root = FilesRoot::new("files").unwrap();
        assert!(root.path().is_absolute());
        assert!(root.path().ends_with("files"));
    }

    #[test]
    fn test_open_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = FilesRoot::open(temp_dir.path()).unwrap();
        assert_eq!(root.path(), temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_open_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = FilesRoot::open(temp_dir.path().join("missing"));
        assert!(matches!(result, Err(RootError::Missing { .. })));
    }

    #[test]
    fn test_open_rejects_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "not a dir").unwrap();

        let result = FilesRoot::open(&file);
        assert!(matches!(result, Err(RootError::NotADirectory { .. })));
    }

    #[test]
    fn test_canonical_reports_directory_removed_after_startup() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("served");
        fs::create_dir(&dir).unwrap();

        let root = FilesRoot::open(&dir).unwrap();
        fs::remove_dir(&dir).unwrap();

        assert!(matches!(root.canonical(), Err(RootError::Missing { .. })));
    }

    #[test]
    fn test_create_if_missing_builds_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        FilesRoot::create_if_missing(&nested).unwrap();
        assert!(nested.is_dir());

        // Second call is a no-op
        FilesRoot::create_if_missing(&nested).unwrap();
    }
}

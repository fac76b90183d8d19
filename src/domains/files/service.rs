//! File service implementation.
//!
//! The FileService owns the files root for the lifetime of the process and
//! exposes the two operations the transport layer needs: listing the root
//! and resolving a requested filename.
//!
//! It holds no index or cache; every call goes back to the filesystem.

use tracing::info;

use super::lister::{self, FileEntry};
use crate::core::config::FilesConfig;
use crate::core::security::{self, FilesRoot, PathRejection, ResolvedPath, RootError};

/// Service for listing and resolving files under a single root.
#[derive(Debug, Clone)]
pub struct FileService {
    root: FilesRoot,
}

impl FileService {
    /// Create a service over an already opened root.
    pub fn new(root: FilesRoot) -> Self {
        Self { root }
    }

    /// Open the configured files directory, creating it first if allowed.
    ///
    /// Any failure here is a startup-fatal configuration error.
    pub fn from_config(config: &FilesConfig) -> Result<Self, RootError> {
        if config.create_if_missing {
            FilesRoot::create_if_missing(&config.directory)?;
        }

        let root = FilesRoot::open(&config.directory)?;
        info!("Files root: {}", root.path().display());

        Ok(Self::new(root))
    }

    /// The root this service is scoped to.
    pub fn root(&self) -> &FilesRoot {
        &self.root
    }

    /// List the direct children of the root, sorted by name.
    pub fn list(&self) -> Result<Vec<FileEntry>, RootError> {
        lister::list(&self.root)
    }

    /// Resolve an untrusted filename to a regular file inside the root.
    pub fn resolve(&self, name: &str) -> Result<ResolvedPath, PathRejection> {
        security::resolve(&self.root, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_config_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let directory = temp_dir.path().join("files");

        let config = FilesConfig {
            directory: directory.clone(),
            create_if_missing: true,
        };
        let service = FileService::from_config(&config).unwrap();

        assert!(directory.is_dir());
        assert_eq!(service.root().path(), directory.canonicalize().unwrap());
    }

    #[test]
    fn test_from_config_without_create_fails_on_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = FilesConfig {
            directory: temp_dir.path().join("files"),
            create_if_missing: false,
        };

        assert!(matches!(
            FileService::from_config(&config),
            Err(RootError::Missing { .. })
        ));
    }

    #[test]
    fn test_from_config_rejects_file_as_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("files");
        fs::write(&file, "oops").unwrap();

        let config = FilesConfig {
            directory: file,
            create_if_missing: true,
        };

        assert!(matches!(
            FileService::from_config(&config),
            Err(RootError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_list_then_resolve() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.md"), "# notes").unwrap();
        let service = FileService::new(FilesRoot::open(temp_dir.path()).unwrap());

        let entries = service.list().unwrap();
        assert_eq!(entries.len(), 1);

        let resolved = service.resolve(&entries[0].name).unwrap();
        assert_eq!(fs::read_to_string(resolved).unwrap(), "# notes");
    }
}

//! Server state shared by every request handler.
//!
//! `FilePickerServer` is cheap to clone. It carries the configuration and the
//! file service, and moves blocking filesystem work off the async workers.

use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::{Error, Result};
use super::security::ResolvedPath;
use crate::domains::files::{FileEntry, FileService};

/// The file picker server handler.
#[derive(Debug, Clone)]
pub struct FilePickerServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Service for listing and resolving files.
    files: Arc<FileService>,
}

impl FilePickerServer {
    /// Create a new server, opening the configured files directory.
    ///
    /// Fails if the directory is missing (and may not be created) or is not a
    /// directory; callers treat that as fatal.
    pub fn new(config: Config) -> Result<Self> {
        let files = FileService::from_config(&config.files)?;
        info!("Server initialized");
        Ok(Self::with_service(config, files))
    }

    /// Create a server around an existing file service.
    pub fn with_service(config: Config, files: FileService) -> Self {
        Self {
            config: Arc::new(config),
            files: Arc::new(files),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the file service.
    pub fn files(&self) -> &FileService {
        &self.files
    }

    /// List the files root on the blocking pool.
    #[instrument(skip(self))]
    pub async fn list_files(&self) -> Result<Vec<FileEntry>> {
        let files = Arc::clone(&self.files);
        let entries = tokio::task::spawn_blocking(move || files.list())
            .await
            .map_err(|e| Error::internal(e.to_string()))??;
        Ok(entries)
    }

    /// Resolve a requested filename on the blocking pool.
    #[instrument(skip(self))]
    pub async fn resolve_file(&self, name: &str) -> Result<ResolvedPath> {
        let files = Arc::clone(&self.files);
        let name = name.to_string();
        let resolved = tokio::task::spawn_blocking(move || files.resolve(&name))
            .await
            .map_err(|e| Error::internal(e.to_string()))??;
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FilesConfig;
    use crate::core::security::PathRejection;
    use std::fs;
    use tempfile::TempDir;

    fn server_for(dir: &TempDir) -> FilePickerServer {
        let mut config = Config::default();
        config.files = FilesConfig {
            directory: dir.path().to_path_buf(),
            create_if_missing: false,
        };
        FilePickerServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_list_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "abc").unwrap();
        let server = server_for(&temp_dir);

        let entries = server.list_files().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].size, 3);
    }

    #[tokio::test]
    async fn test_resolve_file_rejections_keep_reason() {
        let temp_dir = TempDir::new().unwrap();
        let server = server_for(&temp_dir);

        assert!(matches!(
            server.resolve_file("../secret").await,
            Err(Error::Rejected(PathRejection::InvalidName { .. }))
        ));
        assert!(matches!(
            server.resolve_file("missing.txt").await,
            Err(Error::Rejected(PathRejection::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_list_after_root_removed_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let served = temp_dir.path().join("served");
        fs::create_dir(&served).unwrap();

        let mut config = Config::default();
        config.files.directory = served.clone();
        let server = FilePickerServer::new(config).unwrap();
        fs::remove_dir(&served).unwrap();

        let err = server.list_files().await.unwrap_err();
        assert!(err.root_error().is_some());
    }

    #[test]
    fn test_new_fails_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.files = FilesConfig {
            directory: temp_dir.path().join("absent"),
            create_if_missing: false,
        };

        assert!(matches!(FilePickerServer::new(config), Err(Error::Root(_))));
    }
}

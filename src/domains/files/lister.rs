//! Single-level directory listing of the files root.

use serde::{Deserialize, Serialize};
use std::fs::{self, DirEntry};
use tracing::debug;

use crate::core::security::{FilesRoot, RootError};

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Base name of the entry, never a path.
    pub name: String,

    /// Byte length for regular files, `0` for directories.
    pub size: u64,

    /// `true` for regular files, `false` for directories.
    pub is_file: bool,
}

/// Lists the direct children of `root`, sorted by name.
///
/// Ordering is byte-wise on the name, so it is case-sensitive and does not
/// depend on the platform's enumeration order. Symlinks are followed when
/// reading metadata. Entries that cannot be read, and entries that are
/// neither regular files nor directories (sockets, devices, FIFOs, dangling
/// links), are skipped rather than failing the whole listing.
pub fn list(root: &FilesRoot) -> Result<Vec<FileEntry>, RootError> {
    let dir = root.canonical()?;

    let entries = fs::read_dir(&dir).map_err(|error| RootError::Unreadable {
        path: dir.clone(),
        error,
    })?;

    let mut files: Vec<FileEntry> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => describe(&entry),
            Err(e) => {
                debug!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .collect();

    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(files)
}

fn describe(entry: &DirEntry) -> Option<FileEntry> {
    let name = entry.file_name().to_string_lossy().into_owned();

    let metadata = match fs::metadata(entry.path()) {
        Ok(m) => m,
        Err(e) => {
            debug!("Skipping {}: {}", name, e);
            return None;
        }
    };

    if metadata.is_file() {
        Some(FileEntry {
            name,
            size: metadata.len(),
            is_file: true,
        })
    } else if metadata.is_dir() {
        Some(FileEntry {
            name,
            size: 0,
            is_file: false,
        })
    } else {
        debug!("Skipping special file: {}", name);
        None
    }
}

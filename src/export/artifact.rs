use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::core::{LedgerError, Result};

/// A written export file in temporary storage.
///
/// The file lives as long as this value: dropping it deletes the file on
/// every exit path, including unwinding. Use `keep` to hand the file over
/// for good, or `delete_after` for a timed best-effort removal.
#[derive(Debug)]
pub struct ExportArtifact {
    id: Uuid,
    file: NamedTempFile,
    rows: usize,
}

impl ExportArtifact {
    pub(crate) fn new(id: Uuid, file: NamedTempFile, rows: usize) -> Self {
        Self { id, file, rows }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Stop tracking the file and return where it lives; the caller now owns cleanup.
    pub fn keep(self) -> Result<PathBuf> {
        let (_, path) = self
            .file
            .keep()
            .map_err(|e| LedgerError::Io(e.error))?;
        info!("Export artifact {} kept at {}", self.id, path.display());
        Ok(path)
    }

    /// Remove the file after `after` on a detached background thread.
    ///
    /// Best effort only: if the process exits first the file stays behind.
    pub fn delete_after(self, after: Duration) -> Result<JoinHandle<()>> {
        let id = self.id;
        let path = self.keep()?;

        let handle = thread::Builder::new()
            .name(format!("export-cleanup-{}", id))
            .spawn(move || {
                thread::sleep(after);
                match fs::remove_file(&path) {
                    Ok(()) => info!("Export artifact {} removed after {:?}", id, after),
                    Err(e) => warn!("Failed to remove export artifact {}: {}", path.display(), e),
                }
            })?;

        Ok(handle)
    }
}

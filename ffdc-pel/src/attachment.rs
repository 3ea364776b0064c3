//! Temporary files holding entry attachments.
//!
//! Logging services take FFDC as files. Each attachment is written to its
//! own temporary file which is deleted when the list is dropped, unless it
//! is persisted first.

use errl_ir::{DiagnosticHandle, Severity};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// SLID used for entries that did not come from an SLID group.
pub const DEFAULT_SLID: u16 = 0;

#[derive(Debug)]
pub struct FfdcFile {
    pub log_id: u16,
    pub severity: Severity,
    file: NamedTempFile,
}

impl FfdcFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Move the file to `path` and stop tracking it.
    pub fn persist(self, path: &Path) -> io::Result<()> {
        self.file.persist(path)?;
        Ok(())
    }
}

/// Attachment files of a handle, in entry order.
#[derive(Debug, Default)]
pub struct FfdcFileList {
    files: Vec<FfdcFile>,
}

impl FfdcFileList {
    /// Write every attachment of `handle` to a temporary file in `dir`.
    pub fn create_in(handle: &DiagnosticHandle, dir: &Path) -> io::Result<Self> {
        let mut files = Vec::new();
        for entry in handle {
            let Some(data) = entry.attachment() else {
                continue;
            };
            let log_id = entry.log_id().unwrap_or(DEFAULT_SLID);
            let mut file = tempfile::Builder::new()
                .prefix(&format!("ffdc-{log_id:04x}-"))
                .suffix(".bin")
                .tempfile_in(dir)?;
            file.write_all(data)?;
            file.flush()?;
            log::debug!("SLID {log_id}: {} bytes of FFDC in {}", data.len(), file.path().display());
            files.push(FfdcFile {
                log_id,
                severity: entry.severity(),
                file,
            });
        }
        Ok(Self { files })
    }

    /// Same as [`FfdcFileList::create_in`] using the system temporary directory.
    pub fn create(handle: &DiagnosticHandle) -> io::Result<Self> {
        Self::create_in(handle, &std::env::temp_dir())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FfdcFile> {
        self.files.iter()
    }

    /// Persist every file into `dir` as `<stem>-slid-<id>.bin`.
    pub fn persist_all(self, dir: &Path, stem: &str) -> io::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());
        for file in self.files {
            let target = dir.join(format!("{stem}-slid-{:04x}.bin", file.log_id));
            file.persist(&target)?;
            written.push(target);
        }
        Ok(written)
    }
}

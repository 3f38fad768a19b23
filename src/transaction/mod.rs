//! Transactional execution support
//!
//! Each mutating install step is recorded here before the next one runs.
//! On failure the log unwinds last-applied-first, removing files and
//! directories the run created (never pre-existing ones), restoring
//! overwritten content and prior permission bits. A transaction that is
//! dropped without [`Transaction::commit`] rolls back automatically.
//!
//! The log is function-local to one `install` call; nothing here is
//! shared process-wide.

use std::fs;
use std::path::PathBuf;

/// One applied, undoable file-system mutation
#[derive(Debug)]
pub enum Applied {
    DirCreated(PathBuf),
    FileCreated(PathBuf),
    FileOverwritten {
        path: PathBuf,
        /// Content before the overwrite, restored on rollback
        original: Vec<u8>,
        /// Backup file written by this run; removed on rollback so the
        /// post-rollback snapshot equals the pre-run one
        backup: Option<PathBuf>,
    },
    PermissionsChanged {
        path: PathBuf,
        prior_mode: u32,
    },
}

/// Ordered undo log for one installation run
#[derive(Debug, Default)]
pub struct Transaction {
    applied: Vec<Applied>,
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, applied: Applied) {
        self.applied.push(applied);
    }

    pub fn track_dir_created(&mut self, path: impl Into<PathBuf>) {
        self.track(Applied::DirCreated(path.into()));
    }

    pub fn track_file_created(&mut self, path: impl Into<PathBuf>) {
        self.track(Applied::FileCreated(path.into()));
    }

    /// Keep everything applied; disables rollback
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo all applied records, last first
    pub fn rollback(&mut self) {
        if self.committed {
            return;
        }

        while let Some(applied) = self.applied.pop() {
            match applied {
                Applied::FileCreated(path) => {
                    let _ = fs::remove_file(&path);
                }
                Applied::FileOverwritten {
                    path,
                    original,
                    backup,
                } => {
                    if let Err(e) = fs::write(&path, &original) {
                        eprintln!("Warning: failed to restore {}: {}", path.display(), e);
                    }
                    if let Some(backup_path) = backup {
                        let _ = fs::remove_file(&backup_path);
                    }
                }
                Applied::DirCreated(path) => {
                    // Only remove when empty; the directory may hold files
                    // this run did not create.
                    let is_empty = fs::read_dir(&path)
                        .map(|mut entries| entries.next().is_none())
                        .unwrap_or(false);
                    if is_empty {
                        let _ = fs::remove_dir(&path);
                    }
                }
                Applied::PermissionsChanged { path, prior_mode } => {
                    restore_mode(&path, prior_mode);
                }
            }
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

#[cfg(unix)]
fn restore_mode(path: &std::path::Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(mode));
}

#[cfg(not(unix))]
fn restore_mode(_path: &std::path::Path, _mode: u32) {}

//! Single instance enforcement
//!
//! Ensures only one instance of the application runs at a time using an
//! exclusive advisory lock on `$XDG_RUNTIME_DIR/kbd-lightning.lock`. The lock is
//! released by the kernel when the process exits, even after a crash.

use crate::error::{LightningError, Result};
use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Single instance guard holding the lock file (released on drop)
#[derive(Debug)]
pub struct SingleInstanceGuard {
    file: File,
    path: PathBuf,
}

impl SingleInstanceGuard {
    /// Default lock file location
    pub fn default_lock_path() -> PathBuf {
        std::env::var_os("XDG_RUNTIME_DIR")
            .filter(|v| !v.is_empty())
            .map_or_else(std::env::temp_dir, PathBuf::from)
            .join("kbd-lightning.lock")
    }

    /// Create a new single instance guard, returning an error if another instance is running
    pub fn new() -> Result<Self> {
        Self::acquire(&Self::default_lock_path())
    }

    /// Take the lock at `path`
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        match file.try_lock() {
            Ok(()) => {
                debug!("Single instance lock acquired at {}", path.display());
                Ok(Self {
                    file,
                    path: path.to_path_buf(),
                })
            }
            Err(TryLockError::WouldBlock) => {
                error!("Another instance of kbd-lightning is already running");
                Err(LightningError::AlreadyRunning)
            }
            Err(TryLockError::Error(e)) => Err(LightningError::IoError(e)),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        debug!("Single instance lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;

    #[test]
    fn test_single_instance_guard() {
        let temp_dir = create_test_dir();
        let lock_path = temp_dir.path().join("kbd-lightning.lock");

        // First instance should succeed
        let guard1 = SingleInstanceGuard::acquire(&lock_path);
        assert!(guard1.is_ok(), "First instance should succeed");

        // Second instance should fail
        let guard2 = SingleInstanceGuard::acquire(&lock_path);
        assert!(matches!(guard2, Err(LightningError::AlreadyRunning)));

        drop(guard1);

        // Now a new instance should succeed
        let guard3 = SingleInstanceGuard::acquire(&lock_path);
        assert!(guard3.is_ok(), "Instance after drop should succeed");
    }

    #[test]
    fn test_default_lock_path_name() {
        assert!(SingleInstanceGuard::default_lock_path().ends_with("kbd-lightning.lock"));
    }
}

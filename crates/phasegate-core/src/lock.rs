use crate::error::{PhasegateError, Result};
use crate::paths;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A lock older than this is treated as abandoned and reclaimed.
pub const STALE_AFTER_SECS: i64 = 300;

/// Exclusive advisory lock around state mutations.
///
/// The lock is a file at `.sdlc/state.lock` containing the holder's PID and
/// a unix timestamp, created with `create_new` so acquisition is atomic.
/// Released on drop, so every exit path (including panics) gives it up. A
/// crashed holder leaves the file behind; once it exceeds
/// [`STALE_AFTER_SECS`] the next acquirer reclaims it and logs a warning.
#[derive(Debug)]
pub struct StateLock {
    path: PathBuf,
}

impl StateLock {
    pub fn acquire(root: &Path) -> Result<Self> {
        let path = paths::lock_path(root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        match Self::try_create(&path) {
            Ok(lock) => Ok(lock),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Self::contend(&path)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The lock file exists. Reclaim it if stale or unreadable, otherwise
    /// report who holds it.
    fn contend(path: &Path) -> Result<Self> {
        let now = chrono::Utc::now().timestamp();
        match Self::read_holder(path) {
            Some((pid, ts)) if now - ts <= STALE_AFTER_SECS => {
                Err(PhasegateError::LockHeld {
                    pid,
                    path: path.display().to_string(),
                })
            }
            Some((pid, ts)) => {
                tracing::warn!(
                    "reclaiming stale lock {} held by pid {pid} for {}s",
                    path.display(),
                    now - ts
                );
                std::fs::remove_file(path)?;
                Self::try_create(path).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::AlreadyExists {
                        // Another process won the reclaim race.
                        PhasegateError::LockHeld {
                            pid: Self::read_holder(path).map(|(p, _)| p).unwrap_or(0),
                            path: path.display().to_string(),
                        }
                    } else {
                        e.into()
                    }
                })
            }
            None => {
                tracing::warn!("reclaiming unreadable lock {}", path.display());
                std::fs::remove_file(path)?;
                Self::try_create(path).map_err(PhasegateError::from)
            }
        }
    }

    fn try_create(path: &Path) -> std::io::Result<Self> {
        let mut f = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        let pid = std::process::id();
        let ts = chrono::Utc::now().timestamp();
        write!(f, "{pid}\n{ts}\n")?;
        Ok(StateLock {
            path: path.to_path_buf(),
        })
    }

    fn read_holder(path: &Path) -> Option<(u32, i64)> {
        let content = std::fs::read_to_string(path).ok()?;
        let mut lines = content.lines();
        let pid = lines.next()?.trim().parse().ok()?;
        let ts = lines.next()?.trim().parse().ok()?;
        Some((pid, ts))
    }

    /// Release explicitly; drop does the same. A lock file that already
    /// vanished (e.g. a stale reclaim by another process) is not an error.
    pub fn release(self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        std::mem::forget(self);
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

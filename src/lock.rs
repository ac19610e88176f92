//! Process lock so two daemons never drive the same devices

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use directories::ProjectDirs;

/// Holds the lock file open. Released and removed on drop.
pub struct Lock {
    _file: File,
    path: PathBuf,
}

impl Lock {
    /// Take the exclusive daemon lock, failing if another instance holds it
    pub fn acquire() -> io::Result<Self> {
        let path = Self::path().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine lock file path",
            )
        })?;
        Self::acquire_at(path)
    }

    fn acquire_at(path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock().is_err() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "another instance of rgb-sync is already running",
            ));
        }

        // pid, for whoever finds a stale lock
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;

        Ok(Self { _file: file, path })
    }

    fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rgb-sync").map(|dirs| dirs.config_dir().join("rgb-sync.lock"))
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

//! Atomic TOML file operations.
//!
//! A thin layer for safe concurrent access to TOML files:
//!
//! - **Atomicity**: writes go to a tmp file followed by an atomic rename
//! - **Isolation**: transactional updates take an exclusive file lock
//! - **Durability**: explicit fsync before the rename

use cinetrack_core::error::{CinetrackError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to one TOML file holding a value of type `T`.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file. A missing or empty file yields
    /// `None`.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes `data` and writes it atomically: tmp file in the same
    /// directory, fsync, rename.
    pub fn save(&self, data: &T) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| CinetrackError::io("storage path has no parent directory"))?;
        fs::create_dir_all(parent)?;

        let encoded = toml::to_string_pretty(data)?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| CinetrackError::io("storage path has no file name"))?;
        let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(encoded.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Transactional read-modify-write under an exclusive file lock.
    ///
    /// The closure receives the current value (or `default` when the file
    /// does not exist yet); on `Ok` the result is written back atomically.
    pub fn update<F>(&self, default: T, f: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;
        let mut data = self.load()?.unwrap_or(default);
        f(&mut data)?;
        self.save(&data)
    }
}

/// Exclusive advisory lock on a sibling `.lock` file, released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| CinetrackError::io(format!("failed to acquire file lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The fs2 lock is released with the file handle; removing the lock
        // file is best effort.
        let _ = fs::remove_file(&self.lock_path);
    }
}

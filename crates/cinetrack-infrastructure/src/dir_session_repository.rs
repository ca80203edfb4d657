//! Directory-backed session repository.
//!
//! One TOML file per user under the sessions directory:
//!
//! ```text
//! base_dir/
//! ├── 184675234.toml
//! └── 993412811.toml
//! ```
//!
//! Any storage failure surfaces as `StoreUnavailable` so the dialog engine
//! refuses the event with zero side effects instead of mutating state it
//! cannot persist.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use cinetrack_core::error::{CinetrackError, Result};
use cinetrack_core::session::{Session, SessionRepository};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct DirSessionRepository {
    base_dir: PathBuf,
}

impl DirSessionRepository {
    /// Creates a repository rooted at `base_dir`, creating the directory if
    /// needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .map_err(|e| CinetrackError::store_unavailable(e.to_string()))?;
        Ok(Self { base_dir })
    }

    /// Creates a repository at the default platform location.
    pub fn default_location() -> Result<Self> {
        Self::new(crate::paths::CinetrackPaths::sessions_dir()?)
    }

    fn file_for(&self, user_id: i64) -> AtomicTomlFile<Session> {
        AtomicTomlFile::new(self.base_dir.join(format!("{}.toml", user_id)))
    }
}

#[async_trait]
impl SessionRepository for DirSessionRepository {
    async fn load(&self, user_id: i64) -> Result<Option<Session>> {
        self.file_for(user_id)
            .load()
            .map_err(|e| CinetrackError::store_unavailable(e.to_string()))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        self.file_for(session.user_id)
            .save(session)
            .map_err(|e| CinetrackError::store_unavailable(e.to_string()))?;
        debug!(user_id = session.user_id, "session persisted");
        Ok(())
    }

    async fn clear(&self, user_id: i64) -> Result<()> {
        let path = self.base_dir.join(format!("{}.toml", user_id));
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CinetrackError::store_unavailable(e.to_string())),
        }
    }
}

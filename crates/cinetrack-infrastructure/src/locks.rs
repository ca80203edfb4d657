//! In-process per-user session locks.
//!
//! Serializes event handling per user within a single process. A
//! multi-process deployment substitutes a distributed lease implementation
//! behind the same trait; the engine does not change.

use async_trait::async_trait;
use cinetrack_core::error::Result;
use cinetrack_core::session::{SessionLease, SessionLockProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct InProcessSessionLocks {
    locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl InProcessSessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, user_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(user_id).or_default().clone()
    }
}

#[async_trait]
impl SessionLockProvider for InProcessSessionLocks {
    async fn acquire(&self, user_id: i64) -> Result<SessionLease> {
        // The owned guard keeps the mutex held for the lease's lifetime.
        let guard = self.lock_for(user_id).lock_owned().await;
        Ok(SessionLease::new(guard))
    }
}

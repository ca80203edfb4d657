//! Session persistence and mutual-exclusion traits.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for durable per-user session state.
///
/// This trait decouples the dialog engine from the specific storage
/// mechanism (files, key-value store, remote API).
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Atomic overwrites keyed by user id
/// - Serializing only primitive values (strings, numbers, booleans,
///   lists/maps thereof)
/// - Reporting an unreachable backing store as
///   [`CinetrackError::StoreUnavailable`](crate::CinetrackError::StoreUnavailable),
///   never as a silently-empty session
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds the session for `user_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: Session found
    /// - `Ok(None)`: No session stored yet; the engine initializes one
    /// - `Err(StoreUnavailable)`: Backing store unreachable
    async fn load(&self, user_id: i64) -> Result<Option<Session>>;

    /// Atomically overwrites the stored representation for the session's
    /// user id.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes all state for `user_id` (forced logout / testing).
    async fn clear(&self, user_id: i64) -> Result<()>;
}

/// An acquired per-user lease. Dropping the lease releases it.
pub struct SessionLease {
    _token: Box<dyn Send>,
}

impl SessionLease {
    /// Wraps an implementation-specific guard object.
    pub fn new(token: impl Send + 'static) -> Self {
        Self {
            _token: Box::new(token),
        }
    }
}

/// Mutual exclusion over a single user's session.
///
/// Events for one user must be processed strictly one at a time; the
/// engine holds the lease from before `load` until after `save`. The
/// mechanism is a trait because an in-process lock is only sufficient for
/// a single worker; a horizontally-scaled deployment substitutes a lease
/// held in the external store.
#[async_trait]
pub trait SessionLockProvider: Send + Sync {
    /// Acquires the lease for `user_id`, waiting if another event for the
    /// same user is in flight.
    async fn acquire(&self, user_id: i64) -> Result<SessionLease>;
}

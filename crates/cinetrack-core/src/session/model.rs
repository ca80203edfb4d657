//! Session domain model.

use super::frame::Frame;
use super::stack::NavigationStack;
use crate::locale::Language;
use serde::{Deserialize, Serialize};

/// Durable per-user conversational state.
///
/// One session exists per (user, logical conversation). It is created on
/// the first inbound event from a new user, mutated on every transition,
/// and never hard-deleted: a "restart" transition replaces the stack
/// wholesale instead. The session repository owns the stored
/// representation; the dialog engine borrows a session for the duration of
/// one event and must persist it (or explicitly discard it) before
/// returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Stable external user identity (e.g. the chat transport's user id).
    pub user_id: i64,
    /// Locale the user picked; starts at the configured default.
    pub locale: Language,
    /// Active dialog contexts, bottom = oldest.
    pub stack: NavigationStack,
    /// Timestamp when the session was created (ISO 8601 format).
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format).
    pub updated_at: String,
}

impl Session {
    /// Creates a fresh session with a single root frame at the initial
    /// state.
    pub fn new(user_id: i64, locale: Language) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            user_id,
            locale,
            stack: NavigationStack::new(Frame::initial()),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Marks the session as updated now.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

//! Persistent catalog store contract.
//!
//! The catalog is the relational user–movie association the assistant
//! tracks: which movies a user saved, whether each was watched, and any
//! personal rating/review. The store itself is an external collaborator;
//! only its contract lives here.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A movie saved to a user's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMovie {
    /// External metadata-provider id.
    pub movie_id: u64,
    /// When the user added it (ISO 8601 format).
    pub added_at: String,
}

/// Per-(user, movie) bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieUserMeta {
    pub watched: bool,
    pub rating: Option<u8>,
    pub review: Option<String>,
    pub added_at: String,
}

/// The persistent user–movie association store.
///
/// All operations may block and may fail; failures surface as store
/// errors, never as silently-missing data.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Registers a user. Idempotent: an existing user is left untouched.
    async fn add_user(&self, user_id: i64) -> Result<()>;

    /// Returns the user's saved movies in insertion order.
    async fn list_user_movies(&self, user_id: i64) -> Result<Vec<SavedMovie>>;

    /// Adds a movie to the user's list, recording the added-at timestamp.
    async fn add_movie_to_user(&self, user_id: i64, movie_id: u64) -> Result<()>;

    /// Removes a movie from the user's list along with its meta.
    async fn remove_movie_from_user(&self, user_id: i64, movie_id: u64) -> Result<()>;

    /// Returns the watched/rating/review bookkeeping for one saved movie.
    async fn movie_meta(&self, user_id: i64, movie_id: u64) -> Result<MovieUserMeta>;

    /// Sets the watched flag.
    async fn set_watched(&self, user_id: i64, movie_id: u64, watched: bool) -> Result<()>;

    /// Stores the personal rating and review text.
    async fn set_review(
        &self,
        user_id: i64,
        movie_id: u64,
        rating: u8,
        review: String,
    ) -> Result<()>;

    /// Clears any stored rating and review for the pair.
    ///
    /// Invoked when a movie is toggled back to unwatched; the data loss is
    /// deliberate and documented, not incidental.
    async fn clear_review(&self, user_id: i64, movie_id: u64) -> Result<()>;
}

//! In-memory repository implementations.
//!
//! Used for tests and for ephemeral deployments where durability across
//! restarts is not required.

use async_trait::async_trait;
use cinetrack_core::catalog::{CatalogStore, MovieUserMeta, SavedMovie};
use cinetrack_core::error::{CinetrackError, Result};
use cinetrack_core::session::{Session, SessionRepository};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: Mutex<HashMap<i64, Session>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn load(&self, user_id: i64) -> Result<Option<Session>> {
        let sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        Ok(sessions.get(&user_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        sessions.insert(session.user_id, session.clone());
        Ok(())
    }

    async fn clear(&self, user_id: i64) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|p| p.into_inner());
        sessions.remove(&user_id);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct MovieRecord {
    watched: bool,
    rating: Option<u8>,
    review: Option<String>,
    added_at: String,
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    users: Mutex<HashMap<i64, HashMap<u64, MovieRecord>>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn add_user(&self, user_id: i64) -> Result<()> {
        let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        users.entry(user_id).or_default();
        Ok(())
    }

    async fn list_user_movies(&self, user_id: i64) -> Result<Vec<SavedMovie>> {
        let users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        let mut saved: Vec<SavedMovie> = users
            .get(&user_id)
            .map(|movies| {
                movies
                    .iter()
                    .map(|(movie_id, record)| SavedMovie {
                        movie_id: *movie_id,
                        added_at: record.added_at.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        saved.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(saved)
    }

    async fn add_movie_to_user(&self, user_id: i64, movie_id: u64) -> Result<()> {
        let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        users
            .entry(user_id)
            .or_default()
            .entry(movie_id)
            .or_insert_with(|| MovieRecord {
                added_at: chrono::Utc::now().to_rfc3339(),
                ..Default::default()
            });
        Ok(())
    }

    async fn remove_movie_from_user(&self, user_id: i64, movie_id: u64) -> Result<()> {
        let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(movies) = users.get_mut(&user_id) {
            movies.remove(&movie_id);
        }
        Ok(())
    }

    async fn movie_meta(&self, user_id: i64, movie_id: u64) -> Result<MovieUserMeta> {
        let users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        users
            .get(&user_id)
            .and_then(|movies| movies.get(&movie_id))
            .map(|record| MovieUserMeta {
                watched: record.watched,
                rating: record.rating,
                review: record.review.clone(),
                added_at: record.added_at.clone(),
            })
            .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))
    }

    async fn set_watched(&self, user_id: i64, movie_id: u64, watched: bool) -> Result<()> {
        let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        let record = users
            .get_mut(&user_id)
            .and_then(|movies| movies.get_mut(&movie_id))
            .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))?;
        record.watched = watched;
        Ok(())
    }

    async fn set_review(
        &self,
        user_id: i64,
        movie_id: u64,
        rating: u8,
        review: String,
    ) -> Result<()> {
        let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        let record = users
            .get_mut(&user_id)
            .and_then(|movies| movies.get_mut(&movie_id))
            .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))?;
        record.rating = Some(rating);
        record.review = Some(review);
        Ok(())
    }

    async fn clear_review(&self, user_id: i64, movie_id: u64) -> Result<()> {
        let mut users = self.users.lock().unwrap_or_else(|p| p.into_inner());
        let record = users
            .get_mut(&user_id)
            .and_then(|movies| movies.get_mut(&movie_id))
            .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))?;
        record.rating = None;
        record.review = None;
        Ok(())
    }
}

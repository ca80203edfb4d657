//! File-backed catalog store.
//!
//! All users' saved movies live in one TOML document guarded by the atomic
//! file layer. TOML tables require string keys, so user and movie ids are
//! stored in decimal form.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use cinetrack_core::catalog::{CatalogStore, MovieUserMeta, SavedMovie};
use cinetrack_core::error::{CinetrackError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogData {
    #[serde(default)]
    users: HashMap<String, UserRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserRecord {
    #[serde(default)]
    movies: HashMap<String, MovieRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MovieRecord {
    watched: bool,
    rating: Option<u8>,
    review: Option<String>,
    added_at: String,
}

impl From<&MovieRecord> for MovieUserMeta {
    fn from(record: &MovieRecord) -> Self {
        Self {
            watched: record.watched,
            rating: record.rating,
            review: record.review.clone(),
            added_at: record.added_at.clone(),
        }
    }
}

pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a store at the default platform location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::paths::CinetrackPaths::catalog_file()?))
    }

    fn file(&self) -> AtomicTomlFile<CatalogData> {
        AtomicTomlFile::new(self.path.clone())
    }

    fn read(&self) -> Result<CatalogData> {
        Ok(self.file().load()?.unwrap_or_default())
    }

    /// Mutates one movie record in place, failing when the pair is absent.
    fn with_movie<F>(&self, user_id: i64, movie_id: u64, f: F) -> Result<()>
    where
        F: FnOnce(&mut MovieRecord),
    {
        self.file().update(CatalogData::default(), |data| {
            let record = data
                .users
                .get_mut(&user_id.to_string())
                .and_then(|user| user.movies.get_mut(&movie_id.to_string()))
                .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))?;
            f(record);
            Ok(())
        })
    }
}

#[async_trait]
impl CatalogStore for FileCatalogStore {
    async fn add_user(&self, user_id: i64) -> Result<()> {
        self.file().update(CatalogData::default(), |data| {
            data.users.entry(user_id.to_string()).or_default();
            Ok(())
        })
    }

    async fn list_user_movies(&self, user_id: i64) -> Result<Vec<SavedMovie>> {
        let data = self.read()?;
        let mut saved: Vec<SavedMovie> = data
            .users
            .get(&user_id.to_string())
            .map(|user| {
                user.movies
                    .iter()
                    .filter_map(|(movie_id, record)| {
                        movie_id.parse().ok().map(|movie_id| SavedMovie {
                            movie_id,
                            added_at: record.added_at.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        saved.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(saved)
    }

    async fn add_movie_to_user(&self, user_id: i64, movie_id: u64) -> Result<()> {
        self.file().update(CatalogData::default(), |data| {
            let user = data.users.entry(user_id.to_string()).or_default();
            // Re-adding an existing movie keeps its watch state and review
            user.movies
                .entry(movie_id.to_string())
                .or_insert_with(|| MovieRecord {
                    watched: false,
                    rating: None,
                    review: None,
                    added_at: chrono::Utc::now().to_rfc3339(),
                });
            Ok(())
        })?;
        debug!(user_id, movie_id, "movie saved to catalog");
        Ok(())
    }

    async fn remove_movie_from_user(&self, user_id: i64, movie_id: u64) -> Result<()> {
        self.file().update(CatalogData::default(), |data| {
            if let Some(user) = data.users.get_mut(&user_id.to_string()) {
                user.movies.remove(&movie_id.to_string());
            }
            Ok(())
        })
    }

    async fn movie_meta(&self, user_id: i64, movie_id: u64) -> Result<MovieUserMeta> {
        let data = self.read()?;
        data.users
            .get(&user_id.to_string())
            .and_then(|user| user.movies.get(&movie_id.to_string()))
            .map(MovieUserMeta::from)
            .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))
    }

    async fn set_watched(&self, user_id: i64, movie_id: u64, watched: bool) -> Result<()> {
        self.with_movie(user_id, movie_id, |record| record.watched = watched)
    }

    async fn set_review(
        &self,
        user_id: i64,
        movie_id: u64,
        rating: u8,
        review: String,
    ) -> Result<()> {
        self.with_movie(user_id, movie_id, |record| {
            record.rating = Some(rating);
            record.review = Some(review);
        })
    }

    async fn clear_review(&self, user_id: i64, movie_id: u64) -> Result<()> {
        self.with_movie(user_id, movie_id, |record| {
            record.rating = None;
            record.review = None;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> FileCatalogStore {
        FileCatalogStore::new(temp_dir.path().join("catalog.toml"))
    }

    #[tokio::test]
    async fn test_add_and_list_sorted_by_added_at() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.add_user(1).await.unwrap();
        store.add_movie_to_user(1, 603).await.unwrap();
        store.add_movie_to_user(1, 604).await.unwrap();

        let movies = store.list_user_movies(1).await.unwrap();
        assert_eq!(movies.len(), 2);
        assert!(movies[0].added_at <= movies[1].added_at);
    }

    #[tokio::test]
    async fn test_re_adding_preserves_watch_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.add_movie_to_user(1, 603).await.unwrap();
        store.set_watched(1, 603, true).await.unwrap();
        store.add_movie_to_user(1, 603).await.unwrap();

        assert!(store.movie_meta(1, 603).await.unwrap().watched);
    }

    #[tokio::test]
    async fn test_review_set_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.add_movie_to_user(1, 603).await.unwrap();
        store
            .set_review(1, 603, 9, "a classic".to_string())
            .await
            .unwrap();

        let meta = store.movie_meta(1, 603).await.unwrap();
        assert_eq!(meta.rating, Some(9));
        assert_eq!(meta.review, Some("a classic".to_string()));

        store.clear_review(1, 603).await.unwrap();
        let meta = store.movie_meta(1, 603).await.unwrap();
        assert_eq!(meta.rating, None);
        assert_eq!(meta.review, None);
    }

    #[tokio::test]
    async fn test_meta_for_unknown_movie_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let err = store.movie_meta(1, 999).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        store.add_movie_to_user(1, 603).await.unwrap();
        store.add_movie_to_user(2, 604).await.unwrap();

        let movies = store.list_user_movies(1).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].movie_id, 603);
    }
}

//! Movie metadata provider contract.
//!
//! Descriptive movie data (titles, ratings, genres, posters) comes from an
//! external provider that must be assumed rate-limited and transiently
//! failing. Every call into it happens inside a loader, under the engine's
//! bounded timeout.

use crate::error::Result;
use crate::locale::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A ranked search/discovery result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub movie_id: u64,
    pub title: String,
    pub vote_average: f64,
}

/// Full descriptive fields for one movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub movie_id: u64,
    pub title: String,
    pub original_title: String,
    /// Language tag of the original title, compared against the user's
    /// locale to decide whether the original title is worth showing.
    pub original_language: String,
    /// Release date as `YYYY-MM-DD`, empty when unknown.
    pub release_date: String,
    /// ISO 3166-1 production country codes.
    pub countries: Vec<String>,
    pub genres: Vec<String>,
    pub tagline: String,
    /// Runtime in minutes, zero when unknown.
    pub runtime: u32,
    pub overview: String,
    pub vote_average: f64,
    pub adult: bool,
    /// Poster reference (provider path or URL), if any.
    pub poster: Option<String>,
}

/// A selectable genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub genre_id: u64,
    pub name: String,
}

/// An abstract movie metadata provider.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Descriptive fields for one movie, localized where the provider
    /// supports it.
    async fn movie(&self, movie_id: u64, language: Language) -> Result<MovieInfo>;

    /// Ranked candidates for a free-text query.
    async fn search(&self, query: &str, language: Language) -> Result<Vec<MovieSummary>>;

    /// Ranked movies matching all of the given genres.
    async fn movies_by_genres(
        &self,
        genre_ids: &[u64],
        language: Language,
    ) -> Result<Vec<MovieSummary>>;

    /// The selectable genre list.
    async fn genres(&self, language: Language) -> Result<Vec<Genre>>;
}

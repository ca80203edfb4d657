//! File-backed movie metadata provider.
//!
//! Serves movie metadata from a TOML catalog on disk instead of a remote
//! metadata API. The catalog carries localized titles and overviews for
//! every supported language; a networked provider can replace this behind
//! the same trait.
//!
//! Catalog format:
//!
//! ```toml
//! [[genres]]
//! genre_id = 28
//! name = { en = "Action", uk = "Бойовик" }
//!
//! [[movies]]
//! movie_id = 603
//! genre_ids = [28, 878]
//! title = { en = "The Matrix", uk = "Матриця" }
//! original_title = "The Matrix"
//! original_language = "en"
//! release_date = "1999-03-31"
//! countries = ["US"]
//! runtime = 136
//! vote_average = 8.2
//! adult = false
//! overview = { en = "...", uk = "..." }
//! ```

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use cinetrack_core::error::{CinetrackError, Result};
use cinetrack_core::locale::Language;
use cinetrack_core::metadata::{Genre, MetadataProvider, MovieInfo, MovieSummary};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A string with one value per supported language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Localized {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub uk: String,
}

impl Localized {
    fn get(&self, language: Language) -> &str {
        let text = match language {
            Language::En => &self.en,
            Language::Uk => &self.uk,
        };
        // Untranslated entries fall back to English
        if text.is_empty() {
            &self.en
        } else {
            text
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenreRecord {
    genre_id: u64,
    name: Localized,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MovieRecord {
    movie_id: u64,
    #[serde(default)]
    genre_ids: Vec<u64>,
    title: Localized,
    #[serde(default)]
    original_title: String,
    #[serde(default)]
    original_language: String,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    countries: Vec<String>,
    #[serde(default)]
    tagline: Localized,
    #[serde(default)]
    runtime: u32,
    #[serde(default)]
    overview: Localized,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    adult: bool,
    #[serde(default)]
    poster: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MetadataCatalog {
    #[serde(default)]
    genres: Vec<GenreRecord>,
    #[serde(default)]
    movies: Vec<MovieRecord>,
}

pub struct FileMetadataProvider {
    catalog: MetadataCatalog,
}

impl FileMetadataProvider {
    /// Loads the catalog from `path` once; lookups afterwards are
    /// in-memory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = AtomicTomlFile::<MetadataCatalog>::new(path.as_ref().to_path_buf());
        let catalog = file
            .load()
            .map_err(|e| CinetrackError::loader("metadata", e.to_string()))?
            .ok_or_else(|| {
                CinetrackError::loader("metadata", "metadata catalog file is missing or empty")
            })?;
        Ok(Self { catalog })
    }

    fn record(&self, movie_id: u64) -> Result<&MovieRecord> {
        self.catalog
            .movies
            .iter()
            .find(|movie| movie.movie_id == movie_id)
            .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))
    }

    fn genre_names(&self, genre_ids: &[u64], language: Language) -> Vec<String> {
        self.catalog
            .genres
            .iter()
            .filter(|genre| genre_ids.contains(&genre.genre_id))
            .map(|genre| genre.name.get(language).to_string())
            .collect()
    }

    fn summary(record: &MovieRecord, language: Language) -> MovieSummary {
        MovieSummary {
            movie_id: record.movie_id,
            title: record.title.get(language).to_string(),
            vote_average: record.vote_average,
        }
    }
}

#[async_trait]
impl MetadataProvider for FileMetadataProvider {
    async fn movie(&self, movie_id: u64, language: Language) -> Result<MovieInfo> {
        let record = self.record(movie_id)?;
        Ok(MovieInfo {
            movie_id: record.movie_id,
            title: record.title.get(language).to_string(),
            original_title: record.original_title.clone(),
            original_language: record.original_language.clone(),
            release_date: record.release_date.clone(),
            countries: record.countries.clone(),
            genres: self.genre_names(&record.genre_ids, language),
            tagline: record.tagline.get(language).to_string(),
            runtime: record.runtime,
            overview: record.overview.get(language).to_string(),
            vote_average: record.vote_average,
            adult: record.adult,
            poster: record.poster.clone(),
        })
    }

    async fn search(&self, query: &str, language: Language) -> Result<Vec<MovieSummary>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .catalog
            .movies
            .iter()
            .filter(|movie| {
                movie.title.get(language).to_lowercase().contains(&needle)
                    || movie.original_title.to_lowercase().contains(&needle)
            })
            .map(|movie| Self::summary(movie, language))
            .collect())
    }

    async fn movies_by_genres(
        &self,
        genre_ids: &[u64],
        language: Language,
    ) -> Result<Vec<MovieSummary>> {
        Ok(self
            .catalog
            .movies
            .iter()
            .filter(|movie| movie.genre_ids.iter().any(|id| genre_ids.contains(id)))
            .map(|movie| Self::summary(movie, language))
            .collect())
    }

    async fn genres(&self, language: Language) -> Result<Vec<Genre>> {
        Ok(self
            .catalog
            .genres
            .iter()
            .map(|genre| Genre {
                genre_id: genre.genre_id,
                name: genre.name.get(language).to_string(),
            })
            .collect())
    }
}

//! Engine configuration.

use crate::locale::Language;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable parameters of the dialog engine.
///
/// Loaded once at process start and passed to [`DialogEngine`](crate::engine::DialogEngine)
/// by value; nothing reads configuration at event-handling time except
/// through this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Number of list rows shown per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound on the genre selection set in the genre picker.
    #[serde(default = "default_max_genre_selection")]
    pub max_genre_selection: usize,
    /// Bound on a single loader invocation. A loader exceeding this is
    /// treated as a loader failure so the per-user lock is never held
    /// across an unbounded external call.
    #[serde(default = "default_loader_timeout_ms")]
    pub loader_timeout_ms: u64,
    /// Locale used before the user has picked a language.
    #[serde(default)]
    pub default_language: Language,
}

fn default_page_size() -> usize {
    10
}

fn default_max_genre_selection() -> usize {
    3
}

fn default_loader_timeout_ms() -> u64 {
    10_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_genre_selection: default_max_genre_selection(),
            loader_timeout_ms: default_loader_timeout_ms(),
            default_language: Language::default(),
        }
    }
}

impl EngineConfig {
    /// Loader timeout as a [`Duration`].
    pub fn loader_timeout(&self) -> Duration {
        Duration::from_millis(self.loader_timeout_ms)
    }
}

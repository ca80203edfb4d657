//! Navigation stack frames.
//!
//! A frame binds a dialog state to the immutable input it was started with
//! (`StartData`) and a mutable scratch area local to the frame
//! (`LocalData`). Local data is a tagged union with one variant per state
//! that needs scratch space, so unrelated states can never collide on a
//! shared untyped map.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Identifies which view a frame renders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StateId {
    /// Initial state for a brand-new session.
    LanguageSelect,
    Welcome,
    /// The de-facto home state most flows reset to.
    MovieList,
    SearchAdd,
    MovieDetails,
    ReviewPrompt,
    RatingPicker,
    ReviewText,
    GenrePicker,
    GenreResults,
}

/// Sort key for the saved-movies list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Provider rating (vote average).
    Rating,
    /// Time the movie was added to the user's list.
    DateAdded,
}

/// Sort direction for the saved-movies list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortField {
    pub fn toggled(self) -> Self {
        match self {
            SortField::Rating => SortField::DateAdded,
            SortField::DateAdded => SortField::Rating,
        }
    }
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// Immutable input captured when a frame is pushed.
///
/// Never mutated after push; a digression flow that needs the same input
/// (e.g. which movie is being reviewed) carries it forward into the next
/// frame's start data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StartData {
    None,
    /// A specific movie is being viewed or reviewed.
    Movie { movie_id: u64 },
    /// Free-text search query captured from the user.
    Search { query: String },
    /// Confirmed genre selection carried into the results view.
    Genres { genre_ids: Vec<u64> },
}

/// Mutable scratch space local to one frame, discarded on pop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocalData {
    None,
    MovieList {
        current_page: usize,
        /// Page count cached from the last render; page arrows wrap
        /// against this before the fresh count is known.
        page_count: usize,
        sort_field: SortField,
        sort_order: SortOrder,
    },
    SearchResults {
        current_page: usize,
        page_count: usize,
    },
    GenrePicker {
        selected: Vec<u64>,
    },
    GenreResults {
        current_page: usize,
        page_count: usize,
    },
    /// Rating picked in the rating step, pending the review text.
    ReviewText {
        rating: u8,
    },
}

/// One entry in the navigation stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub state: StateId,
    pub start: StartData,
    pub local: LocalData,
}

impl Frame {
    /// Creates a frame with the default local data for its state.
    pub fn new(state: StateId, start: StartData) -> Self {
        let local = match state {
            StateId::MovieList => LocalData::MovieList {
                current_page: 1,
                page_count: 1,
                sort_field: SortField::Rating,
                sort_order: SortOrder::Descending,
            },
            StateId::SearchAdd => LocalData::SearchResults {
                current_page: 1,
                page_count: 1,
            },
            StateId::GenrePicker => LocalData::GenrePicker {
                selected: Vec::new(),
            },
            StateId::GenreResults => LocalData::GenreResults {
                current_page: 1,
                page_count: 1,
            },
            _ => LocalData::None,
        };
        Self {
            state,
            start,
            local,
        }
    }

    /// The root frame of a brand-new session.
    pub fn initial() -> Self {
        Frame::new(StateId::LanguageSelect, StartData::None)
    }

    /// Movie id carried in the frame's start data, if any.
    pub fn movie_id(&self) -> Option<u64> {
        match self.start {
            StartData::Movie { movie_id } => Some(movie_id),
            _ => None,
        }
    }
}

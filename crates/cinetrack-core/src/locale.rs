//! Localization contract.
//!
//! The core never hardcodes locale-specific text: loaders and the view
//! registry speak in [`MessageKey`]s plus named parameters, and a
//! [`Localizer`] collaborator turns those into display strings.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Languages the assistant can speak.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    En,
    Uk,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

/// Message keys understood by the localization provider.
///
/// Key names follow the translation catalog of the localization backend
/// (kebab-case identifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum MessageKey {
    // Language / welcome flow
    ChooseLanguage,
    ChosenLanguage,
    GetStarted,
    LanguageEn,
    LanguageUk,

    // Movie list
    ShowMovies,
    NoMovies,
    ArrowLeft,
    ArrowRight,
    PageIndicator,
    SortingRate,
    SortingDate,
    OrderAsc,
    OrderDesc,
    LastAdded,
    FirstAdded,

    // Search / add flow
    ChooseMovieToAdd,
    NoMoviesFound,
    GoBack,

    // Movie details
    MovieTitle,
    ReleaseDate,
    Genres,
    Tagline,
    Runtime,
    Minutes,
    Overview,
    Rating,
    Adult,
    DeleteMovie,
    MovieIsWatched,
    MovieNotWatched,

    // Review digression
    LeaveReview,
    Yes,
    No,
    HowWouldRate,
    WriteReview,

    // Genre browse
    ChooseGenre,
    GenreLimitReached,
    ConfirmGenres,
    FoundMovies,

    // Error notices
    StoreUnavailableNotice,
    LoaderFailedNotice,
    InvalidRating,
    EmptyGenreSelection,
}

/// Named parameters handed to the localization provider alongside a key.
pub type MessageArgs<'a> = &'a [(&'a str, String)];

/// An abstract localization provider.
///
/// Given a locale tag and a message key plus named parameters, returns a
/// formatted string. Implementations own the translation catalogs; the
/// core supplies keys and parameters only.
pub trait Localizer: Send + Sync {
    /// Formats the message identified by `key` in `language`.
    fn format(&self, language: Language, key: MessageKey, args: MessageArgs<'_>) -> String;

    /// Convenience for parameterless messages.
    fn get(&self, language: Language, key: MessageKey) -> String {
        self.format(language, key, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_language_round_trip() {
        assert_eq!(Language::En.to_string(), "en");
        assert_eq!(Language::from_str("uk").unwrap(), Language::Uk);
    }

    #[test]
    fn test_message_key_is_kebab_case() {
        assert_eq!(MessageKey::ChooseLanguage.as_ref(), "choose-language");
        assert_eq!(MessageKey::MovieIsWatched.as_ref(), "movie-is-watched");
    }
}

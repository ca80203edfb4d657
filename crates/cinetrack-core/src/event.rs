//! Inbound events from the transport layer.
//!
//! The transport delivers `(user_id, event)` pairs where the event is
//! either free text or the id of an action previously rendered. Action ids
//! are plain strings on the wire; [`Action`] gives them a typed shape,
//! including the payload-carrying families (`movie:<id>`, `genre:<id>`,
//! `rating:<n>`, `language:<tag>`).

use crate::locale::Language;
use std::str::FromStr;

/// One inbound event, as delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A free-text message.
    Text(String),
    /// The id of a rendered action the user selected.
    Action(String),
}

impl InboundEvent {
    pub fn text(value: impl Into<String>) -> Self {
        InboundEvent::Text(value.into())
    }

    pub fn action(id: impl Into<String>) -> Self {
        InboundEvent::Action(id.into())
    }
}

/// A parsed action id.
///
/// Plain ids match the wire string exactly; payload-carrying ids use a
/// `family:payload` form.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ArrowLeft,
    ArrowRight,
    SortField,
    SortOrder,
    GoBack,
    DeleteMovie,
    ToggleWatched,
    Yes,
    No,
    ConfirmGenres,
    StartWorkflow,
    /// Open details for a saved movie.
    SelectMovie(u64),
    /// Add a search/genre result to the user's list.
    AddMovie(u64),
    /// Toggle a genre in the picker.
    SelectGenre(u64),
    /// Pick a rating 1..=10.
    PickRating(u8),
    /// Pick a UI language.
    SelectLanguage(Language),
}

impl Action {
    /// Parses a wire action id. Unknown ids yield `None`; the engine
    /// treats them like any other unmatched event.
    pub fn parse(id: &str) -> Option<Action> {
        let plain = match id {
            "arrow_left" => Some(Action::ArrowLeft),
            "arrow_right" => Some(Action::ArrowRight),
            "sorting_type" => Some(Action::SortField),
            "sorting_order" => Some(Action::SortOrder),
            "go_back" => Some(Action::GoBack),
            "delete_movie" => Some(Action::DeleteMovie),
            "is_watched" => Some(Action::ToggleWatched),
            "yes" => Some(Action::Yes),
            "no" => Some(Action::No),
            "confirm_genres" => Some(Action::ConfirmGenres),
            "start_workflow" => Some(Action::StartWorkflow),
            _ => None,
        };
        if plain.is_some() {
            return plain;
        }

        let (family, payload) = id.split_once(':')?;
        match family {
            "movie" => payload.parse().ok().map(Action::SelectMovie),
            "add" => payload.parse().ok().map(Action::AddMovie),
            "genre" => payload.parse().ok().map(Action::SelectGenre),
            "rating" => payload
                .parse()
                .ok()
                .filter(|n| (1..=10).contains(n))
                .map(Action::PickRating),
            "language" => Language::from_str(payload).ok().map(Action::SelectLanguage),
            _ => None,
        }
    }

    /// The wire id for this action, inverse of [`Action::parse`].
    pub fn id(&self) -> String {
        match self {
            Action::ArrowLeft => "arrow_left".to_string(),
            Action::ArrowRight => "arrow_right".to_string(),
            Action::SortField => "sorting_type".to_string(),
            Action::SortOrder => "sorting_order".to_string(),
            Action::GoBack => "go_back".to_string(),
            Action::DeleteMovie => "delete_movie".to_string(),
            Action::ToggleWatched => "is_watched".to_string(),
            Action::Yes => "yes".to_string(),
            Action::No => "no".to_string(),
            Action::ConfirmGenres => "confirm_genres".to_string(),
            Action::StartWorkflow => "start_workflow".to_string(),
            Action::SelectMovie(id) => format!("movie:{}", id),
            Action::AddMovie(id) => format!("add:{}", id),
            Action::SelectGenre(id) => format!("genre:{}", id),
            Action::PickRating(n) => format!("rating:{}", n),
            Action::SelectLanguage(lang) => format!("language:{}", lang),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_ids() {
        assert_eq!(Action::parse("arrow_left"), Some(Action::ArrowLeft));
        assert_eq!(Action::parse("is_watched"), Some(Action::ToggleWatched));
        assert_eq!(Action::parse("bogus"), None);
    }

    #[test]
    fn test_parse_payload_ids() {
        assert_eq!(Action::parse("movie:603"), Some(Action::SelectMovie(603)));
        assert_eq!(
            Action::parse("language:uk"),
            Some(Action::SelectLanguage(Language::Uk))
        );
        assert_eq!(Action::parse("rating:10"), Some(Action::PickRating(10)));
        // out-of-scale ratings are not valid actions
        assert_eq!(Action::parse("rating:11"), None);
        assert_eq!(Action::parse("rating:0"), None);
    }

    #[test]
    fn test_id_round_trip() {
        let actions = [
            Action::ArrowRight,
            Action::SelectMovie(42),
            Action::AddMovie(7),
            Action::SelectGenre(18),
            Action::PickRating(9),
            Action::SelectLanguage(Language::En),
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.id()), Some(action));
        }
    }
}

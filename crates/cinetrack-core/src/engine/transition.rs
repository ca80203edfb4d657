//! Transition tables.
//!
//! Each state carries an ordered list of rules mapping an event matcher to
//! a transition operation. Rules are checked in registration order and the
//! first match wins; this ordering is a hard invariant, because a wildcard
//! "capture any text" rule registered for a state must never shadow a more
//! specific match for the same state, so wildcards always come last.

use crate::event::{Action, InboundEvent};
use crate::locale::Language;
use crate::session::StateId;
use std::collections::HashMap;

/// The payload-less action family used by matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFamily {
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
    SelectMovie,
    AddMovie,
    SelectGenre,
    PickRating,
    SelectLanguage,
}

impl Action {
    /// The family this action belongs to, ignoring any payload.
    pub fn family(&self) -> ActionFamily {
        match self {
            Action::ArrowLeft => ActionFamily::ArrowLeft,
            Action::ArrowRight => ActionFamily::ArrowRight,
            Action::SortField => ActionFamily::SortField,
            Action::SortOrder => ActionFamily::SortOrder,
            Action::GoBack => ActionFamily::GoBack,
            Action::DeleteMovie => ActionFamily::DeleteMovie,
            Action::ToggleWatched => ActionFamily::ToggleWatched,
            Action::Yes => ActionFamily::Yes,
            Action::No => ActionFamily::No,
            Action::ConfirmGenres => ActionFamily::ConfirmGenres,
            Action::StartWorkflow => ActionFamily::StartWorkflow,
            Action::SelectMovie(_) => ActionFamily::SelectMovie,
            Action::AddMovie(_) => ActionFamily::AddMovie,
            Action::SelectGenre(_) => ActionFamily::SelectGenre,
            Action::PickRating(_) => ActionFamily::PickRating,
            Action::SelectLanguage(_) => ActionFamily::SelectLanguage,
        }
    }
}

/// What an event must look like for a rule to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMatcher {
    /// A rendered action of the given family.
    Action(ActionFamily),
    /// An exact text command, e.g. `/language`.
    Command(&'static str),
    /// Any free-text input. Always registered after the specific matchers
    /// of the same state.
    AnyText,
}

/// The semantic operation a rule resolves to, before payload binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    PageBack,
    PageForward,
    ToggleSortField,
    ToggleSortOrder,
    ChooseLanguage,
    StartWorkflow,
    OpenDetails,
    CaptureSearch,
    BrowseGenres,
    RestartLanguage,
    AddMovie,
    BackToList,
    ToggleWatched,
    DeleteMovie,
    BeginReview,
    DeclineReview,
    PickRating,
    CaptureRating,
    SubmitReview,
    CancelReview,
    ToggleGenre,
    ConfirmGenres,
    LeaveResults,
}

/// A resolved transition operation, payload bound from the event.
///
/// The engine turns each of these into one stack operation (`Push`,
/// `Replace`, `ResetTo`, `PopOne` or `Mutate`) plus any catalog side
/// effects.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOp {
    /// `Mutate`: circular page step backwards.
    PageBack,
    /// `Mutate`: circular page step forwards.
    PageForward,
    /// `Mutate`: flip rating/date-added sort key.
    ToggleSortField,
    /// `Mutate`: flip ascending/descending.
    ToggleSortOrder,
    /// `Replace`: language picked, move to the welcome view.
    ChooseLanguage(Language),
    /// `ResetTo` the movie list.
    StartWorkflow,
    /// `Push` the details view for a saved movie.
    OpenDetails(u64),
    /// `Push` the search view with the captured query.
    CaptureSearch(String),
    /// `Push` the genre picker.
    BrowseGenres,
    /// `ResetTo` the language selection.
    RestartLanguage,
    /// Add a candidate to the user's list, then `ResetTo` the movie list.
    AddMovie(u64),
    /// `ResetTo` the movie list.
    BackToList,
    /// Flip the watched flag; watching pushes the review prompt,
    /// unwatching clears the stored rating/review.
    ToggleWatched,
    /// Remove the movie, then `ResetTo` the movie list.
    DeleteMovie,
    /// `ResetTo` the rating picker, carrying the movie id.
    BeginReview,
    /// `ResetTo` the details view without reviewing.
    DeclineReview,
    /// `Replace` with the review-text view, rating captured.
    PickRating(u8),
    /// Free-text rating input, validated at apply time.
    CaptureRating(String),
    /// Store the review, then `ResetTo` the details view.
    SubmitReview(String),
    /// Abandon the review digression, back to the details view.
    CancelReview,
    /// `Mutate`: toggle a genre in the selection set.
    ToggleGenre(u64),
    /// `Push` the genre results for the confirmed selection.
    ConfirmGenres,
    /// `PopOne`: leave the results, back to the picker.
    LeaveResults,
}

/// One transition rule.
struct Rule {
    matcher: EventMatcher,
    op: OpKind,
    /// States this rule may transition to, declared for the eager
    /// referential-integrity check. Empty for `Mutate`/`PopOne` rules.
    targets: &'static [StateId],
}

impl Rule {
    const fn new(matcher: EventMatcher, op: OpKind, targets: &'static [StateId]) -> Self {
        Self {
            matcher,
            op,
            targets,
        }
    }
}

/// Per-state ordered transition rules for the whole state machine.
pub struct TransitionTable {
    rules: HashMap<StateId, Vec<Rule>>,
}

impl TransitionTable {
    /// Builds the table for the full movie-watchlist state machine.
    pub fn standard() -> Self {
        use ActionFamily as F;
        use EventMatcher::{Action as OnAction, AnyText, Command};
        use StateId::*;

        let mut rules: HashMap<StateId, Vec<Rule>> = HashMap::new();

        rules.insert(
            LanguageSelect,
            vec![Rule::new(
                OnAction(F::SelectLanguage),
                OpKind::ChooseLanguage,
                &[Welcome],
            )],
        );

        rules.insert(
            Welcome,
            vec![Rule::new(
                OnAction(F::StartWorkflow),
                OpKind::StartWorkflow,
                &[MovieList],
            )],
        );

        rules.insert(
            MovieList,
            vec![
                Rule::new(OnAction(F::ArrowLeft), OpKind::PageBack, &[]),
                Rule::new(OnAction(F::ArrowRight), OpKind::PageForward, &[]),
                Rule::new(OnAction(F::SortField), OpKind::ToggleSortField, &[]),
                Rule::new(OnAction(F::SortOrder), OpKind::ToggleSortOrder, &[]),
                Rule::new(
                    OnAction(F::SelectMovie),
                    OpKind::OpenDetails,
                    &[MovieDetails],
                ),
                Rule::new(Command("/language"), OpKind::RestartLanguage, &[LanguageSelect]),
                Rule::new(
                    Command("/movies_on_genre"),
                    OpKind::BrowseGenres,
                    &[GenrePicker],
                ),
                // Wildcard last: free text is a search query
                Rule::new(AnyText, OpKind::CaptureSearch, &[SearchAdd]),
            ],
        );

        rules.insert(
            SearchAdd,
            vec![
                Rule::new(OnAction(F::ArrowLeft), OpKind::PageBack, &[]),
                Rule::new(OnAction(F::ArrowRight), OpKind::PageForward, &[]),
                Rule::new(OnAction(F::AddMovie), OpKind::AddMovie, &[MovieList]),
                Rule::new(OnAction(F::GoBack), OpKind::BackToList, &[MovieList]),
            ],
        );

        rules.insert(
            MovieDetails,
            vec![
                Rule::new(
                    OnAction(F::ToggleWatched),
                    OpKind::ToggleWatched,
                    &[ReviewPrompt],
                ),
                Rule::new(OnAction(F::DeleteMovie), OpKind::DeleteMovie, &[MovieList]),
                Rule::new(OnAction(F::GoBack), OpKind::BackToList, &[MovieList]),
            ],
        );

        rules.insert(
            ReviewPrompt,
            vec![
                Rule::new(OnAction(F::Yes), OpKind::BeginReview, &[RatingPicker]),
                Rule::new(OnAction(F::No), OpKind::DeclineReview, &[MovieDetails]),
            ],
        );

        rules.insert(
            RatingPicker,
            vec![
                Rule::new(OnAction(F::PickRating), OpKind::PickRating, &[ReviewText]),
                Rule::new(OnAction(F::GoBack), OpKind::CancelReview, &[MovieDetails]),
                // Numeric free-text input is accepted as a rating
                Rule::new(AnyText, OpKind::CaptureRating, &[ReviewText]),
            ],
        );

        rules.insert(
            ReviewText,
            vec![
                Rule::new(OnAction(F::GoBack), OpKind::CancelReview, &[MovieDetails]),
                Rule::new(AnyText, OpKind::SubmitReview, &[MovieDetails]),
            ],
        );

        rules.insert(
            GenrePicker,
            vec![
                Rule::new(OnAction(F::SelectGenre), OpKind::ToggleGenre, &[]),
                Rule::new(
                    OnAction(F::ConfirmGenres),
                    OpKind::ConfirmGenres,
                    &[GenreResults],
                ),
                Rule::new(OnAction(F::GoBack), OpKind::BackToList, &[MovieList]),
            ],
        );

        rules.insert(
            GenreResults,
            vec![
                Rule::new(OnAction(F::ArrowLeft), OpKind::PageBack, &[]),
                Rule::new(OnAction(F::ArrowRight), OpKind::PageForward, &[]),
                Rule::new(OnAction(F::AddMovie), OpKind::AddMovie, &[MovieList]),
                Rule::new(OnAction(F::GoBack), OpKind::LeaveResults, &[]),
            ],
        );

        Self { rules }
    }

    /// States that carry transition rules.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.rules.keys().copied()
    }

    /// Union of declared transition targets for `state`.
    pub fn declared_targets(&self, state: StateId) -> Vec<StateId> {
        self.rules
            .get(&state)
            .map(|rules| {
                rules
                    .iter()
                    .flat_map(|rule| rule.targets.iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves `event` against the rules of `state`, first match wins.
    ///
    /// Returns `None` when no rule matched; the engine treats that as a
    /// no-op re-render.
    pub fn resolve(&self, state: StateId, event: &InboundEvent) -> Option<TransitionOp> {
        let rules = self.rules.get(&state)?;
        let action = match event {
            InboundEvent::Action(id) => Action::parse(id),
            InboundEvent::Text(_) => None,
        };

        for rule in rules {
            let matched = match (&rule.matcher, event) {
                (EventMatcher::Action(family), InboundEvent::Action(_)) => {
                    action.as_ref().map(Action::family) == Some(*family)
                }
                (EventMatcher::Command(command), InboundEvent::Text(text)) => {
                    text.trim() == *command
                }
                (EventMatcher::AnyText, InboundEvent::Text(_)) => true,
                _ => false,
            };
            if matched {
                return Some(bind(rule.op, action.as_ref(), event));
            }
        }
        None
    }
}

/// Binds the event payload into the resolved operation.
fn bind(op: OpKind, action: Option<&Action>, event: &InboundEvent) -> TransitionOp {
    let text = || match event {
        InboundEvent::Text(text) => text.clone(),
        InboundEvent::Action(_) => String::new(),
    };

    match (op, action) {
        (OpKind::PageBack, _) => TransitionOp::PageBack,
        (OpKind::PageForward, _) => TransitionOp::PageForward,
        (OpKind::ToggleSortField, _) => TransitionOp::ToggleSortField,
        (OpKind::ToggleSortOrder, _) => TransitionOp::ToggleSortOrder,
        (OpKind::ChooseLanguage, Some(Action::SelectLanguage(language))) => {
            TransitionOp::ChooseLanguage(*language)
        }
        (OpKind::StartWorkflow, _) => TransitionOp::StartWorkflow,
        (OpKind::OpenDetails, Some(Action::SelectMovie(movie_id))) => {
            TransitionOp::OpenDetails(*movie_id)
        }
        (OpKind::CaptureSearch, _) => TransitionOp::CaptureSearch(text()),
        (OpKind::BrowseGenres, _) => TransitionOp::BrowseGenres,
        (OpKind::RestartLanguage, _) => TransitionOp::RestartLanguage,
        (OpKind::AddMovie, Some(Action::AddMovie(movie_id))) => TransitionOp::AddMovie(*movie_id),
        (OpKind::BackToList, _) => TransitionOp::BackToList,
        (OpKind::ToggleWatched, _) => TransitionOp::ToggleWatched,
        (OpKind::DeleteMovie, _) => TransitionOp::DeleteMovie,
        (OpKind::BeginReview, _) => TransitionOp::BeginReview,
        (OpKind::DeclineReview, _) => TransitionOp::DeclineReview,
        (OpKind::PickRating, Some(Action::PickRating(rating))) => {
            TransitionOp::PickRating(*rating)
        }
        (OpKind::CaptureRating, _) => TransitionOp::CaptureRating(text()),
        (OpKind::SubmitReview, _) => TransitionOp::SubmitReview(text()),
        (OpKind::CancelReview, _) => TransitionOp::CancelReview,
        (OpKind::ToggleGenre, Some(Action::SelectGenre(genre_id))) => {
            TransitionOp::ToggleGenre(*genre_id)
        }
        (OpKind::ConfirmGenres, _) => TransitionOp::ConfirmGenres,
        (OpKind::LeaveResults, _) => TransitionOp::LeaveResults,
        // A rule only fires when its matcher accepted the action family,
        // so a payload mismatch here cannot happen.
        (op, _) => unreachable!("op {:?} bound without its payload", op),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_action_beats_wildcard() {
        let table = TransitionTable::standard();
        // An action id never falls through to the AnyText search capture
        let op = table.resolve(
            StateId::MovieList,
            &InboundEvent::action("movie:603"),
        );
        assert_eq!(op, Some(TransitionOp::OpenDetails(603)));
    }

    #[test]
    fn test_command_beats_wildcard() {
        let table = TransitionTable::standard();
        let op = table.resolve(StateId::MovieList, &InboundEvent::text("/language"));
        assert_eq!(op, Some(TransitionOp::RestartLanguage));

        let op = table.resolve(StateId::MovieList, &InboundEvent::text("the matrix"));
        assert_eq!(
            op,
            Some(TransitionOp::CaptureSearch("the matrix".to_string()))
        );
    }

    #[test]
    fn test_unmatched_event_resolves_to_none() {
        let table = TransitionTable::standard();
        // Free text in the details view has no rule
        assert_eq!(
            table.resolve(StateId::MovieDetails, &InboundEvent::text("hello")),
            None
        );
        // Unknown action id
        assert_eq!(
            table.resolve(StateId::MovieList, &InboundEvent::action("bogus")),
            None
        );
    }

    #[test]
    fn test_rating_free_text_is_captured() {
        let table = TransitionTable::standard();
        let op = table.resolve(StateId::RatingPicker, &InboundEvent::text("8"));
        assert_eq!(op, Some(TransitionOp::CaptureRating("8".to_string())));
    }

    #[test]
    fn test_every_state_with_rules_declares_targets_within_machine() {
        let table = TransitionTable::standard();
        for state in table.states() {
            for target in table.declared_targets(state) {
                // Every reachable state also carries rules of its own
                assert!(table.rules.contains_key(&target));
            }
        }
    }
}

//! Static view registry.
//!
//! Maps every dialog state to its view descriptor: a content template, the
//! ordered selectable actions with their visibility predicates, and the
//! template used when the underlying collection is empty. The registry is
//! built once at process start and validated eagerly against the
//! transition table: a transition targeting an unregistered state is a
//! startup failure, never a runtime surprise.

use super::render::{RenderFlags, RenderModel, RenderedAction};
use crate::engine::transition::TransitionTable;
use crate::error::{CinetrackError, Result};
use crate::event::Action;
use crate::locale::{Language, Localizer, MessageKey};
use crate::session::StateId;
use std::collections::HashMap;

/// A pure predicate over the render model deciding whether an action is
/// shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityRule {
    Always,
    WhenNotEmpty,
    WhenWatched,
    WhenNotWatched,
    /// Sort-field button label while sorting by provider rating.
    WhenSortedByRating,
    /// Sort-field button label while sorting by date added.
    WhenSortedByDate,
    WhenRatingAscending,
    WhenRatingDescending,
    /// Date sort, newest first ("last added").
    WhenDateNewestFirst,
    /// Date sort, oldest first ("first added").
    WhenDateOldestFirst,
}

impl VisibilityRule {
    pub fn evaluate(&self, flags: &RenderFlags) -> bool {
        match self {
            VisibilityRule::Always => true,
            VisibilityRule::WhenNotEmpty => !flags.is_empty,
            VisibilityRule::WhenWatched => flags.is_watched,
            VisibilityRule::WhenNotWatched => !flags.is_watched,
            VisibilityRule::WhenSortedByRating => !flags.is_empty && flags.sort_by_rating,
            VisibilityRule::WhenSortedByDate => !flags.is_empty && !flags.sort_by_rating,
            VisibilityRule::WhenRatingAscending => {
                !flags.is_empty && flags.sort_by_rating && !flags.sort_descending
            }
            VisibilityRule::WhenRatingDescending => {
                !flags.is_empty && flags.sort_by_rating && flags.sort_descending
            }
            VisibilityRule::WhenDateNewestFirst => {
                !flags.is_empty && !flags.sort_by_rating && flags.sort_descending
            }
            VisibilityRule::WhenDateOldestFirst => {
                !flags.is_empty && !flags.sort_by_rating && !flags.sort_descending
            }
        }
    }
}

/// One statically declared action of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSpec {
    pub action: Action,
    pub label: MessageKey,
    pub when: VisibilityRule,
}

impl ActionSpec {
    fn new(action: Action, label: MessageKey, when: VisibilityRule) -> Self {
        Self {
            action,
            label,
            when,
        }
    }
}

/// Static description of one view. Immutable after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDescriptor {
    pub state: StateId,
    /// Content template for the populated case.
    pub template: MessageKey,
    /// Content template when the rendered collection is empty.
    pub empty_template: Option<MessageKey>,
    /// Ordered selectable actions; dynamic item rows are appended by the
    /// state's loader, not declared here.
    pub actions: Vec<ActionSpec>,
}

impl ViewDescriptor {
    /// Builds the base render model for this view: template content plus
    /// the statically declared actions whose visibility predicate holds.
    pub fn render(
        &self,
        localizer: &dyn Localizer,
        language: Language,
        flags: &RenderFlags,
    ) -> RenderModel {
        let template = match (flags.is_empty, self.empty_template) {
            (true, Some(empty)) => empty,
            _ => self.template,
        };
        let mut model = RenderModel::new(self.state, localizer.get(language, template));
        for spec in &self.actions {
            if spec.when.evaluate(flags) {
                model.actions.push(RenderedAction {
                    id: spec.action.id(),
                    label: localizer.get(language, spec.label),
                });
            }
        }
        model
    }
}

/// Static mapping from a state identifier to its view descriptor.
pub struct ViewRegistry {
    views: HashMap<StateId, ViewDescriptor>,
}

impl ViewRegistry {
    /// Builds the registry for the full movie-watchlist state machine.
    pub fn standard() -> Self {
        let views = vec![
            ViewDescriptor {
                state: StateId::LanguageSelect,
                template: MessageKey::ChooseLanguage,
                empty_template: None,
                actions: vec![
                    ActionSpec::new(
                        Action::SelectLanguage(Language::En),
                        MessageKey::LanguageEn,
                        VisibilityRule::Always,
                    ),
                    ActionSpec::new(
                        Action::SelectLanguage(Language::Uk),
                        MessageKey::LanguageUk,
                        VisibilityRule::Always,
                    ),
                ],
            },
            ViewDescriptor {
                state: StateId::Welcome,
                template: MessageKey::ChosenLanguage,
                empty_template: None,
                actions: vec![ActionSpec::new(
                    Action::StartWorkflow,
                    MessageKey::GetStarted,
                    VisibilityRule::Always,
                )],
            },
            ViewDescriptor {
                state: StateId::MovieList,
                template: MessageKey::ShowMovies,
                empty_template: Some(MessageKey::NoMovies),
                actions: vec![
                    ActionSpec::new(
                        Action::ArrowLeft,
                        MessageKey::ArrowLeft,
                        VisibilityRule::WhenNotEmpty,
                    ),
                    ActionSpec::new(
                        Action::ArrowRight,
                        MessageKey::ArrowRight,
                        VisibilityRule::WhenNotEmpty,
                    ),
                    ActionSpec::new(
                        Action::SortField,
                        MessageKey::SortingRate,
                        VisibilityRule::WhenSortedByRating,
                    ),
                    ActionSpec::new(
                        Action::SortField,
                        MessageKey::SortingDate,
                        VisibilityRule::WhenSortedByDate,
                    ),
                    ActionSpec::new(
                        Action::SortOrder,
                        MessageKey::OrderAsc,
                        VisibilityRule::WhenRatingAscending,
                    ),
                    ActionSpec::new(
                        Action::SortOrder,
                        MessageKey::OrderDesc,
                        VisibilityRule::WhenRatingDescending,
                    ),
                    ActionSpec::new(
                        Action::SortOrder,
                        MessageKey::LastAdded,
                        VisibilityRule::WhenDateNewestFirst,
                    ),
                    ActionSpec::new(
                        Action::SortOrder,
                        MessageKey::FirstAdded,
                        VisibilityRule::WhenDateOldestFirst,
                    ),
                ],
            },
            ViewDescriptor {
                state: StateId::SearchAdd,
                template: MessageKey::ChooseMovieToAdd,
                empty_template: Some(MessageKey::NoMoviesFound),
                actions: vec![
                    ActionSpec::new(
                        Action::ArrowLeft,
                        MessageKey::ArrowLeft,
                        VisibilityRule::WhenNotEmpty,
                    ),
                    ActionSpec::new(
                        Action::ArrowRight,
                        MessageKey::ArrowRight,
                        VisibilityRule::WhenNotEmpty,
                    ),
                    ActionSpec::new(Action::GoBack, MessageKey::GoBack, VisibilityRule::Always),
                ],
            },
            ViewDescriptor {
                state: StateId::MovieDetails,
                template: MessageKey::MovieTitle,
                empty_template: None,
                actions: vec![
                    ActionSpec::new(
                        Action::DeleteMovie,
                        MessageKey::DeleteMovie,
                        VisibilityRule::Always,
                    ),
                    ActionSpec::new(Action::GoBack, MessageKey::GoBack, VisibilityRule::Always),
                    ActionSpec::new(
                        Action::ToggleWatched,
                        MessageKey::MovieIsWatched,
                        VisibilityRule::WhenWatched,
                    ),
                    ActionSpec::new(
                        Action::ToggleWatched,
                        MessageKey::MovieNotWatched,
                        VisibilityRule::WhenNotWatched,
                    ),
                ],
            },
            ViewDescriptor {
                state: StateId::ReviewPrompt,
                template: MessageKey::LeaveReview,
                empty_template: None,
                actions: vec![
                    ActionSpec::new(Action::Yes, MessageKey::Yes, VisibilityRule::Always),
                    ActionSpec::new(Action::No, MessageKey::No, VisibilityRule::Always),
                ],
            },
            ViewDescriptor {
                state: StateId::RatingPicker,
                template: MessageKey::HowWouldRate,
                empty_template: None,
                actions: vec![ActionSpec::new(
                    Action::GoBack,
                    MessageKey::GoBack,
                    VisibilityRule::Always,
                )],
            },
            ViewDescriptor {
                state: StateId::ReviewText,
                template: MessageKey::WriteReview,
                empty_template: None,
                actions: vec![ActionSpec::new(
                    Action::GoBack,
                    MessageKey::GoBack,
                    VisibilityRule::Always,
                )],
            },
            ViewDescriptor {
                state: StateId::GenrePicker,
                template: MessageKey::ChooseGenre,
                empty_template: None,
                actions: vec![
                    ActionSpec::new(
                        Action::ConfirmGenres,
                        MessageKey::ConfirmGenres,
                        VisibilityRule::Always,
                    ),
                    ActionSpec::new(Action::GoBack, MessageKey::GoBack, VisibilityRule::Always),
                ],
            },
            ViewDescriptor {
                state: StateId::GenreResults,
                template: MessageKey::FoundMovies,
                empty_template: Some(MessageKey::NoMoviesFound),
                actions: vec![
                    ActionSpec::new(
                        Action::ArrowLeft,
                        MessageKey::ArrowLeft,
                        VisibilityRule::WhenNotEmpty,
                    ),
                    ActionSpec::new(
                        Action::ArrowRight,
                        MessageKey::ArrowRight,
                        VisibilityRule::WhenNotEmpty,
                    ),
                    ActionSpec::new(Action::GoBack, MessageKey::GoBack, VisibilityRule::Always),
                ],
            },
        ];

        Self {
            views: views.into_iter().map(|view| (view.state, view)).collect(),
        }
    }

    /// Looks up the descriptor for `state`.
    pub fn get(&self, state: StateId) -> Result<&ViewDescriptor> {
        self.views
            .get(&state)
            .ok_or_else(|| CinetrackError::config(format!("No view registered for state '{}'", state)))
    }

    /// Whether `state` has a registered view.
    pub fn contains(&self, state: StateId) -> bool {
        self.views.contains_key(&state)
    }

    /// Referential-integrity check over the whole table.
    ///
    /// Every state that carries transition rules must have a view, and
    /// every declared transition target must reference a registered state.
    /// Runs once at process start; a failure here aborts startup.
    pub fn validate(&self, transitions: &TransitionTable) -> Result<()> {
        for state in transitions.states() {
            if !self.contains(state) {
                return Err(CinetrackError::config(format!(
                    "Transition rules registered for state '{}' without a view",
                    state
                )));
            }
            for target in transitions.declared_targets(state) {
                if !self.contains(target) {
                    return Err(CinetrackError::config(format!(
                        "Transition from '{}' targets unregistered state '{}'",
                        state, target
                    )));
                }
            }
        }
        Ok(())
    }
}

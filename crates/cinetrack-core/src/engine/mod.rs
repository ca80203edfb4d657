//! The dialog engine.
//!
//! Orchestrates one inbound event end to end: lease the user's session,
//! load it, resolve a transition, apply the stack operation and any
//! catalog side effects, run the target state's loader under a bounded
//! timeout, paginate list-shaped renders, persist, release.

pub mod transition;

mod loaders;

use crate::catalog::CatalogStore;
use crate::config::EngineConfig;
use crate::error::{CinetrackError, Result};
use crate::event::InboundEvent;
use crate::locale::{Localizer, MessageKey};
use crate::metadata::MetadataProvider;
use crate::pagination::{advance, PageDirection, PageWindow};
use crate::session::{
    Frame, LocalData, Session, SessionLockProvider, SessionRepository, StartData, StateId,
};
use crate::view::{Notice, PageInfo, RenderFlags, RenderModel};
use std::sync::Arc;
use tracing::{debug, warn};
use transition::{TransitionOp, TransitionTable};

/// The external collaborators the engine is wired with at process start.
///
/// Explicitly constructed and passed down; no module-level singletons.
#[derive(Clone)]
pub struct Collaborators {
    pub sessions: Arc<dyn SessionRepository>,
    pub locks: Arc<dyn SessionLockProvider>,
    pub catalog: Arc<dyn CatalogStore>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub localizer: Arc<dyn Localizer>,
}

/// Stack-based dialog engine for the movie-watchlist state machine.
pub struct DialogEngine {
    config: EngineConfig,
    registry: crate::view::ViewRegistry,
    transitions: TransitionTable,
    cx: Collaborators,
}

impl DialogEngine {
    /// Creates an engine over the standard state machine.
    ///
    /// # Errors
    ///
    /// Fails fast if the view registry does not cover every transition
    /// target; this check runs once here, never at event time.
    pub fn new(config: EngineConfig, cx: Collaborators) -> Result<Self> {
        let registry = crate::view::ViewRegistry::standard();
        let transitions = TransitionTable::standard();
        registry.validate(&transitions)?;
        Ok(Self {
            config,
            registry,
            transitions,
            cx,
        })
    }

    /// Handles one inbound event for `user_id`.
    ///
    /// Events for a single user are serialized via the session lease;
    /// events for different users run fully concurrently.
    pub async fn handle(&self, user_id: i64, event: InboundEvent) -> Result<RenderModel> {
        let _lease = self.cx.locks.acquire(user_id).await?;

        let mut session = match self.cx.sessions.load(user_id).await? {
            Some(session) => session,
            None => {
                debug!(user_id, "first contact, initializing session");
                self.cx.catalog.add_user(user_id).await?;
                Session::new(user_id, self.config.default_language)
            }
        };

        let state = match session.stack.top() {
            Ok(frame) => frame.state,
            Err(_) => {
                warn!(user_id, "loaded session has an empty stack, resetting");
                session.stack.replace_from_bottom(Frame::initial());
                StateId::LanguageSelect
            }
        };
        let mut notice = None;
        match self.transitions.resolve(state, &event) {
            None => {
                // No matcher matched: no-op, re-render the current state
                debug!(user_id, %state, "no transition matched, re-rendering");
            }
            Some(op) => match self.apply(&mut session, op).await {
                Ok(applied) => notice = applied,
                Err(err) if err.is_empty_stack() => {
                    warn!(user_id, "navigation stack invariant violated, resetting session");
                    session.stack.replace_from_bottom(Frame::initial());
                }
                Err(err) => return Err(err),
            },
        }

        // The stack transition is decided; loader failure must not undo it.
        let target = session.stack.top()?.state;
        let mut model = match tokio::time::timeout(
            self.config.loader_timeout(),
            loaders::load(target, &session, &self.cx, &self.registry),
        )
        .await
        {
            Ok(Ok(model)) => model,
            Ok(Err(err)) => {
                warn!(user_id, %target, error = %err, "loader failed, returning degraded render");
                self.degraded(&session, target)
            }
            Err(_elapsed) => {
                warn!(user_id, %target, "loader timed out, returning degraded render");
                self.degraded(&session, target)
            }
        };

        if let Some(n) = notice {
            model.notice = Some(n);
        }
        self.paginate(&mut model);
        if let Some(page) = model.page {
            sync_page_state(&mut session, page);
        }

        session.touch();
        self.cx.sessions.save(&session).await?;
        Ok(model)
    }

    /// Applies one resolved transition: stack operation plus catalog side
    /// effects. Returns a notice when the input was rejected without a
    /// state change.
    async fn apply(&self, session: &mut Session, op: TransitionOp) -> Result<Option<Notice>> {
        let user_id = session.user_id;
        match op {
            TransitionOp::PageBack => self.turn_page(session, PageDirection::Back),
            TransitionOp::PageForward => self.turn_page(session, PageDirection::Forward),
            TransitionOp::ToggleSortField => {
                if let LocalData::MovieList { sort_field, .. } = &mut session.stack.top_mut()?.local
                {
                    *sort_field = sort_field.toggled();
                }
                Ok(None)
            }
            TransitionOp::ToggleSortOrder => {
                if let LocalData::MovieList { sort_order, .. } = &mut session.stack.top_mut()?.local
                {
                    *sort_order = sort_order.toggled();
                }
                Ok(None)
            }
            TransitionOp::ChooseLanguage(language) => {
                session.locale = language;
                debug!(user_id, %language, "language chosen");
                session
                    .stack
                    .replace_top(Frame::new(StateId::Welcome, StartData::None))?;
                Ok(None)
            }
            TransitionOp::StartWorkflow | TransitionOp::BackToList => {
                session
                    .stack
                    .replace_from_bottom(Frame::new(StateId::MovieList, StartData::None));
                Ok(None)
            }
            TransitionOp::RestartLanguage => {
                session.stack.replace_from_bottom(Frame::initial());
                Ok(None)
            }
            TransitionOp::OpenDetails(movie_id) => {
                session
                    .stack
                    .push(Frame::new(StateId::MovieDetails, StartData::Movie { movie_id }));
                Ok(None)
            }
            TransitionOp::CaptureSearch(query) => {
                session
                    .stack
                    .push(Frame::new(StateId::SearchAdd, StartData::Search { query }));
                Ok(None)
            }
            TransitionOp::BrowseGenres => {
                session
                    .stack
                    .push(Frame::new(StateId::GenrePicker, StartData::None));
                Ok(None)
            }
            TransitionOp::AddMovie(movie_id) => {
                self.cx.catalog.add_movie_to_user(user_id, movie_id).await?;
                debug!(user_id, movie_id, "movie added");
                session
                    .stack
                    .replace_from_bottom(Frame::new(StateId::MovieList, StartData::None));
                Ok(None)
            }
            TransitionOp::DeleteMovie => {
                let movie_id = top_movie_id(session)?;
                self.cx
                    .catalog
                    .remove_movie_from_user(user_id, movie_id)
                    .await?;
                debug!(user_id, movie_id, "movie removed");
                session
                    .stack
                    .replace_from_bottom(Frame::new(StateId::MovieList, StartData::None));
                Ok(None)
            }
            TransitionOp::ToggleWatched => {
                let movie_id = top_movie_id(session)?;
                let meta = self.cx.catalog.movie_meta(user_id, movie_id).await?;
                if meta.watched {
                    // Unwatching deliberately discards the personal
                    // rating and review for the pair.
                    self.cx.catalog.set_watched(user_id, movie_id, false).await?;
                    self.cx.catalog.clear_review(user_id, movie_id).await?;
                    debug!(user_id, movie_id, "movie unwatched, review cleared");
                } else {
                    self.cx.catalog.set_watched(user_id, movie_id, true).await?;
                    session
                        .stack
                        .push(Frame::new(StateId::ReviewPrompt, StartData::Movie { movie_id }));
                }
                Ok(None)
            }
            TransitionOp::BeginReview => {
                let movie_id = top_movie_id(session)?;
                // The review flow is a digression from the details view,
                // not a parent of it: reset with the movie carried along.
                session.stack.replace_from_bottom(Frame::new(
                    StateId::RatingPicker,
                    StartData::Movie { movie_id },
                ));
                Ok(None)
            }
            TransitionOp::DeclineReview | TransitionOp::CancelReview => {
                let movie_id = top_movie_id(session)?;
                session.stack.replace_from_bottom(Frame::new(
                    StateId::MovieDetails,
                    StartData::Movie { movie_id },
                ));
                Ok(None)
            }
            TransitionOp::PickRating(rating) => {
                let movie_id = top_movie_id(session)?;
                let mut frame =
                    Frame::new(StateId::ReviewText, StartData::Movie { movie_id });
                frame.local = LocalData::ReviewText { rating };
                session.stack.replace_top(frame)?;
                Ok(None)
            }
            TransitionOp::CaptureRating(text) => match text.trim().parse::<u8>() {
                Ok(rating) if (1..=10).contains(&rating) => {
                    Box::pin(self.apply(session, TransitionOp::PickRating(rating))).await
                }
                _ => Ok(Some(Notice::error(
                    self.cx
                        .localizer
                        .get(session.locale, MessageKey::InvalidRating),
                ))),
            },
            TransitionOp::SubmitReview(text) => {
                let movie_id = top_movie_id(session)?;
                let rating = match session.stack.top()?.local {
                    LocalData::ReviewText { rating } => rating,
                    _ => {
                        return Err(CinetrackError::internal(
                            "review text submitted without a picked rating",
                        ))
                    }
                };
                self.cx
                    .catalog
                    .set_review(user_id, movie_id, rating, text)
                    .await?;
                debug!(user_id, movie_id, rating, "review stored");
                session.stack.replace_from_bottom(Frame::new(
                    StateId::MovieDetails,
                    StartData::Movie { movie_id },
                ));
                Ok(None)
            }
            TransitionOp::ToggleGenre(genre_id) => {
                let max = self.config.max_genre_selection;
                let locale = session.locale;
                if let LocalData::GenrePicker { selected } = &mut session.stack.top_mut()?.local {
                    if let Some(position) = selected.iter().position(|id| *id == genre_id) {
                        selected.remove(position);
                    } else if selected.len() >= max {
                        // Selection set stays unchanged
                        return Ok(Some(Notice::error(self.cx.localizer.format(
                            locale,
                            MessageKey::GenreLimitReached,
                            &[("max", max.to_string())],
                        ))));
                    } else {
                        selected.push(genre_id);
                    }
                }
                Ok(None)
            }
            TransitionOp::ConfirmGenres => {
                let selected = match &session.stack.top()?.local {
                    LocalData::GenrePicker { selected } => selected.clone(),
                    _ => Vec::new(),
                };
                if selected.is_empty() {
                    return Ok(Some(Notice::error(
                        self.cx
                            .localizer
                            .get(session.locale, MessageKey::EmptyGenreSelection),
                    )));
                }
                session.stack.push(Frame::new(
                    StateId::GenreResults,
                    StartData::Genres {
                        genre_ids: selected,
                    },
                ));
                Ok(None)
            }
            TransitionOp::LeaveResults => {
                session.stack.pop()?;
                Ok(None)
            }
        }
    }

    /// `Mutate` for the pagination arrows: circular step against the page
    /// count cached from the last render.
    fn turn_page(&self, session: &mut Session, direction: PageDirection) -> Result<Option<Notice>> {
        match &mut session.stack.top_mut()?.local {
            LocalData::MovieList {
                current_page,
                page_count,
                ..
            }
            | LocalData::SearchResults {
                current_page,
                page_count,
            }
            | LocalData::GenreResults {
                current_page,
                page_count,
            } => {
                *current_page = advance(*current_page, *page_count, direction);
            }
            _ => {}
        }
        Ok(None)
    }

    /// Fallback render when a loader failed or timed out: the static view
    /// shell with an error notice, navigational position preserved.
    fn degraded(&self, session: &Session, state: StateId) -> RenderModel {
        let flags = RenderFlags {
            is_empty: true,
            ..Default::default()
        };
        let mut model = match self.registry.get(state) {
            Ok(view) => view.render(self.cx.localizer.as_ref(), session.locale, &flags),
            Err(_) => RenderModel::new(state, String::new()),
        };
        model.notice = Some(Notice::error(
            self.cx
                .localizer
                .get(session.locale, MessageKey::LoaderFailedNotice),
        ));
        model
    }

    /// Slices a list-shaped render model to its current page.
    fn paginate(&self, model: &mut RenderModel) {
        if let Some(list) = model.list.as_mut() {
            let window = PageWindow::new(list.rows.len(), self.config.page_size, list.current_page);
            list.rows = list.rows[window.start..window.end].to_vec();
            list.current_page = window.current_page;
            model.page = Some(PageInfo::from(window));
        }
    }
}

/// Writes the freshly computed paging position back into the top frame,
/// so the next arrow press wraps against an up-to-date page count.
fn sync_page_state(session: &mut Session, page: PageInfo) {
    if let Ok(frame) = session.stack.top_mut() {
        match &mut frame.local {
            LocalData::MovieList {
                current_page,
                page_count,
                ..
            }
            | LocalData::SearchResults {
                current_page,
                page_count,
            }
            | LocalData::GenreResults {
                current_page,
                page_count,
            } => {
                *current_page = page.current_page;
                *page_count = page.page_count;
            }
            _ => {}
        }
    }
}

fn top_movie_id(session: &Session) -> Result<u64> {
    session
        .stack
        .top()?
        .movie_id()
        .ok_or_else(|| CinetrackError::internal("frame carries no movie id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MovieUserMeta, SavedMovie};
    use crate::error::Result;
    use crate::event::Action;
    use crate::locale::{Language, MessageArgs};
    use crate::metadata::{Genre, MovieInfo, MovieSummary};
    use crate::session::{SessionLease, SortField, SortOrder};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    // ------------------------------------------------------------------
    // Mock collaborators
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct MockSessionRepository {
        sessions: Mutex<HashMap<i64, Session>>,
        unavailable: AtomicBool,
        saves: Mutex<u32>,
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepository {
        async fn load(&self, user_id: i64) -> Result<Option<Session>> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(CinetrackError::store_unavailable("backing store down"));
            }
            Ok(self.sessions.lock().unwrap().get(&user_id).cloned())
        }

        async fn save(&self, session: &Session) -> Result<()> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(CinetrackError::store_unavailable("backing store down"));
            }
            *self.saves.lock().unwrap() += 1;
            self.sessions
                .lock()
                .unwrap()
                .insert(session.user_id, session.clone());
            Ok(())
        }

        async fn clear(&self, user_id: i64) -> Result<()> {
            self.sessions.lock().unwrap().remove(&user_id);
            Ok(())
        }
    }

    struct NoopLocks;

    #[async_trait]
    impl SessionLockProvider for NoopLocks {
        async fn acquire(&self, _user_id: i64) -> Result<SessionLease> {
            Ok(SessionLease::new(()))
        }
    }

    #[derive(Default)]
    struct MockCatalog {
        movies: Mutex<HashMap<(i64, u64), MovieUserMeta>>,
    }

    impl MockCatalog {
        fn seed(&self, user_id: i64, movie_ids: &[u64]) {
            let mut movies = self.movies.lock().unwrap();
            for (index, movie_id) in movie_ids.iter().enumerate() {
                movies.insert(
                    (user_id, *movie_id),
                    MovieUserMeta {
                        watched: false,
                        rating: None,
                        review: None,
                        added_at: format!("2024-01-{:02}T00:00:00Z", index + 1),
                    },
                );
            }
        }

        fn meta(&self, user_id: i64, movie_id: u64) -> MovieUserMeta {
            self.movies
                .lock()
                .unwrap()
                .get(&(user_id, movie_id))
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl CatalogStore for MockCatalog {
        async fn add_user(&self, _user_id: i64) -> Result<()> {
            Ok(())
        }

        async fn list_user_movies(&self, user_id: i64) -> Result<Vec<SavedMovie>> {
            let movies = self.movies.lock().unwrap();
            let mut saved: Vec<SavedMovie> = movies
                .iter()
                .filter(|((uid, _), _)| *uid == user_id)
                .map(|((_, movie_id), meta)| SavedMovie {
                    movie_id: *movie_id,
                    added_at: meta.added_at.clone(),
                })
                .collect();
            saved.sort_by(|a, b| a.added_at.cmp(&b.added_at));
            Ok(saved)
        }

        async fn add_movie_to_user(&self, user_id: i64, movie_id: u64) -> Result<()> {
            self.movies.lock().unwrap().insert(
                (user_id, movie_id),
                MovieUserMeta {
                    watched: false,
                    rating: None,
                    review: None,
                    added_at: chrono::Utc::now().to_rfc3339(),
                },
            );
            Ok(())
        }

        async fn remove_movie_from_user(&self, user_id: i64, movie_id: u64) -> Result<()> {
            self.movies.lock().unwrap().remove(&(user_id, movie_id));
            Ok(())
        }

        async fn movie_meta(&self, user_id: i64, movie_id: u64) -> Result<MovieUserMeta> {
            self.movies
                .lock()
                .unwrap()
                .get(&(user_id, movie_id))
                .cloned()
                .ok_or_else(|| CinetrackError::not_found("movie", movie_id.to_string()))
        }

        async fn set_watched(&self, user_id: i64, movie_id: u64, watched: bool) -> Result<()> {
            if let Some(meta) = self.movies.lock().unwrap().get_mut(&(user_id, movie_id)) {
                meta.watched = watched;
            }
            Ok(())
        }

        async fn set_review(
            &self,
            user_id: i64,
            movie_id: u64,
            rating: u8,
            review: String,
        ) -> Result<()> {
            if let Some(meta) = self.movies.lock().unwrap().get_mut(&(user_id, movie_id)) {
                meta.rating = Some(rating);
                meta.review = Some(review);
            }
            Ok(())
        }

        async fn clear_review(&self, user_id: i64, movie_id: u64) -> Result<()> {
            if let Some(meta) = self.movies.lock().unwrap().get_mut(&(user_id, movie_id)) {
                meta.rating = None;
                meta.review = None;
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockMetadata {
        failing: AtomicBool,
    }

    #[async_trait]
    impl MetadataProvider for MockMetadata {
        async fn movie(&self, movie_id: u64, _language: Language) -> Result<MovieInfo> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(CinetrackError::loader("metadata", "provider down"));
            }
            Ok(MovieInfo {
                movie_id,
                title: format!("Movie {}", movie_id),
                original_title: format!("Movie {}", movie_id),
                original_language: "en".to_string(),
                release_date: "1999-03-31".to_string(),
                countries: vec!["US".to_string()],
                genres: vec!["Action".to_string()],
                tagline: String::new(),
                runtime: 120,
                overview: "Overview".to_string(),
                vote_average: (movie_id % 10) as f64,
                adult: false,
                poster: None,
            })
        }

        async fn search(&self, _query: &str, _language: Language) -> Result<Vec<MovieSummary>> {
            Ok(vec![MovieSummary {
                movie_id: 603,
                title: "The Matrix".to_string(),
                vote_average: 8.2,
            }])
        }

        async fn movies_by_genres(
            &self,
            _genre_ids: &[u64],
            _language: Language,
        ) -> Result<Vec<MovieSummary>> {
            Ok(Vec::new())
        }

        async fn genres(&self, _language: Language) -> Result<Vec<Genre>> {
            Ok((1..=5u64)
                .map(|genre_id| Genre {
                    genre_id,
                    name: format!("Genre {}", genre_id),
                })
                .collect())
        }
    }

    /// Echoes the message key; tests assert against keys, not phrasing.
    struct KeyLocalizer;

    impl Localizer for KeyLocalizer {
        fn format(&self, _language: Language, key: MessageKey, _args: MessageArgs<'_>) -> String {
            key.to_string()
        }
    }

    struct Harness {
        engine: DialogEngine,
        sessions: Arc<MockSessionRepository>,
        catalog: Arc<MockCatalog>,
        metadata: Arc<MockMetadata>,
    }

    fn harness() -> Harness {
        let sessions = Arc::new(MockSessionRepository::default());
        let catalog = Arc::new(MockCatalog::default());
        let metadata = Arc::new(MockMetadata::default());
        let cx = Collaborators {
            sessions: sessions.clone(),
            locks: Arc::new(NoopLocks),
            catalog: catalog.clone(),
            metadata: metadata.clone(),
            localizer: Arc::new(KeyLocalizer),
        };
        let engine = DialogEngine::new(EngineConfig::default(), cx).unwrap();
        Harness {
            engine,
            sessions,
            catalog,
            metadata,
        }
    }

    /// Drives a fresh session to the movie list.
    async fn open_list(h: &Harness, user_id: i64) {
        h.engine
            .handle(user_id, InboundEvent::text("/start"))
            .await
            .unwrap();
        h.engine
            .handle(user_id, InboundEvent::action("language:en"))
            .await
            .unwrap();
        h.engine
            .handle(user_id, InboundEvent::action("start_workflow"))
            .await
            .unwrap();
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_new_session_starts_at_language_select() {
        let h = harness();
        let model = h.engine.handle(1, InboundEvent::text("hi")).await.unwrap();
        assert_eq!(model.state, StateId::LanguageSelect);
        // Both language actions are rendered
        assert_eq!(model.actions.len(), 2);
    }

    #[tokio::test]
    async fn test_root_flow_reaches_movie_list() {
        let h = harness();
        open_list(&h, 1).await;
        let stored = h.sessions.load(1).await.unwrap().unwrap();
        assert_eq!(stored.stack.depth(), 1);
        assert_eq!(stored.stack.top().unwrap().state, StateId::MovieList);
    }

    #[tokio::test]
    async fn test_store_unavailable_performs_zero_mutations() {
        let h = harness();
        h.sessions.unavailable.store(true, Ordering::SeqCst);

        let err = h.engine.handle(1, InboundEvent::text("hi")).await.unwrap_err();
        assert!(err.is_store_unavailable());
        assert_eq!(*h.sessions.saves.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unmatched_event_is_noop_rerender() {
        let h = harness();
        open_list(&h, 1).await;
        let before = h.sessions.load(1).await.unwrap().unwrap();

        // Unknown action id in the movie list
        let model = h
            .engine
            .handle(1, InboundEvent::action("bogus_action"))
            .await
            .unwrap();
        assert_eq!(model.state, StateId::MovieList);

        let after = h.sessions.load(1).await.unwrap().unwrap();
        assert_eq!(after.stack, before.stack);
    }

    #[tokio::test]
    async fn test_empty_list_renders_single_page_without_pager() {
        let h = harness();
        open_list(&h, 1).await;
        let model = h
            .engine
            .handle(1, InboundEvent::action("bogus"))
            .await
            .unwrap();

        let page = model.page.unwrap();
        assert_eq!(page.page_count, 1);
        assert!(model.list.unwrap().rows.is_empty());
        // Empty list hides every static list action (arrows, sorting)
        assert!(model.actions.is_empty());
        assert_eq!(model.content, MessageKey::NoMovies.to_string());
    }

    #[tokio::test]
    async fn test_pagination_wraps_over_23_movies() {
        let h = harness();
        let ids: Vec<u64> = (101..=123).collect();
        h.catalog.seed(1, &ids);
        open_list(&h, 1).await;

        // Initial render: page 1 of 3, 10 rows
        let model = h.engine.handle(1, InboundEvent::action("bogus")).await.unwrap();
        assert_eq!(model.page.unwrap().page_count, 3);
        assert_eq!(model.list.as_ref().unwrap().rows.len(), 10);

        // Two nexts reach page 3 with the remaining 3 rows
        h.engine.handle(1, InboundEvent::action("arrow_right")).await.unwrap();
        let model = h.engine.handle(1, InboundEvent::action("arrow_right")).await.unwrap();
        assert_eq!(model.page.unwrap().current_page, 3);
        assert_eq!(model.list.as_ref().unwrap().rows.len(), 3);

        // Third next wraps to page 1
        let model = h.engine.handle(1, InboundEvent::action("arrow_right")).await.unwrap();
        assert_eq!(model.page.unwrap().current_page, 1);

        // And one back wraps to the last page again
        let model = h.engine.handle(1, InboundEvent::action("arrow_left")).await.unwrap();
        assert_eq!(model.page.unwrap().current_page, 3);
    }

    #[tokio::test]
    async fn test_sort_toggles_are_mutations() {
        let h = harness();
        h.catalog.seed(1, &[101, 102]);
        open_list(&h, 1).await;

        h.engine.handle(1, InboundEvent::action("sorting_type")).await.unwrap();
        let session = h.sessions.load(1).await.unwrap().unwrap();
        match session.stack.top().unwrap().local {
            LocalData::MovieList {
                sort_field,
                sort_order,
                ..
            } => {
                assert_eq!(sort_field, SortField::DateAdded);
                assert_eq!(sort_order, SortOrder::Descending);
            }
            _ => panic!("movie list frame lost its local data"),
        }
        assert_eq!(session.stack.depth(), 1);
    }

    #[tokio::test]
    async fn test_free_text_captures_search_and_push() {
        let h = harness();
        open_list(&h, 1).await;

        let model = h
            .engine
            .handle(1, InboundEvent::text("the matrix"))
            .await
            .unwrap();
        assert_eq!(model.state, StateId::SearchAdd);

        let session = h.sessions.load(1).await.unwrap().unwrap();
        assert_eq!(session.stack.depth(), 2);
        assert_eq!(
            session.stack.top().unwrap().start,
            StartData::Search {
                query: "the matrix".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_adding_candidate_resets_to_list() {
        let h = harness();
        open_list(&h, 1).await;
        h.engine.handle(1, InboundEvent::text("matrix")).await.unwrap();

        let model = h
            .engine
            .handle(1, InboundEvent::action("add:603"))
            .await
            .unwrap();
        assert_eq!(model.state, StateId::MovieList);

        let session = h.sessions.load(1).await.unwrap().unwrap();
        assert_eq!(session.stack.depth(), 1);
        assert!(h
            .catalog
            .list_user_movies(1)
            .await
            .unwrap()
            .iter()
            .any(|movie| movie.movie_id == 603));
    }

    #[tokio::test]
    async fn test_watch_toggle_pushes_review_prompt() {
        let h = harness();
        h.catalog.seed(1, &[603]);
        open_list(&h, 1).await;
        h.engine.handle(1, InboundEvent::action("movie:603")).await.unwrap();

        let model = h
            .engine
            .handle(1, InboundEvent::action("is_watched"))
            .await
            .unwrap();
        assert_eq!(model.state, StateId::ReviewPrompt);
        assert!(h.catalog.meta(1, 603).watched);
    }

    #[tokio::test]
    async fn test_unwatch_clears_rating_and_review() {
        let h = harness();
        h.catalog.seed(1, &[603]);
        h.catalog.set_watched(1, 603, true).await.unwrap();
        h.catalog
            .set_review(1, 603, 9, "loved it".to_string())
            .await
            .unwrap();

        open_list(&h, 1).await;
        h.engine.handle(1, InboundEvent::action("movie:603")).await.unwrap();
        h.engine.handle(1, InboundEvent::action("is_watched")).await.unwrap();

        let meta = h.catalog.meta(1, 603);
        assert!(!meta.watched);
        assert_eq!(meta.rating, None);
        assert_eq!(meta.review, None);
    }

    #[tokio::test]
    async fn test_watching_preserves_existing_review() {
        let h = harness();
        h.catalog.seed(1, &[603]);
        h.catalog
            .set_review(1, 603, 7, "fine".to_string())
            .await
            .unwrap();

        open_list(&h, 1).await;
        h.engine.handle(1, InboundEvent::action("movie:603")).await.unwrap();
        // unwatched -> watched must not alter the stored review
        h.engine.handle(1, InboundEvent::action("is_watched")).await.unwrap();

        let meta = h.catalog.meta(1, 603);
        assert!(meta.watched);
        assert_eq!(meta.rating, Some(7));
        assert_eq!(meta.review, Some("fine".to_string()));
    }

    #[tokio::test]
    async fn test_full_review_digression() {
        let h = harness();
        h.catalog.seed(1, &[603]);
        open_list(&h, 1).await;
        h.engine.handle(1, InboundEvent::action("movie:603")).await.unwrap();
        h.engine.handle(1, InboundEvent::action("is_watched")).await.unwrap();

        let model = h.engine.handle(1, InboundEvent::action("yes")).await.unwrap();
        assert_eq!(model.state, StateId::RatingPicker);

        // Free-text rating is accepted
        let model = h.engine.handle(1, InboundEvent::text("9")).await.unwrap();
        assert_eq!(model.state, StateId::ReviewText);

        let model = h
            .engine
            .handle(1, InboundEvent::text("a classic"))
            .await
            .unwrap();
        assert_eq!(model.state, StateId::MovieDetails);

        let meta = h.catalog.meta(1, 603);
        assert_eq!(meta.rating, Some(9));
        assert_eq!(meta.review, Some("a classic".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_rating_text_is_rejected_with_notice() {
        let h = harness();
        h.catalog.seed(1, &[603]);
        open_list(&h, 1).await;
        h.engine.handle(1, InboundEvent::action("movie:603")).await.unwrap();
        h.engine.handle(1, InboundEvent::action("is_watched")).await.unwrap();
        h.engine.handle(1, InboundEvent::action("yes")).await.unwrap();

        let model = h.engine.handle(1, InboundEvent::text("eleven")).await.unwrap();
        assert_eq!(model.state, StateId::RatingPicker);
        assert_eq!(
            model.notice.unwrap().text,
            MessageKey::InvalidRating.to_string()
        );
    }

    #[tokio::test]
    async fn test_genre_selection_bounded_with_toggle_semantics() {
        let h = harness();
        open_list(&h, 1).await;
        h.engine
            .handle(1, InboundEvent::text("/movies_on_genre"))
            .await
            .unwrap();

        for genre in ["genre:1", "genre:2", "genre:3"] {
            let model = h.engine.handle(1, InboundEvent::action(genre)).await.unwrap();
            assert!(model.notice.is_none());
        }

        // Fourth selection is rejected, set unchanged at 3
        let model = h.engine.handle(1, InboundEvent::action("genre:4")).await.unwrap();
        assert_eq!(
            model.notice.unwrap().text,
            MessageKey::GenreLimitReached.to_string()
        );
        let session = h.sessions.load(1).await.unwrap().unwrap();
        match &session.stack.top().unwrap().local {
            LocalData::GenrePicker { selected } => assert_eq!(selected, &vec![1, 2, 3]),
            _ => panic!("genre picker frame lost its local data"),
        }

        // Re-selecting toggles off, bringing the count to 2
        h.engine.handle(1, InboundEvent::action("genre:2")).await.unwrap();
        let session = h.sessions.load(1).await.unwrap().unwrap();
        match &session.stack.top().unwrap().local {
            LocalData::GenrePicker { selected } => assert_eq!(selected, &vec![1, 3]),
            _ => panic!("genre picker frame lost its local data"),
        }
    }

    #[tokio::test]
    async fn test_loader_failure_persists_stack_and_degrades_render() {
        let h = harness();
        h.catalog.seed(1, &[603]);
        open_list(&h, 1).await;

        h.metadata.failing.store(true, Ordering::SeqCst);
        let model = h
            .engine
            .handle(1, InboundEvent::action("movie:603"))
            .await
            .unwrap();

        // The push happened and was persisted despite the loader failure
        let session = h.sessions.load(1).await.unwrap().unwrap();
        assert_eq!(session.stack.top().unwrap().state, StateId::MovieDetails);
        assert_eq!(model.state, StateId::MovieDetails);
        assert_eq!(
            model.notice.unwrap().text,
            MessageKey::LoaderFailedNotice.to_string()
        );
    }

    #[tokio::test]
    async fn test_language_restart_resets_stack() {
        let h = harness();
        open_list(&h, 1).await;
        h.engine.handle(1, InboundEvent::text("matrix")).await.unwrap();

        let model = h
            .engine
            .handle(1, InboundEvent::action("go_back"))
            .await
            .unwrap();
        assert_eq!(model.state, StateId::MovieList);

        let model = h
            .engine
            .handle(1, InboundEvent::text("/language"))
            .await
            .unwrap();
        assert_eq!(model.state, StateId::LanguageSelect);
        let session = h.sessions.load(1).await.unwrap().unwrap();
        assert_eq!(session.stack.depth(), 1);
    }
}

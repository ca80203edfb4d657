//! Per-state render-model loaders.
//!
//! A loader produces the data needed to render a given state: it reads the
//! top frame, calls the external collaborators (catalog, metadata) and
//! assembles a [`RenderModel`]. List-shaped loaders fill the full ordered
//! collection; the engine slices it afterwards. Loaders never mutate the
//! stack.

use super::Collaborators;
use crate::error::{CinetrackError, Result};
use crate::event::Action;
use crate::locale::{Localizer, MessageKey};
use crate::metadata::{MovieInfo, MovieSummary};
use crate::session::{LocalData, Session, SortField, SortOrder, StartData, StateId};
use crate::view::{ListView, MediaRef, RenderFlags, RenderModel, RenderedAction, ViewRegistry};

/// Dispatches to the loader registered for `state`.
pub(super) async fn load(
    state: StateId,
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    match state {
        StateId::LanguageSelect
        | StateId::Welcome
        | StateId::ReviewPrompt
        | StateId::ReviewText => load_static(state, session, cx, registry),
        StateId::MovieList => load_movie_list(session, cx, registry).await,
        StateId::SearchAdd => load_search_results(session, cx, registry).await,
        StateId::MovieDetails => load_movie_details(session, cx, registry).await,
        StateId::RatingPicker => load_rating_picker(session, cx, registry),
        StateId::GenrePicker => load_genre_picker(session, cx, registry).await,
        StateId::GenreResults => load_genre_results(session, cx, registry).await,
    }
}

/// States whose render is fully described by their view descriptor.
fn load_static(
    state: StateId,
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    let flags = RenderFlags::default();
    Ok(registry
        .get(state)?
        .render(cx.localizer.as_ref(), session.locale, &flags))
}

async fn load_movie_list(
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    let frame = session.stack.top()?;
    let (current_page, sort_field, sort_order) = match frame.local {
        LocalData::MovieList {
            current_page,
            sort_field,
            sort_order,
            ..
        } => (current_page, sort_field, sort_order),
        _ => (1, SortField::Rating, SortOrder::Descending),
    };

    let saved = cx.catalog.list_user_movies(session.user_id).await?;
    let mut movies: Vec<(MovieInfo, String)> = Vec::with_capacity(saved.len());
    for entry in &saved {
        let info = cx.metadata.movie(entry.movie_id, session.locale).await?;
        movies.push((info, entry.added_at.clone()));
    }
    sort_movies(&mut movies, sort_field, sort_order);

    let flags = RenderFlags {
        is_empty: movies.is_empty(),
        sort_by_rating: sort_field == SortField::Rating,
        sort_descending: sort_order == SortOrder::Descending,
        ..Default::default()
    };
    let mut model = registry
        .get(StateId::MovieList)?
        .render(cx.localizer.as_ref(), session.locale, &flags);

    let rows = movies
        .iter()
        .enumerate()
        .map(|(index, (info, _))| RenderedAction {
            id: Action::SelectMovie(info.movie_id).id(),
            label: format!("{}. {} {}", index + 1, info.title, info.vote_average),
        })
        .collect();
    model.list = Some(ListView { rows, current_page });
    Ok(model)
}

fn sort_movies(movies: &mut [(MovieInfo, String)], field: SortField, order: SortOrder) {
    match field {
        SortField::Rating => movies.sort_by(|a, b| {
            a.0.vote_average
                .partial_cmp(&b.0.vote_average)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        // RFC 3339 timestamps sort lexicographically
        SortField::DateAdded => movies.sort_by(|a, b| a.1.cmp(&b.1)),
    }
    if order == SortOrder::Descending {
        movies.reverse();
    }
}

async fn load_search_results(
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    let frame = session.stack.top()?;
    let query = match &frame.start {
        StartData::Search { query } => query.clone(),
        _ => {
            return Err(CinetrackError::internal(
                "search view without a captured query",
            ))
        }
    };
    let current_page = match frame.local {
        LocalData::SearchResults { current_page, .. } => current_page,
        _ => 1,
    };

    let candidates = cx.metadata.search(&query, session.locale).await?;
    let flags = RenderFlags {
        is_empty: candidates.is_empty(),
        ..Default::default()
    };
    let mut model = registry
        .get(StateId::SearchAdd)?
        .render(cx.localizer.as_ref(), session.locale, &flags);
    model.list = Some(ListView {
        rows: summary_rows(&candidates),
        current_page,
    });
    Ok(model)
}

fn summary_rows(candidates: &[MovieSummary]) -> Vec<RenderedAction> {
    candidates
        .iter()
        .map(|candidate| RenderedAction {
            id: Action::AddMovie(candidate.movie_id).id(),
            label: format!("{} {}", candidate.title, candidate.vote_average),
        })
        .collect()
}

async fn load_movie_details(
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    let frame = session.stack.top()?;
    let movie_id = frame
        .movie_id()
        .ok_or_else(|| CinetrackError::internal("details view without a movie id"))?;

    let info = cx.metadata.movie(movie_id, session.locale).await?;
    let meta = cx.catalog.movie_meta(session.user_id, movie_id).await?;

    let flags = RenderFlags {
        is_watched: meta.watched,
        has_poster: info.poster.is_some(),
        ..Default::default()
    };
    let mut model = registry
        .get(StateId::MovieDetails)?
        .render(cx.localizer.as_ref(), session.locale, &flags);
    model.content = details_content(session, cx, &info);
    model.media = info.poster.as_ref().map(|url| MediaRef { url: url.clone() });
    Ok(model)
}

/// Composes the details text: one line per known field, unknown fields
/// omitted entirely.
fn details_content(session: &Session, cx: &Collaborators, info: &MovieInfo) -> String {
    let localizer = cx.localizer.as_ref();
    let locale = session.locale;
    let get = |key: MessageKey| localizer.get(locale, key);

    let mut lines: Vec<String> = Vec::new();

    let title = if info.original_language != locale.to_string()
        && !info.original_title.is_empty()
        && info.original_title != info.title
    {
        format!("{} {} ({})", get(MessageKey::MovieTitle), info.title, info.original_title)
    } else {
        format!("{} {}", get(MessageKey::MovieTitle), info.title)
    };
    lines.push(title);

    if info.vote_average > 0.0 {
        lines.push(format!("{} {}", get(MessageKey::Rating), info.vote_average));
    }
    if !info.release_date.is_empty() {
        let date = chrono::NaiveDate::parse_from_str(&info.release_date, "%Y-%m-%d")
            .map(|date| date.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|_| info.release_date.clone());
        if info.countries.is_empty() {
            lines.push(format!("{} {}", get(MessageKey::ReleaseDate), date));
        } else {
            lines.push(format!(
                "{} {}, {}",
                get(MessageKey::ReleaseDate),
                date,
                info.countries.join(", ")
            ));
        }
    }
    if info.adult {
        lines.push(get(MessageKey::Adult));
    }
    if !info.genres.is_empty() {
        lines.push(format!(
            "{} {}",
            get(MessageKey::Genres),
            info.genres.join(", ")
        ));
    }
    if info.runtime > 0 {
        lines.push(format!(
            "{} {} {}",
            get(MessageKey::Runtime),
            info.runtime,
            get(MessageKey::Minutes)
        ));
    }
    if !info.tagline.is_empty() {
        lines.push(format!("{} {}", get(MessageKey::Tagline), info.tagline));
    }
    if !info.overview.is_empty() {
        lines.push(format!("{} {}", get(MessageKey::Overview), info.overview));
    }

    lines.join("\n\n")
}

fn load_rating_picker(
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    let flags = RenderFlags::default();
    let mut model = registry
        .get(StateId::RatingPicker)?
        .render(cx.localizer.as_ref(), session.locale, &flags);

    let mut actions: Vec<RenderedAction> = (1..=10u8)
        .map(|rating| RenderedAction {
            id: Action::PickRating(rating).id(),
            label: rating.to_string(),
        })
        .collect();
    actions.append(&mut model.actions);
    model.actions = actions;
    Ok(model)
}

async fn load_genre_picker(
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    let frame = session.stack.top()?;
    let selected = match &frame.local {
        LocalData::GenrePicker { selected } => selected.clone(),
        _ => Vec::new(),
    };

    let genres = cx.metadata.genres(session.locale).await?;
    let flags = RenderFlags::default();
    let mut model = registry
        .get(StateId::GenrePicker)?
        .render(cx.localizer.as_ref(), session.locale, &flags);

    let mut actions: Vec<RenderedAction> = genres
        .iter()
        .map(|genre| RenderedAction {
            id: Action::SelectGenre(genre.genre_id).id(),
            label: if selected.contains(&genre.genre_id) {
                format!("✓ {}", genre.name)
            } else {
                genre.name.clone()
            },
        })
        .collect();
    actions.append(&mut model.actions);
    model.actions = actions;
    Ok(model)
}

async fn load_genre_results(
    session: &Session,
    cx: &Collaborators,
    registry: &ViewRegistry,
) -> Result<RenderModel> {
    let frame = session.stack.top()?;
    let genre_ids = match &frame.start {
        StartData::Genres { genre_ids } => genre_ids.clone(),
        _ => {
            return Err(CinetrackError::internal(
                "genre results without a confirmed selection",
            ))
        }
    };
    let current_page = match frame.local {
        LocalData::GenreResults { current_page, .. } => current_page,
        _ => 1,
    };

    let matches = cx
        .metadata
        .movies_by_genres(&genre_ids, session.locale)
        .await?;
    let flags = RenderFlags {
        is_empty: matches.is_empty(),
        ..Default::default()
    };
    let mut model = registry
        .get(StateId::GenreResults)?
        .render(cx.localizer.as_ref(), session.locale, &flags);
    model.list = Some(ListView {
        rows: summary_rows(&matches),
        current_page,
    });
    Ok(model)
}

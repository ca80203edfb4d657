//! Render models: the transport-agnostic output of a state's loader.

use crate::pagination::PageWindow;
use crate::session::StateId;
use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Info,
    Error,
}

/// A transient, auto-dismissing notice shown alongside a render.
///
/// Loader failures and rejected inputs surface here while preserving the
/// user's navigational position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            text: text.into(),
        }
    }
}

/// One selectable action as rendered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedAction {
    pub id: String,
    pub label: String,
}

/// Reference to a media attachment (poster image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub url: String,
}

/// The list-shaped part of a render model, before the engine slices it.
///
/// Loaders fill `rows` with the complete ordered collection; the engine
/// applies circular pagination and replaces `rows` with the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListView {
    pub rows: Vec<RenderedAction>,
    pub current_page: usize,
}

/// Displayed paging position, derived after slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub page_count: usize,
}

impl From<PageWindow> for PageInfo {
    fn from(window: PageWindow) -> Self {
        Self {
            current_page: window.current_page,
            page_count: window.display_page_count(),
        }
    }
}

/// The abstract output of one handled event, ready for presentation.
///
/// The transport turns this into actual messages or edits; the core only
/// declares intent via `replace_previous`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub state: StateId,
    pub content: String,
    pub actions: Vec<RenderedAction>,
    pub media: Option<MediaRef>,
    pub replace_previous: bool,
    pub notice: Option<Notice>,
    pub list: Option<ListView>,
    pub page: Option<PageInfo>,
}

impl RenderModel {
    /// A minimal render for `state` with the given content.
    pub fn new(state: StateId, content: impl Into<String>) -> Self {
        Self {
            state,
            content: content.into(),
            actions: Vec::new(),
            media: None,
            replace_previous: true,
            notice: None,
            list: None,
            page: None,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    /// Whether the model declares itself list-shaped.
    pub fn is_list_shaped(&self) -> bool {
        self.list.is_some()
    }
}

/// Facts about the rendered data that action visibility predicates are
/// evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderFlags {
    pub is_empty: bool,
    pub is_watched: bool,
    pub sort_by_rating: bool,
    pub sort_descending: bool,
    pub has_poster: bool,
}

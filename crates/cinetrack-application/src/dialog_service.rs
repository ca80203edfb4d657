//! Dialog service wiring.
//!
//! `DialogService` assembles the dialog engine with concrete
//! infrastructure and exposes the two entry points a transport adapter
//! needs: one for free text, one for selected actions. The transport layer
//! (a chat bot frontend, a test harness) owns message delivery; this layer
//! owns everything between an inbound event and a render model.

use cinetrack_core::catalog::CatalogStore;
use cinetrack_core::config::EngineConfig;
use cinetrack_core::engine::{Collaborators, DialogEngine};
use cinetrack_core::error::Result;
use cinetrack_core::event::InboundEvent;
use cinetrack_core::locale::Localizer;
use cinetrack_core::metadata::MetadataProvider;
use cinetrack_core::session::{SessionLockProvider, SessionRepository};
use cinetrack_core::view::RenderModel;
use cinetrack_infrastructure::{
    DirSessionRepository, FileCatalogStore, FileMetadataProvider, InProcessSessionLocks,
    TableLocalizer,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct DialogService {
    engine: DialogEngine,
}

impl DialogService {
    /// Wires a service from explicit collaborators.
    ///
    /// Fails fast when the state machine is internally inconsistent, so a
    /// misconfigured deployment aborts at startup instead of at the first
    /// user event.
    pub fn new(
        config: EngineConfig,
        sessions: Arc<dyn SessionRepository>,
        locks: Arc<dyn SessionLockProvider>,
        catalog: Arc<dyn CatalogStore>,
        metadata: Arc<dyn MetadataProvider>,
        localizer: Arc<dyn Localizer>,
    ) -> Result<Self> {
        let engine = DialogEngine::new(
            config,
            Collaborators {
                sessions,
                locks,
                catalog,
                metadata,
                localizer,
            },
        )?;
        info!("dialog service initialized");
        Ok(Self { engine })
    }

    /// Wires a file-backed service rooted at `data_dir`, with the movie
    /// metadata catalog at `metadata_path`.
    pub fn file_backed(
        config: EngineConfig,
        data_dir: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        Self::new(
            config,
            Arc::new(DirSessionRepository::new(data_dir.join("sessions"))?),
            Arc::new(InProcessSessionLocks::new()),
            Arc::new(FileCatalogStore::new(data_dir.join("catalog.toml"))),
            Arc::new(FileMetadataProvider::from_file(metadata_path)?),
            Arc::new(TableLocalizer::new()),
        )
    }

    /// Handles a free-text message from `user_id`.
    pub async fn handle_text(&self, user_id: i64, text: impl Into<String>) -> Result<RenderModel> {
        self.engine.handle(user_id, InboundEvent::text(text)).await
    }

    /// Handles a selected action from `user_id`.
    pub async fn handle_action(&self, user_id: i64, action_id: impl Into<String>) -> Result<RenderModel> {
        self.engine
            .handle(user_id, InboundEvent::action(action_id))
            .await
    }
}

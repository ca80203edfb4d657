pub mod config_loader;
pub mod dir_session_repository;
pub mod file_catalog_store;
pub mod file_metadata_provider;
pub mod locks;
pub mod memory;
pub mod paths;
pub mod storage;
pub mod table_localizer;

pub use dir_session_repository::DirSessionRepository;
pub use file_catalog_store::FileCatalogStore;
pub use file_metadata_provider::FileMetadataProvider;
pub use locks::InProcessSessionLocks;
pub use memory::{MemoryCatalogStore, MemorySessionRepository};
pub use paths::CinetrackPaths;
pub use table_localizer::TableLocalizer;

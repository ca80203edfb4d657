pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod locale;
pub mod metadata;
pub mod pagination;
pub mod session;
pub mod view;

// Re-export common error type
pub use error::{CinetrackError, Result};

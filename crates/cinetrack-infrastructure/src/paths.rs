//! Unified path management for cinetrack data files.
//!
//! All durable state lives under a single base directory so a deployment
//! can be backed up or wiped as one unit.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.local/share/cinetrack/    # Data directory
//! ├── config.toml              # Engine configuration
//! ├── sessions/                # One TOML file per user session
//! │   └── <user_id>.toml
//! └── catalog.toml             # Per-user saved movies
//! ```

use cinetrack_core::error::{CinetrackError, Result};
use std::path::PathBuf;

/// Unified path resolution for cinetrack.
pub struct CinetrackPaths;

impl CinetrackPaths {
    /// Returns the cinetrack data directory, e.g. `~/.local/share/cinetrack`.
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join("cinetrack"))
            .ok_or_else(|| CinetrackError::config("Cannot determine the platform data directory"))
    }

    /// Returns the directory holding per-user session files.
    pub fn sessions_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("sessions"))
    }

    /// Returns the path of the engine configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    /// Returns the path of the catalog file.
    pub fn catalog_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("catalog.toml"))
    }
}

//! Session domain module.
//!
//! This module contains the session model, the navigation stack and the
//! persistence/locking traits the dialog engine depends on.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `frame`: Stack frames (`Frame`, `StateId`, `StartData`, `LocalData`)
//! - `stack`: The per-user navigation stack (`NavigationStack`)
//! - `repository`: Persistence and locking traits

mod frame;
mod model;
mod repository;
mod stack;

// Re-export public API
pub use frame::{Frame, LocalData, SortField, SortOrder, StartData, StateId};
pub use model::Session;
pub use repository::{SessionLease, SessionLockProvider, SessionRepository};
pub use stack::NavigationStack;

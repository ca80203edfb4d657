//! Application layer for cinetrack.
//!
//! Wires the dialog engine to concrete infrastructure and exposes the
//! transport-facing entry points.

pub mod dialog_service;

pub use dialog_service::DialogService;

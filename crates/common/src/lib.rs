//! `wc-common` -- Shared types, errors, and configuration for the wordcut
//! transcript editor.
//!
//! This crate is the foundation that all other editor crates depend on.
//! It defines:
//!
//! - **Types**: `TimeCode`, `FocusPoint`, `ZoomLevel`, `ZoomId`, `SessionId` (newtypes for safety)
//! - **Errors**: `EditorError`, `SelectionError`, `PlaybackError`, `ServiceError` (thiserror-based)
//! - **Config**: `EditorConfig`, `ZoomConfig`, `MatchConfig`, `TimelineConfig`

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{EditorConfig, MatchConfig, TimelineConfig, ZoomConfig};
pub use error::{EditorError, EditorResult, PlaybackError, SelectionError, ServiceError};
pub use types::{FocusPoint, SessionId, TimeCode, ZoomId, ZoomLevel};

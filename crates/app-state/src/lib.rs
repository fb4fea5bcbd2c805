//! `wc-app-state` -- Editor state management for the wordcut transcript editor.
//!
//! This crate provides:
//!
//! - **`AppState`**: Central state container holding the transcript, cut selections, zoom events and session.
//! - **`SelectionManager`**: Cut selections over transcript index ranges.
//! - **`ZoomRecorder` / `ZoomEventSet`**: Zoom gesture recording and committed events.
//! - **`ZoomViewport`**: Live zoom level and focus driven by wheel, drag and click.
//! - **`Synchronizer`**: Keeps the original and preview players, transcript highlight and cursor consistent.
//!
//! # Architecture
//!
//! ```text
//! AppState (central state)
//! ├── transcript: Transcript            (original timeline)
//! ├── selections: SelectionManager      (cuts, insertion order)
//! ├── zoom_events: ZoomEventSet         (committed gestures)
//! ├── remapper / adjusted / cut_mask    (rebuilt on every selection change)
//! └── session, edited_file, preview_file
//!
//! Synchronizer<P: MediaPlayer>
//! ├── original: P   ──┐
//! ├── preview:  P   ──┴── only the active surface drives
//! └── display: DisplayState {highlighted, cursor}
//! ```

pub mod playback;
pub mod selection;
pub mod state;
pub mod sync;
pub mod viewport;
pub mod zoom;

// Re-export primary types at crate root for convenience.
pub use playback::{MediaPlayer, PlaybackMode, PlayerEvent, Surface, SurfaceState};
pub use selection::{CutSelection, SelectionManager};
pub use state::{AppState, SessionInfo};
pub use sync::{DisplayState, Synchronizer};
pub use viewport::{ZoomMode, ZoomViewport};
pub use zoom::{RecorderState, ZoomEvent, ZoomEventSet, ZoomRecorder};

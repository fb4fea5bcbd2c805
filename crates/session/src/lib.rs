//! `wc-session` -- Remote editing service integration and the editor controller.
//!
//! - **Service contracts**: [`EditService`] with its request/reply shapes
//!   (upload/transcribe, edit, preview-cuts, cleanup)
//! - **Worker**: [`ServiceWorker`] runs service calls on a background thread
//!   and hands completions back over a channel
//! - **Debouncer**: [`PreviewDebouncer`] restarts a quiet period on every edit
//! - **Controller**: [`EditorController`] applies user actions and service
//!   completions to the editor state and both players
//!
//! ```text
//! presentation ──actions──> EditorController ──requests──> ServiceWorker ──> EditService
//!      ^                        │      ^                         │
//!      └──── DisplayState ──────┘      └────── completions ──────┘  (tick)
//! ```

pub mod controller;
pub mod debounce;
pub mod service;
pub mod worker;

pub use controller::{EditorController, StatusLevel, StatusMessage, FRAME_STEP_SECS, SKIP_SECS};
pub use debounce::PreviewDebouncer;
pub use service::{
    media_url, parse_reply, CleanupReply, EditOutcome, EditReply, EditRequest, EditService, UploadOutcome,
    UploadReply, UploadRequest,
};
pub use worker::{ServiceCompletion, ServiceRequest, ServiceWorker};

//! Central error types for the editor (thiserror-based).

use thiserror::Error;

/// Top-level editor error.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cut-selection errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Transcript is empty")]
    EmptyTranscript,

    #[error("Transcript index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Selection covers an empty interval: {start}s..{end}s")]
    EmptyInterval { start: f64, end: f64 },

    #[error("Selection {start}s..{end}s overlaps existing selection {existing_start}s..{existing_end}s")]
    Overlap {
        start: f64,
        end: f64,
        existing_start: f64,
        existing_end: f64,
    },

    #[error("No selection at position {position}")]
    NotFound { position: usize },
}

/// Player/surface errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("No preview video is available")]
    PreviewUnavailable,
}

/// Errors from the remote upload/edit/preview/cleanup services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{operation} rejected: {reason}")]
    Rejected { operation: String, reason: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("No active session")]
    NoSession,

    #[error("No selections or zoom events to apply")]
    NothingToEdit,

    #[error("{operation} already in progress")]
    InProgress { operation: String },

    #[error("Service worker is not running")]
    WorkerUnavailable,

    #[error("Malformed reply: {0}")]
    MalformedReply(String),
}

impl ServiceError {
    pub fn rejected(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

//! Contracts of the remote editing service: upload/transcribe, edit,
//! preview-cuts and cleanup.
//!
//! Requests and replies use the service's JSON shapes. Replies carry a
//! `success` flag and an optional `error`; [`UploadReply::into_outcome`] and
//! [`EditReply::into_outcome`] turn them into typed outcomes or a
//! [`ServiceError`].

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wc_app_state::{AppState, CutSelection, SessionInfo, ZoomEvent};
use wc_common::{ServiceError, SessionId};
use wc_transcript::{RawTranscriptEntry, Transcript};

/// The remote editing service.
///
/// Calls block; the [`ServiceWorker`](crate::worker::ServiceWorker) runs
/// them off the UI thread.
pub trait EditService: Send + 'static {
    /// Upload a video and transcribe it.
    fn upload(&mut self, request: &UploadRequest) -> Result<UploadReply, ServiceError>;

    /// Apply cuts and zoom events, producing the final and preview files.
    fn edit(&mut self, request: &EditRequest) -> Result<EditReply, ServiceError>;

    /// Produce only a preview of the current cuts. May be served from cache.
    fn preview_cuts(&mut self, request: &EditRequest) -> Result<EditReply, ServiceError>;

    /// Delete every server-side artifact of the session.
    fn cleanup(&mut self, session: &SessionId) -> Result<CleanupReply, ServiceError>;
}

/// URL path under which the service serves a session's video files.
pub fn media_url(session: &SessionId, file: &str) -> String {
    format!("/video/{}/{}", session, file)
}

/// Parse a JSON reply body.
pub fn parse_reply<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T, ServiceError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(operation, error = %e, "Unparseable service reply");
        ServiceError::MalformedReply(format!("{operation}: {e}"))
    })
}

fn check_success(operation: &str, success: bool, error: Option<String>) -> Result<(), ServiceError> {
    match (success, error) {
        (true, _) => Ok(()),
        (false, Some(reason)) => Err(ServiceError::rejected(operation, reason)),
        (false, None) => Err(ServiceError::rejected(operation, "no reason given")),
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub path: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub transcript: Vec<RawTranscriptEntry>,
}

/// A successful upload: the new session and its transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadOutcome {
    pub session: SessionInfo,
    pub transcript: Transcript,
}

impl UploadReply {
    pub fn into_outcome(self) -> Result<UploadOutcome, ServiceError> {
        check_success("Upload", self.success, self.error)?;
        let session_id = self
            .session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::MalformedReply("Upload: missing session_id".into()))?;
        let filename = self
            .filename
            .ok_or_else(|| ServiceError::MalformedReply("Upload: missing filename".into()))?;

        Ok(UploadOutcome {
            session: SessionInfo {
                id: SessionId::new(session_id),
                filename,
            },
            transcript: Transcript::from_wire(&self.transcript),
        })
    }
}

// ---------------------------------------------------------------------------
// Edit / preview-cuts
// ---------------------------------------------------------------------------

/// Body of an edit or preview-cuts request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    pub session_id: SessionId,
    pub filename: String,
    /// Sorted ascending by start.
    pub selections: Vec<CutSelection>,
    pub zoom_events: Vec<ZoomEvent>,
    pub preview_only: bool,
}

impl EditRequest {
    /// Snapshot the current edits for `session`.
    pub fn from_state(session: &SessionInfo, state: &AppState, preview_only: bool) -> Self {
        Self {
            session_id: session.id.clone(),
            filename: session.filename.clone(),
            selections: state.selections().sorted_by_start(),
            zoom_events: state.zoom_events().sorted_by_start(),
            preview_only,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty() && self.zoom_events.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub edited_file: Option<String>,
    #[serde(default)]
    pub preview_file: Option<String>,
    #[serde(default)]
    pub cached: Option<bool>,
}

/// Files produced by an edit or preview-cuts call.
#[derive(Clone, Debug, PartialEq)]
pub struct EditOutcome {
    /// Only present for a full edit.
    pub edited_file: Option<String>,
    pub preview_file: String,
    /// The preview was served from the service's cache.
    pub cached: bool,
}

impl EditReply {
    /// Validate the reply. A full edit (`preview_only == false`) must name
    /// an edited file; both kinds must name a preview file.
    pub fn into_outcome(self, preview_only: bool) -> Result<EditOutcome, ServiceError> {
        let operation = if preview_only { "Preview" } else { "Edit" };
        check_success(operation, self.success, self.error)?;

        let preview_file = self
            .preview_file
            .ok_or_else(|| ServiceError::MalformedReply(format!("{operation}: missing preview_file")))?;
        if !preview_only && self.edited_file.is_none() {
            return Err(ServiceError::MalformedReply("Edit: missing edited_file".into()));
        }

        Ok(EditOutcome {
            edited_file: self.edited_file,
            preview_file,
            cached: self.cached.unwrap_or(false),
        })
    }
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanupReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl CleanupReply {
    pub fn into_outcome(self) -> Result<(), ServiceError> {
        check_success("Cleanup", self.success, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wc_app_state::ZoomEventSet;
    use wc_common::{FocusPoint, TimeCode, ZoomId, ZoomLevel};
    use wc_transcript::TranscriptItem;

    #[test]
    fn upload_reply_parses() {
        let body = r#"{
            "success": true,
            "session_id": "4f1c",
            "filename": "talk.mp4",
            "transcript": [
                {"word": "Hello", "start": 0.0, "end": 0.4},
                {"word": "[silence]", "start": 0.4, "end": 1.6, "is_silence": true, "duration": 1.2}
            ]
        }"#;
        let outcome = parse_reply::<UploadReply>("Upload", body).unwrap().into_outcome().unwrap();
        assert_eq!(outcome.session.id.as_str(), "4f1c");
        assert_eq!(outcome.session.filename, "talk.mp4");
        assert_eq!(outcome.transcript.len(), 2);
        assert!(outcome.transcript.items()[1].is_silence());
    }

    #[test]
    fn rejected_reply_keeps_reason() {
        let body = r#"{"error": "Missing required data"}"#;
        let err = parse_reply::<EditReply>("Edit", body).unwrap().into_outcome(false).unwrap_err();
        assert_eq!(err, ServiceError::rejected("Edit", "Missing required data"));
    }

    #[test]
    fn malformed_replies() {
        assert!(matches!(
            parse_reply::<EditReply>("Edit", "<html>"),
            Err(ServiceError::MalformedReply(_))
        ));

        let reply = EditReply {
            success: true,
            preview_file: Some("preview_talk.mp4".into()),
            ..Default::default()
        };
        assert!(matches!(reply.clone().into_outcome(false), Err(ServiceError::MalformedReply(_))));
        let outcome = reply.into_outcome(true).unwrap();
        assert!(!outcome.cached);
        assert!(outcome.edited_file.is_none());

        let upload = UploadReply {
            success: true,
            filename: Some("talk.mp4".into()),
            ..Default::default()
        };
        assert!(matches!(upload.into_outcome(), Err(ServiceError::MalformedReply(_))));
    }

    #[test]
    fn edit_request_is_sorted_and_snake_case() {
        let mut state = AppState::new();
        state.load_session(
            SessionInfo {
                id: SessionId::new("s1"),
                filename: "talk.mp4".into(),
            },
            Transcript::new(vec![
                TranscriptItem::word("a", 0.0, 1.0),
                TranscriptItem::word("b", 1.0, 2.0),
                TranscriptItem::word("c", 2.0, 3.0),
            ]),
        );
        state.add_selection(2, 2).unwrap();
        state.add_selection(0, 0).unwrap();
        state.commit_zoom(ZoomEvent {
            id: ZoomId::next(),
            start_time: TimeCode::from_secs(1.0),
            end_time: TimeCode::from_secs(2.0),
            start_zoom_level: ZoomLevel::MIN,
            end_zoom_level: ZoomLevel::new(2.0),
            focus_point: FocusPoint::CENTER,
        });

        let Some(session) = state.session().cloned() else {
            panic!("session should be loaded");
        };
        let request = EditRequest::from_state(&session, &state, true);
        assert_eq!(request.selections[0].start_index, 0);
        assert_eq!(request.selections[1].start_index, 2);
        assert!(!request.is_empty());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["preview_only"], true);
        assert_eq!(json["selections"][0]["startIdx"], 0);
        assert_eq!(json["zoom_events"][0]["endZoomLevel"], 2.0);

        let empty = EditRequest {
            selections: Vec::new(),
            zoom_events: ZoomEventSet::new().sorted_by_start(),
            ..request
        };
        assert!(empty.is_empty());
    }

    #[test]
    fn cleanup_and_media_url() {
        assert!(CleanupReply { success: true, error: None }.into_outcome().is_ok());
        assert!(CleanupReply::default().into_outcome().is_err());
        assert_eq!(media_url(&SessionId::new("abc"), "preview_talk.mp4"), "/video/abc/preview_talk.mp4");
    }
}

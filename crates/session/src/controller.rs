//! Editor controller.
//!
//! `EditorController` is the single entry point the presentation layer talks
//! to. It owns the [`AppState`], both players (through the [`Synchronizer`]),
//! the zoom recorder and viewport, the preview debouncer and the service
//! worker. Every user action and every service completion is applied here,
//! on the caller's thread, and runs to completion before the next one.
//!
//! Service calls never block: they are submitted to the worker and their
//! completions are applied from [`tick`](EditorController::tick).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use wc_app_state::{
    AppState, CutSelection, DisplayState, MediaPlayer, PlayerEvent, Surface, Synchronizer, ZoomEvent,
    ZoomMode, ZoomRecorder, ZoomViewport,
};
use wc_common::{
    EditorConfig, EditorResult, FocusPoint, PlaybackError, SelectionError, ServiceError, SessionId, TimeCode,
    ZoomId,
};
use wc_timeline::{scale_markers, CutOverlay, CutSavings, Remapper, ScaleMarker};
use wc_transcript::{map_adjusted_to_original, span_for_window, TranscriptItem};

use crate::debounce::PreviewDebouncer;
use crate::service::{media_url, EditOutcome, EditRequest, EditService, UploadOutcome, UploadRequest};
use crate::worker::{ServiceCompletion, ServiceRequest, ServiceWorker};

/// Skip distance of the skip-forward/back hotkeys.
pub const SKIP_SECS: f64 = 5.0;
/// Step of the frame-step hotkeys (one frame at ~30 fps).
pub const FRAME_STEP_SECS: f64 = 0.033;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// User-visible status message.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

/// Remote operations currently running. A running edit or preview keeps
/// the cuts its request was built from.
#[derive(Debug, Default)]
struct InFlight {
    upload: bool,
    edit: Option<Remapper>,
    preview: Option<Remapper>,
    cleanup: bool,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct EditorController<P: MediaPlayer> {
    config: EditorConfig,
    state: AppState,
    sync: Synchronizer<P>,
    recorder: ZoomRecorder,
    viewport: ZoomViewport,
    worker: ServiceWorker,
    debouncer: PreviewDebouncer,
    status: Option<StatusMessage>,
    in_flight: InFlight,
    /// Bumped on every selection or zoom mutation.
    revision: u64,
    /// Switch to the preview surface once the pending preview arrives.
    show_preview_when_ready: bool,
}

impl<P: MediaPlayer> EditorController<P> {
    /// Create a controller, spawning a worker thread for `service`.
    pub fn new<S: EditService>(config: EditorConfig, original: P, preview: P, service: S) -> anyhow::Result<Self> {
        let worker = ServiceWorker::spawn(service)?;
        Ok(Self::with_worker(config, original, preview, worker))
    }

    pub fn with_worker(config: EditorConfig, original: P, preview: P, worker: ServiceWorker) -> Self {
        tracing::info!(
            auto_preview = config.auto_preview,
            debounce_ms = config.preview_debounce_ms,
            "Editor controller initialized"
        );
        Self {
            recorder: ZoomRecorder::new(&config.zoom),
            viewport: ZoomViewport::new(config.zoom.clone()),
            debouncer: PreviewDebouncer::new(config.preview_debounce_ms, config.auto_preview),
            state: AppState::new(),
            sync: Synchronizer::new(original, preview),
            worker,
            status: None,
            in_flight: InFlight::default(),
            revision: 0,
            show_preview_when_ready: false,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sync(&self) -> &Synchronizer<P> {
        &self.sync
    }

    /// Direct player access for the embedding player backend.
    pub fn player_mut(&mut self, surface: Surface) -> &mut P {
        self.sync.player_mut(surface)
    }

    pub fn display(&self) -> &DisplayState {
        self.sync.display()
    }

    pub fn viewport(&self) -> &ZoomViewport {
        &self.viewport
    }

    pub fn recorder(&self) -> &ZoomRecorder {
        &self.recorder
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.upload
    }

    pub fn is_editing(&self) -> bool {
        self.in_flight.edit.is_some()
    }

    pub fn is_generating_preview(&self) -> bool {
        self.in_flight.preview.is_some()
    }

    pub fn is_preview_scheduled(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn set_auto_preview(&mut self, enabled: bool) {
        self.config.auto_preview = enabled;
        self.debouncer.set_enabled(enabled);
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Upload and transcribe a video. The session is replaced on completion.
    pub fn upload(&mut self, path: impl Into<PathBuf>) -> Result<(), ServiceError> {
        if self.in_flight.upload {
            return Err(ServiceError::InProgress {
                operation: "Upload".into(),
            });
        }
        let path = path.into();
        tracing::info!(path = %path.display(), "Uploading video");
        self.worker.submit(ServiceRequest::Upload(UploadRequest { path }))?;
        self.in_flight.upload = true;
        self.status = Some(StatusMessage::info("Uploading and transcribing..."));
        Ok(())
    }

    /// Delete the session's server-side data.
    pub fn cleanup(&mut self) -> Result<(), ServiceError> {
        let session = self.state.session().ok_or(ServiceError::NoSession)?.id.clone();
        if self.in_flight.cleanup {
            return Err(ServiceError::InProgress {
                operation: "Cleanup".into(),
            });
        }
        self.worker.submit(ServiceRequest::Cleanup(session))?;
        self.in_flight.cleanup = true;
        self.status = Some(StatusMessage::info("Cleaning up..."));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Selections
    // -----------------------------------------------------------------------

    pub fn add_selection(&mut self, a: usize, b: usize) -> Result<CutSelection, SelectionError> {
        let selection = self.state.add_selection(a, b)?;
        self.edits_changed();
        Ok(selection)
    }

    pub fn remove_selection(&mut self, position: usize) -> Result<CutSelection, SelectionError> {
        let removed = self.state.remove_selection(position)?;
        self.edits_changed();
        Ok(removed)
    }

    /// Remove the selection covering transcript item `index` (un-cut a word).
    pub fn remove_selection_at_word(&mut self, index: usize) -> Option<CutSelection> {
        let removed = self.state.remove_selection_covering(index)?;
        self.edits_changed();
        Some(removed)
    }

    /// Remove every selection and drop the preview.
    pub fn clear_selections(&mut self) {
        self.state.clear_selections();
        self.revision += 1;
        self.debouncer.cancel();
        self.show_preview_when_ready = false;
        self.state.clear_preview();
        self.sync.reset_preview(&self.state);
        self.sync.refresh(&self.state);
    }

    fn edits_changed(&mut self) {
        self.revision += 1;
        self.debouncer.schedule(Instant::now());
        self.sync.refresh(&self.state);
    }

    // -----------------------------------------------------------------------
    // Zoom
    // -----------------------------------------------------------------------

    pub fn set_zoom_mode(&mut self, mode: ZoomMode) {
        self.viewport.set_mode(mode);
        self.track_zoom();
    }

    pub fn wheel(&mut self, pointer: FocusPoint, delta: f64) -> bool {
        let changed = self.viewport.wheel(pointer, delta);
        if changed {
            self.track_zoom();
        }
        changed
    }

    pub fn begin_drag(&mut self) -> bool {
        self.viewport.begin_drag()
    }

    pub fn drag_by(&mut self, dx: f64, dy: f64, width: f64, height: f64) -> bool {
        let changed = self.viewport.drag_by(dx, dy, width, height);
        if changed {
            self.track_zoom();
        }
        changed
    }

    pub fn end_drag(&mut self) {
        self.viewport.end_drag();
    }

    pub fn click_video(&mut self, pointer: FocusPoint) -> bool {
        let changed = self.viewport.click(pointer);
        if changed {
            self.track_zoom();
        }
        changed
    }

    /// Start recording a zoom gesture at the current playback position.
    ///
    /// Recording with zoom disabled switches the viewport to drag mode.
    pub fn start_zoom_recording(&mut self) -> ZoomId {
        if self.viewport.mode() == ZoomMode::None {
            self.viewport.set_mode(ZoomMode::Drag);
        }
        let time = self.sync.current_original_time();
        self.recorder.start(time, self.viewport.level(), self.viewport.focus())
    }

    /// Finish the recording and commit it, replacing overlapped events.
    pub fn stop_zoom_recording(&mut self) -> Option<ZoomEvent> {
        let time = self.sync.current_original_time();
        let event = self.recorder.stop(time)?;
        let replaced = self.state.commit_zoom(event.clone());
        if !replaced.is_empty() {
            tracing::debug!(id = %event.id, replaced = replaced.len(), "Zoom event replaced overlapping events");
        }
        self.edits_changed();
        Some(event)
    }

    pub fn remove_zoom(&mut self, id: ZoomId) -> Option<ZoomEvent> {
        let removed = self.state.remove_zoom(id)?;
        self.edits_changed();
        Some(removed)
    }

    pub fn clear_zooms(&mut self) {
        self.state.clear_zooms();
        self.edits_changed();
    }

    /// Transcript index range a committed zoom event spans.
    pub fn zoom_span(&self, id: ZoomId) -> Option<(usize, usize)> {
        let event = self.state.zoom_events().get(id)?;
        span_for_window(self.state.transcript().items(), event.start_time, event.end_time)
    }

    fn track_zoom(&mut self) {
        if self.recorder.is_recording() {
            let time = self.sync.current_original_time();
            self.recorder.update(time, self.viewport.level(), self.viewport.focus());
        }
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    /// Make `target` the active surface.
    ///
    /// Asking for the preview before one exists starts generating it and
    /// switches once it arrives. A stale preview is shown and refreshed.
    pub fn switch_to(&mut self, target: Surface) -> EditorResult<()> {
        if target == Surface::Preview && !self.sync.has_preview() {
            if self.in_flight.preview.is_some() || self.generate_preview()? {
                self.show_preview_when_ready = true;
                return Ok(());
            }
            return Err(PlaybackError::PreviewUnavailable.into());
        }
        if target == Surface::Preview && self.state.is_preview_stale() && self.generate_preview()? {
            tracing::debug!("Refreshing stale preview");
        }
        self.sync.switch_to(target, &self.state)?;
        Ok(())
    }

    /// Route a player notification. Returns true if the display changed.
    pub fn handle_player_event(&mut self, event: PlayerEvent) -> bool {
        self.sync.dispatch(event, &self.state)
    }

    /// Jump to transcript item `index`.
    pub fn click_word(&mut self, index: usize) -> bool {
        let Some(start) = self.state.transcript().get(index).map(|item| item.start) else {
            tracing::debug!(index, "Click on unknown transcript item");
            return false;
        };
        self.sync.navigate_to(start, Some(index), &self.state)
    }

    pub fn navigate_to(&mut self, original_time: TimeCode) -> bool {
        self.sync.navigate_to(original_time, None, &self.state)
    }

    pub fn timeline_click(&mut self, fraction: f64) -> bool {
        self.sync.timeline_click(fraction, &self.state)
    }

    pub fn skip(&mut self, forward: bool) -> bool {
        let delta = if forward { SKIP_SECS } else { -SKIP_SECS };
        self.sync.nudge(delta, &self.state)
    }

    pub fn step_frame(&mut self, forward: bool) -> bool {
        let delta = if forward { FRAME_STEP_SECS } else { -FRAME_STEP_SECS };
        self.sync.nudge(delta, &self.state)
    }

    /// Play the selection at list position `position` on the original video.
    pub fn play_selection(&mut self, position: usize) -> bool {
        let Some((start, end)) = self
            .state
            .selections()
            .selections()
            .get(position)
            .map(|s| (s.start_time, s.end_time))
        else {
            return false;
        };
        self.sync.play_range(start, end, &self.state);
        true
    }

    pub fn play(&mut self) {
        self.sync.play();
    }

    pub fn pause(&mut self) {
        self.sync.pause();
    }

    pub fn toggle_play(&mut self) {
        self.sync.toggle_play();
    }

    // -----------------------------------------------------------------------
    // Edit service
    // -----------------------------------------------------------------------

    /// Request a preview of the current edits.
    ///
    /// Returns `Ok(false)` when skipped: a preview is already generating,
    /// there is no session, or there is nothing to edit.
    pub fn generate_preview(&mut self) -> Result<bool, ServiceError> {
        if self.in_flight.preview.is_some() {
            tracing::debug!("Preview already generating, skipping");
            return Ok(false);
        }
        let Some(session) = self.state.session() else {
            tracing::debug!("No session, skipping preview");
            return Ok(false);
        };
        let request = EditRequest::from_state(session, &self.state, true);
        if request.is_empty() {
            tracing::debug!("Nothing to preview");
            return Ok(false);
        }

        self.worker.submit(ServiceRequest::PreviewCuts {
            request,
            revision: self.revision,
        })?;
        self.in_flight.preview = Some(self.state.remapper().clone());
        self.debouncer.cancel();
        self.status = Some(StatusMessage::info("Generating preview..."));
        Ok(true)
    }

    /// Submit the final edit.
    pub fn apply_edits(&mut self) -> Result<(), ServiceError> {
        if self.in_flight.edit.is_some() {
            return Err(ServiceError::InProgress {
                operation: "Edit".into(),
            });
        }
        let session = self.state.session().ok_or(ServiceError::NoSession)?;
        let request = EditRequest::from_state(session, &self.state, false);
        if request.is_empty() {
            return Err(ServiceError::NothingToEdit);
        }

        tracing::info!(
            selections = request.selections.len(),
            zoom_events = request.zoom_events.len(),
            "Submitting edit"
        );
        self.worker.submit(ServiceRequest::Edit(request))?;
        self.in_flight.edit = Some(self.state.remapper().clone());
        self.status = Some(StatusMessage::info("Processing video..."));
        Ok(())
    }

    /// Apply finished service operations and fire a due preview request.
    ///
    /// Never blocks. Returns true if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(done) = self.worker.try_recv() {
            self.handle_completion(done);
            changed = true;
        }

        if self.debouncer.poll(now) {
            match self.generate_preview() {
                Ok(started) => changed |= started,
                Err(e) => {
                    self.report_failure("Preview", &e);
                    changed = true;
                }
            }
        }
        changed
    }

    /// Wait up to `timeout` for one service operation to finish and apply it.
    pub fn wait_for_completion(&mut self, timeout: Duration) -> bool {
        match self.worker.recv_timeout(timeout) {
            Some(done) => {
                self.handle_completion(done);
                true
            }
            None => false,
        }
    }

    fn handle_completion(&mut self, done: ServiceCompletion) {
        match done {
            ServiceCompletion::Uploaded(result) => {
                self.in_flight.upload = false;
                match result {
                    Ok(outcome) => self.on_uploaded(outcome),
                    Err(e) => self.report_failure("Upload", &e),
                }
            }
            ServiceCompletion::Edited(result) => {
                let cuts = self.in_flight.edit.take().unwrap_or_default();
                match result {
                    Ok(outcome) => self.on_edited(outcome, cuts),
                    Err(e) => self.report_failure("Edit", &e),
                }
            }
            ServiceCompletion::Previewed { revision, result } => {
                let cuts = self.in_flight.preview.take().unwrap_or_default();
                match result {
                    Ok(outcome) => self.on_previewed(revision, outcome, cuts),
                    Err(e) => {
                        self.show_preview_when_ready = false;
                        self.report_failure("Preview", &e);
                    }
                }
            }
            ServiceCompletion::CleanedUp { session, result } => {
                self.in_flight.cleanup = false;
                match result {
                    Ok(()) => self.on_cleaned_up(&session),
                    Err(e) => self.report_failure("Cleanup", &e),
                }
            }
        }
    }

    fn on_uploaded(&mut self, outcome: UploadOutcome) {
        let url = media_url(&outcome.session.id, &outcome.session.filename);
        let items = outcome.transcript.len();
        self.state.load_session(outcome.session, outcome.transcript);
        self.recorder = ZoomRecorder::new(&self.config.zoom);
        self.viewport.reset();
        self.debouncer.cancel();
        self.revision += 1;
        self.show_preview_when_ready = false;

        self.sync.reset_preview(&self.state);
        self.sync.load_original(&url);
        self.sync.refresh(&self.state);
        self.status = Some(StatusMessage::success(format!("Transcription complete ({items} items)")));
    }

    fn on_edited(&mut self, outcome: EditOutcome, cuts: Remapper) {
        let Some(session) = self.state.session().map(|s| s.id.clone()) else {
            tracing::warn!("Edit finished after the session ended, ignoring");
            return;
        };
        if let Some(file) = outcome.edited_file {
            self.state.set_edited_file(file);
        }
        self.install_preview(&session, &outcome.preview_file, cuts);
        self.status = Some(StatusMessage::success("Video processed"));
    }

    fn on_previewed(&mut self, revision: u64, outcome: EditOutcome, cuts: Remapper) {
        let Some(session) = self.state.session().map(|s| s.id.clone()) else {
            tracing::warn!("Preview finished after the session ended, ignoring");
            return;
        };
        self.install_preview(&session, &outcome.preview_file, cuts);
        if revision != self.revision {
            tracing::debug!(revision, current = self.revision, "Preview is already out of date");
            self.state.mark_preview_stale();
            self.debouncer.schedule(Instant::now());
        }

        let text = if outcome.cached { "Using cached preview" } else { "Preview ready!" };
        self.status = Some(StatusMessage::success(text));

        if std::mem::take(&mut self.show_preview_when_ready) {
            if let Err(e) = self.sync.switch_to(Surface::Preview, &self.state) {
                tracing::warn!(error = %e, "Could not switch to the new preview");
            }
        }
    }

    fn install_preview(&mut self, session: &SessionId, file: &str, cuts: Remapper) {
        self.state.set_preview_file(file);
        self.sync.load_preview(&media_url(session, file), cuts);
        self.sync.refresh(&self.state);
    }

    fn on_cleaned_up(&mut self, session: &SessionId) {
        if self.state.session().is_some_and(|s| &s.id == session) {
            self.state.end_session();
            self.debouncer.cancel();
            self.show_preview_when_ready = false;
            self.sync.reset_preview(&self.state);
        }
        tracing::info!(session = %session, "Server data cleaned up");
        self.status = Some(StatusMessage::success("Server data cleaned up"));
    }

    fn report_failure(&mut self, operation: &str, error: &ServiceError) {
        tracing::error!(operation, error = %error, "Service operation failed");
        self.status = Some(StatusMessage::error(format!("{operation} failed: {error}")));
    }

    // -----------------------------------------------------------------------
    // Timeline views
    // -----------------------------------------------------------------------

    /// Scale markers for the active surface. Preview markers carry original times.
    pub fn scale_markers(&self) -> Vec<ScaleMarker> {
        let active = self.sync.active();
        let duration = self
            .sync
            .duration(active)
            .filter(|d| d.as_secs() > 0.0)
            .unwrap_or(TimeCode::from_secs(self.config.timeline.fallback_duration_secs));
        let remapper = (active == Surface::Preview).then(|| self.sync.preview_cuts());
        scale_markers(duration, self.config.timeline.max_markers, remapper)
    }

    /// Cut regions on the original timeline.
    pub fn cut_overlay(&self) -> Vec<CutOverlay> {
        match self.sync.duration(Surface::Original) {
            Some(duration) => self.state.cut_overlay(duration),
            None => Vec::new(),
        }
    }

    /// Time saved by the cuts, once both durations are known.
    pub fn savings(&self) -> Option<CutSavings> {
        if !self.sync.has_preview() {
            return None;
        }
        let original = self.sync.duration(Surface::Original)?;
        let preview = self.sync.duration(Surface::Preview)?;
        Some(CutSavings::between(original, preview))
    }

    /// Committed zoom events placed on the edited timeline.
    pub fn zoom_windows(&self) -> Vec<(ZoomId, TimeCode, TimeCode)> {
        match self.sync.duration(Surface::Original) {
            Some(duration) => self.state.zoom_windows_on_edited(duration),
            None => Vec::new(),
        }
    }

    /// Original transcript index of an edited-timeline item that carries no index.
    pub fn match_edited_item(&self, item: &TranscriptItem) -> Option<usize> {
        map_adjusted_to_original(
            self.state.transcript(),
            item,
            self.state.remapper(),
            &self.config.matching,
        )
    }
}

//! Central application state container.
//!
//! `AppState` owns the transcript, the cut selections, the committed zoom
//! events and the editing session. Every mutation of the selections rebuilds
//! the derived views (remapper, adjusted transcript, cut mask) from scratch.

use serde::{Deserialize, Serialize};
use wc_common::{SelectionError, SessionId, TimeCode, ZoomId};
use wc_timeline::{cut_overlay, kept_segments, CutOverlay, KeptSegment, Remapper};
use wc_transcript::{build_adjusted, cut_mask, AdjustedTranscript, Transcript};

use crate::selection::{CutSelection, SelectionManager};
use crate::zoom::{ZoomEvent, ZoomEventSet};

/// The uploaded video as known to the edit service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    /// Stored filename returned by the upload.
    pub filename: String,
}

/// Central application state container.
///
/// This is the single source of truth for the editor. All presentation reads
/// from it, and all modifications go through its mutation methods.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    // --- Source data ---
    transcript: Transcript,
    selections: SelectionManager,
    zoom_events: ZoomEventSet,

    // --- Derived (rebuilt on every selection change) ---
    remapper: Remapper,
    adjusted: AdjustedTranscript,
    cut_mask: Vec<bool>,

    // --- Session ---
    session: Option<SessionInfo>,
    /// Final edited file from the last successful edit.
    edited_file: Option<String>,
    /// Preview file from the last successful preview generation.
    preview_file: Option<String>,
    /// Selections or zoom events changed since the preview was generated.
    preview_stale: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session with a newly transcribed video.
    ///
    /// Clears selections, zoom events and any generated files.
    pub fn load_session(&mut self, session: SessionInfo, transcript: Transcript) {
        tracing::info!(session = %session.id, items = transcript.len(), "Session loaded");
        self.session = Some(session);
        self.transcript = transcript;
        self.selections.clear();
        self.zoom_events.clear();
        self.edited_file = None;
        self.preview_file = None;
        self.preview_stale = false;
        self.recompute();
    }

    /// Forget the session (after cleanup). The transcript and edits stay for display.
    pub fn end_session(&mut self) {
        self.session = None;
        self.edited_file = None;
        self.preview_file = None;
    }

    // --- Accessors ---

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn selections(&self) -> &SelectionManager {
        &self.selections
    }

    pub fn zoom_events(&self) -> &ZoomEventSet {
        &self.zoom_events
    }

    pub fn remapper(&self) -> &Remapper {
        &self.remapper
    }

    pub fn adjusted(&self) -> &AdjustedTranscript {
        &self.adjusted
    }

    /// Per original item: removed by the current selections.
    pub fn cut_mask(&self) -> &[bool] {
        &self.cut_mask
    }

    pub fn is_cut(&self, index: usize) -> bool {
        self.cut_mask.get(index).copied().unwrap_or(false)
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    pub fn edited_file(&self) -> Option<&str> {
        self.edited_file.as_deref()
    }

    pub fn preview_file(&self) -> Option<&str> {
        self.preview_file.as_deref()
    }

    pub fn is_preview_stale(&self) -> bool {
        self.preview_stale
    }

    /// Whether there is anything for the edit service to apply.
    pub fn has_edits(&self) -> bool {
        !self.selections.is_empty() || !self.zoom_events.is_empty()
    }

    // --- Selections ---

    pub fn add_selection(&mut self, a: usize, b: usize) -> Result<CutSelection, SelectionError> {
        let selection = self.selections.add(a, b, &self.transcript)?;
        self.after_edit();
        self.recompute();
        Ok(selection)
    }

    pub fn remove_selection(&mut self, position: usize) -> Result<CutSelection, SelectionError> {
        let removed = self.selections.remove(position)?;
        self.after_edit();
        self.recompute();
        Ok(removed)
    }

    /// Remove the selection covering transcript item `index`, if any.
    pub fn remove_selection_covering(&mut self, index: usize) -> Option<CutSelection> {
        let position = self.selections.position_covering(index)?;
        self.remove_selection(position).ok()
    }

    pub fn clear_selections(&mut self) {
        self.selections.clear();
        self.after_edit();
        self.recompute();
    }

    // --- Zoom events ---

    /// Commit a recorded zoom event. Returns the ids of replaced events.
    pub fn commit_zoom(&mut self, event: ZoomEvent) -> Vec<ZoomId> {
        let removed = self.zoom_events.commit(event);
        self.after_edit();
        removed
    }

    pub fn remove_zoom(&mut self, id: ZoomId) -> Option<ZoomEvent> {
        let removed = self.zoom_events.remove(id)?;
        self.after_edit();
        Some(removed)
    }

    pub fn clear_zooms(&mut self) {
        self.zoom_events.clear();
        self.after_edit();
    }

    // --- Service results ---

    pub fn set_edited_file(&mut self, file: impl Into<String>) {
        self.edited_file = Some(file.into());
    }

    pub fn set_preview_file(&mut self, file: impl Into<String>) {
        self.preview_file = Some(file.into());
        self.preview_stale = false;
    }

    /// The preview no longer reflects the current edits.
    pub fn mark_preview_stale(&mut self) {
        if self.preview_file.is_some() {
            self.preview_stale = true;
        }
    }

    pub fn clear_preview(&mut self) {
        self.preview_file = None;
        self.preview_stale = false;
    }

    // --- Timeline views ---

    /// Segments kept by the current cuts for a video of `duration`.
    pub fn kept_segments(&self, duration: TimeCode) -> Vec<KeptSegment> {
        kept_segments(self.remapper.cuts(), duration)
    }

    /// Cut overlay geometry on the original timeline.
    pub fn cut_overlay(&self, duration: TimeCode) -> Vec<CutOverlay> {
        cut_overlay(self.remapper.cuts(), duration)
    }

    /// Zoom events placed on the edited timeline.
    pub fn zoom_windows_on_edited(&self, duration: TimeCode) -> Vec<(ZoomId, TimeCode, TimeCode)> {
        self.zoom_events.on_edited_timeline(&self.kept_segments(duration))
    }

    fn after_edit(&mut self) {
        self.edited_file = None;
        self.mark_preview_stale();
    }

    /// Rebuild every view derived from the selections.
    fn recompute(&mut self) {
        let cuts = self.selections.cuts();
        self.remapper = Remapper::new(&cuts);
        self.adjusted = build_adjusted(&self.transcript, self.remapper.cuts());

        let by_time = cut_mask(&self.transcript, self.remapper.cuts());
        let by_index = self.selections.index_mask(self.transcript.len());
        self.cut_mask = by_time.iter().zip(&by_index).map(|(a, b)| *a || *b).collect();

        tracing::debug!(
            cuts = cuts.len(),
            removed_secs = self.remapper.total_removed(),
            adjusted = self.adjusted.len(),
            "Derived views recomputed"
        );
    }
}

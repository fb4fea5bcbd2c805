//! Zoom event recording.
//!
//! A zoom gesture is recorded against the original timeline:
//!
//! ```text
//! Idle ──start()──> Recording ──stop()──> Idle
//!                     │  ^
//!                     └──┘ update()  (kept only past the movement thresholds)
//! ```
//!
//! Committed events live in a [`ZoomEventSet`], where a new event replaces
//! every earlier event it overlaps.

use serde::{Deserialize, Serialize};
use wc_common::{FocusPoint, TimeCode, ZoomConfig, ZoomId, ZoomLevel};
use wc_timeline::{map_window_to_edited, KeptSegment};

/// A recorded camera pan/scale gesture.
///
/// Serializes in the edit service's shape:
/// `{id, startTime, endTime, startZoomLevel, endZoomLevel, focusPoint: {x, y}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomEvent {
    pub id: ZoomId,
    pub start_time: TimeCode,
    pub end_time: TimeCode,
    pub start_zoom_level: ZoomLevel,
    pub end_zoom_level: ZoomLevel,
    /// Transform origin at the end of the gesture.
    pub focus_point: FocusPoint,
}

impl ZoomEvent {
    pub fn duration(&self) -> f64 {
        self.end_time.as_secs() - self.start_time.as_secs()
    }

    /// Half-open overlap of `[start_time, end_time)`.
    pub fn overlaps(&self, other: &ZoomEvent) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Short description, e.g. `1.0x → 2.5x at (40%, 60%)`.
    pub fn describe(&self) -> String {
        format!(
            "{} → {} at ({}%, {}%)",
            self.start_zoom_level,
            self.end_zoom_level,
            (self.focus_point.x * 100.0).round(),
            (self.focus_point.y * 100.0).round()
        )
    }
}

/// Recorder state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording(ZoomEvent),
}

/// Records one zoom gesture at a time.
#[derive(Clone, Debug, Default)]
pub struct ZoomRecorder {
    state: RecorderState,
    position_threshold: f64,
    level_threshold: f64,
}

impl ZoomRecorder {
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            state: RecorderState::Idle,
            position_threshold: config.position_threshold,
            level_threshold: config.level_threshold,
        }
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    /// The in-progress event, if recording.
    pub fn pending(&self) -> Option<&ZoomEvent> {
        match &self.state {
            RecorderState::Recording(event) => Some(event),
            RecorderState::Idle => None,
        }
    }

    /// Begin recording at `time`. A second call while recording keeps the
    /// current recording and returns its id.
    pub fn start(&mut self, time: TimeCode, level: ZoomLevel, focus: FocusPoint) -> ZoomId {
        if let RecorderState::Recording(event) = &self.state {
            tracing::debug!(id = %event.id, "Zoom recording already active");
            return event.id;
        }

        let time = if time.is_valid() {
            time.non_negative()
        } else {
            tracing::warn!("Non-finite zoom start time, using 0");
            TimeCode::ZERO
        };
        let event = ZoomEvent {
            id: ZoomId::next(),
            start_time: time,
            end_time: time,
            start_zoom_level: level,
            end_zoom_level: level,
            focus_point: focus,
        };
        tracing::debug!(id = %event.id, time = %time, level = %level, "Zoom recording started");
        let id = event.id;
        self.state = RecorderState::Recording(event);
        id
    }

    /// Feed the current zoom state. Returns true when the pending event changed.
    ///
    /// Changes smaller than both thresholds are ignored.
    pub fn update(&mut self, time: TimeCode, level: ZoomLevel, focus: FocusPoint) -> bool {
        let RecorderState::Recording(event) = &mut self.state else {
            return false;
        };

        let moved = event.focus_point.max_axis_distance(focus) > self.position_threshold;
        let zoomed = (event.end_zoom_level.as_f64() - level.as_f64()).abs() > self.level_threshold;
        if !moved && !zoomed {
            return false;
        }

        if time.is_valid() {
            event.end_time = time.max(event.start_time);
        }
        event.end_zoom_level = level;
        event.focus_point = focus;
        tracing::trace!(id = %event.id, time = %event.end_time, level = %level, "Zoom recording updated");
        true
    }

    /// Finish recording at `time`.
    ///
    /// Returns the committed event, or `None` when not recording or when the
    /// gesture has no duration. The recorder is idle afterwards either way.
    pub fn stop(&mut self, time: TimeCode) -> Option<ZoomEvent> {
        let RecorderState::Recording(mut event) = std::mem::take(&mut self.state) else {
            return None;
        };

        if !time.is_valid() {
            tracing::warn!(id = %event.id, "Non-finite zoom stop time, discarding");
            return None;
        }
        event.end_time = time;
        if event.end_time <= event.start_time {
            tracing::debug!(
                id = %event.id,
                start = %event.start_time,
                end = %event.end_time,
                "Discarding zoom event with no duration"
            );
            return None;
        }

        tracing::info!(
            id = %event.id,
            start = %event.start_time,
            end = %event.end_time,
            level = %event.end_zoom_level,
            "Zoom event recorded"
        );
        Some(event)
    }
}

/// Committed zoom events.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZoomEventSet {
    events: Vec<ZoomEvent>,
}

impl ZoomEventSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit an event, removing every existing event it overlaps.
    /// Returns the ids of the removed events.
    pub fn commit(&mut self, event: ZoomEvent) -> Vec<ZoomId> {
        let removed: Vec<ZoomId> = self
            .events
            .iter()
            .filter(|existing| existing.overlaps(&event))
            .map(|existing| existing.id)
            .collect();
        if !removed.is_empty() {
            self.events.retain(|existing| !removed.contains(&existing.id));
            tracing::debug!(id = %event.id, replaced = removed.len(), "Zoom event replaced overlapping events");
        }
        self.events.push(event);
        removed
    }

    pub fn remove(&mut self, id: ZoomId) -> Option<ZoomEvent> {
        let position = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(position))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn get(&self, id: ZoomId) -> Option<&ZoomEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events in commit order.
    pub fn events(&self) -> &[ZoomEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn sorted_by_start(&self) -> Vec<ZoomEvent> {
        let mut sorted = self.events.clone();
        sorted.sort_by(|a, b| a.start_time.as_secs().total_cmp(&b.start_time.as_secs()));
        sorted
    }

    /// Place each event on the edited timeline. Events with an endpoint
    /// inside a cut are omitted.
    pub fn on_edited_timeline(&self, segments: &[KeptSegment]) -> Vec<(ZoomId, TimeCode, TimeCode)> {
        self.sorted_by_start()
            .iter()
            .filter_map(|e| map_window_to_edited(e.start_time, e.end_time, segments).map(|(s, t)| (e.id, s, t)))
            .collect()
    }
}

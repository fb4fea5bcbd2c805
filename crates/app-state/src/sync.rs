//! Dual-player synchronization.
//!
//! Exactly one surface is active at a time. Only the active surface's
//! notifications reach the transcript highlight and the timeline cursor;
//! the inactive surface is paused and its notifications are dropped.
//!
//! Preview time is edited-timeline time. It is mapped back to the original
//! timeline before looking up the transcript item to highlight. The mapping
//! uses the cuts the loaded preview was rendered with, which lag behind the
//! current cuts until a newer preview loads. The cursor fraction always uses
//! the active surface's own time and duration.

use wc_common::{PlaybackError, TimeCode};
use wc_timeline::{cursor_fraction, Remapper};
use wc_transcript::{find_closest_uncut, next_uncut_at_or_after};

use crate::playback::{MediaPlayer, PlayerEvent, Surface, SurfaceState};
use crate::state::AppState;

/// What the presentation layer should show.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayState {
    /// Original transcript index to highlight.
    pub highlighted: Option<usize>,
    /// Cursor position as a fraction of the active surface's duration.
    pub cursor: Option<f64>,
}

/// Routes player notifications and user navigation between the two surfaces.
pub struct Synchronizer<P: MediaPlayer> {
    original: P,
    preview: P,
    original_state: SurfaceState,
    preview_state: SurfaceState,
    active: Surface,
    preview_loaded: bool,
    /// Cuts the loaded preview was rendered with.
    preview_cuts: Remapper,
    display: DisplayState,
}

impl<P: MediaPlayer> Synchronizer<P> {
    pub fn new(mut original: P, mut preview: P) -> Self {
        original.set_visible(true);
        preview.set_visible(false);
        Self {
            original,
            preview,
            original_state: SurfaceState::new(true),
            preview_state: SurfaceState::new(false),
            active: Surface::Original,
            preview_loaded: false,
            preview_cuts: Remapper::identity(),
            display: DisplayState::default(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn active(&self) -> Surface {
        self.active
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn has_preview(&self) -> bool {
        self.preview_loaded
    }

    /// Mapping between the original timeline and the loaded preview.
    pub fn preview_cuts(&self) -> &Remapper {
        &self.preview_cuts
    }

    pub fn player(&self, surface: Surface) -> &P {
        match surface {
            Surface::Original => &self.original,
            Surface::Preview => &self.preview,
        }
    }

    pub fn player_mut(&mut self, surface: Surface) -> &mut P {
        match surface {
            Surface::Original => &mut self.original,
            Surface::Preview => &mut self.preview,
        }
    }

    pub fn surface_state(&self, surface: Surface) -> &SurfaceState {
        match surface {
            Surface::Original => &self.original_state,
            Surface::Preview => &self.preview_state,
        }
    }

    fn surface_state_mut(&mut self, surface: Surface) -> &mut SurfaceState {
        match surface {
            Surface::Original => &mut self.original_state,
            Surface::Preview => &mut self.preview_state,
        }
    }

    /// Duration of a surface: from metadata if reported, else from the player.
    pub fn duration(&self, surface: Surface) -> Option<TimeCode> {
        self.surface_state(surface)
            .duration
            .or_else(|| self.player(surface).duration())
    }

    /// Active surface's current time on the original timeline.
    pub fn current_original_time(&self) -> TimeCode {
        let time = self.player(self.active).current_time();
        self.to_original(self.active, time)
    }

    fn to_original(&self, surface: Surface, time: TimeCode) -> TimeCode {
        match surface {
            Surface::Original => time,
            Surface::Preview => self.preview_cuts.to_original(time),
        }
    }

    // ------------------------------------------------------------------
    // Sources
    // ------------------------------------------------------------------

    pub fn load_original(&mut self, source: &str) {
        self.original.load(source);
        self.original_state.reset();
        tracing::info!(source, "Original video loaded");
    }

    /// Load a freshly generated preview rendered with `cuts`.
    ///
    /// The active surface does not change.
    pub fn load_preview(&mut self, source: &str, cuts: Remapper) {
        self.preview.pause();
        self.preview.load(source);
        self.preview_state.reset();
        self.preview_loaded = true;
        tracing::info!(source, cuts = cuts.cuts().len(), "Preview video loaded");
        self.preview_cuts = cuts;
    }

    /// Drop the preview source and fall back to the original surface.
    pub fn reset_preview(&mut self, state: &AppState) {
        if self.active == Surface::Preview {
            self.activate(Surface::Original, state);
        }
        self.preview.pause();
        self.preview.unload();
        self.preview_state.reset();
        self.preview_loaded = false;
        self.preview_cuts = Remapper::identity();
        tracing::debug!("Preview reset");
    }

    // ------------------------------------------------------------------
    // Surface switching
    // ------------------------------------------------------------------

    /// Make `target` the active surface.
    ///
    /// Both players are paused first, then visibility is swapped and the
    /// display is re-derived from the new surface's current time.
    pub fn switch_to(&mut self, target: Surface, state: &AppState) -> Result<(), PlaybackError> {
        if target == Surface::Preview && !self.preview_loaded {
            return Err(PlaybackError::PreviewUnavailable);
        }
        self.activate(target, state);
        Ok(())
    }

    fn activate(&mut self, target: Surface, state: &AppState) {
        self.original.pause();
        self.preview.pause();
        self.original_state.pause();
        self.preview_state.pause();
        self.original_state.clear_out_point();

        self.active = target;
        self.original.set_visible(target == Surface::Original);
        self.preview.set_visible(target == Surface::Preview);
        self.original_state.visible = target == Surface::Original;
        self.preview_state.visible = target == Surface::Preview;

        let time = self.player(target).current_time();
        self.update_display(target, time, state);
        tracing::debug!(surface = %target, time = %time, "Switched active surface");
    }

    // ------------------------------------------------------------------
    // Player notifications
    // ------------------------------------------------------------------

    /// Route one player notification. Returns true if the display changed.
    pub fn dispatch(&mut self, event: PlayerEvent, state: &AppState) -> bool {
        match event {
            PlayerEvent::TimeUpdate { surface, time } => self.on_time_update(surface, time, false, state),
            PlayerEvent::Seeked { surface, time } => self.on_time_update(surface, time, true, state),
            PlayerEvent::LoadedMetadata { surface, duration } => self.on_metadata(surface, duration, state),
            PlayerEvent::Ended { surface } => {
                self.on_ended(surface);
                false
            }
            PlayerEvent::Error { surface, message } => {
                self.on_error(surface, &message, state);
                false
            }
        }
    }

    /// Time update (or completed seek) from `surface`.
    ///
    /// Ignored unless `surface` is active. Returns true if the display changed.
    pub fn on_time_update(&mut self, surface: Surface, time: TimeCode, is_seek: bool, state: &AppState) -> bool {
        if surface != self.active {
            tracing::trace!(surface = %surface, time = %time, "Ignoring update from inactive surface");
            return false;
        }
        if !time.is_valid() {
            tracing::warn!(surface = %surface, "Non-finite player time ignored");
            return false;
        }

        let surface_state = self.surface_state_mut(surface);
        surface_state.current_time = time;
        if surface_state.is_playing() && surface_state.is_past_out_point() {
            surface_state.pause();
            surface_state.clear_out_point();
            self.player_mut(surface).pause();
            tracing::debug!(surface = %surface, time = %time, "Reached end of range");
        }
        if is_seek {
            tracing::debug!(surface = %surface, time = %time, "Seek completed");
        }

        self.update_display(surface, time, state)
    }

    /// Metadata loaded: the surface's duration is now known.
    pub fn on_metadata(&mut self, surface: Surface, duration: TimeCode, state: &AppState) -> bool {
        if !duration.is_valid() || duration.as_secs() <= 0.0 {
            tracing::warn!(surface = %surface, duration = duration.as_secs(), "Ignoring invalid duration");
            return false;
        }
        self.surface_state_mut(surface).duration = Some(duration);
        tracing::debug!(surface = %surface, duration = %duration, "Metadata loaded");

        if surface != self.active {
            return false;
        }
        let time = self.player(surface).current_time();
        self.update_display(surface, time, state)
    }

    pub fn on_ended(&mut self, surface: Surface) {
        self.surface_state_mut(surface).stop();
        tracing::debug!(surface = %surface, "Playback ended");
    }

    /// A player failed. A failed preview is dropped.
    pub fn on_error(&mut self, surface: Surface, message: &str, state: &AppState) {
        tracing::error!(surface = %surface, message, "Player error");
        self.surface_state_mut(surface).error = Some(message.to_string());
        if surface == Surface::Preview {
            self.reset_preview(state);
            self.preview_state.error = Some(message.to_string());
        }
    }

    // ------------------------------------------------------------------
    // User navigation (always on the active surface)
    // ------------------------------------------------------------------

    /// Jump to an original-timeline time, e.g. after clicking a word.
    ///
    /// With the preview active, a click on a word marked for cut jumps to the
    /// next uncut item at or after `original_time` instead.
    pub fn navigate_to(&mut self, original_time: TimeCode, word_index: Option<usize>, state: &AppState) -> bool {
        if !original_time.is_valid() {
            tracing::warn!("Ignoring navigation to non-finite time");
            return false;
        }

        let mut target = original_time.non_negative();
        if self.active == Surface::Preview {
            if let Some(index) = word_index.filter(|i| state.is_cut(*i)) {
                if let Some(next) = next_uncut_at_or_after(state.transcript().items(), state.cut_mask(), target) {
                    target = state.transcript().items()[next].start;
                    tracing::debug!(index, next, time = %target, "Word is cut, using next uncut item");
                }
            }
        }

        let native = match self.active {
            Surface::Original => target,
            Surface::Preview => self.preview_cuts.to_edited(target),
        };
        self.seek_active(native, state)
    }

    /// Click on the timeline at `fraction` of the active surface's duration.
    pub fn timeline_click(&mut self, fraction: f64, state: &AppState) -> bool {
        let Some(duration) = self.duration(self.active) else {
            tracing::debug!("Timeline click before duration is known");
            return false;
        };
        if fraction.is_nan() {
            return false;
        }
        let time = TimeCode::from_secs(fraction.clamp(0.0, 1.0) * duration.as_secs());
        self.seek_active(time, state)
    }

    /// Skip the active surface by `delta` seconds, clamped to the media.
    pub fn nudge(&mut self, delta: f64, state: &AppState) -> bool {
        let current = self.player(self.active).current_time().as_secs();
        let mut time = (current + delta).max(0.0);
        if let Some(duration) = self.duration(self.active) {
            time = time.min(duration.as_secs());
        }
        self.seek_active(TimeCode::from_secs(time), state)
    }

    /// Play an original-timeline range on the original surface, pausing at `end`.
    pub fn play_range(&mut self, start: TimeCode, end: TimeCode, state: &AppState) {
        if self.active != Surface::Original {
            self.activate(Surface::Original, state);
        }
        self.seek_active(start, state);
        self.original_state.set_out_point(end);
        self.original_state.play();
        self.original.play();
        tracing::debug!(start = %start, end = %end, "Playing range");
    }

    pub fn play(&mut self) {
        self.player_mut(self.active).play();
        self.surface_state_mut(self.active).play();
    }

    pub fn pause(&mut self) {
        self.player_mut(self.active).pause();
        self.surface_state_mut(self.active).pause();
    }

    pub fn toggle_play(&mut self) {
        if self.surface_state(self.active).is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    fn seek_active(&mut self, time: TimeCode, state: &AppState) -> bool {
        let surface = self.active;
        self.player_mut(surface).pause();
        self.player_mut(surface).seek(time);
        let surface_state = self.surface_state_mut(surface);
        surface_state.pause();
        surface_state.seek(time);
        tracing::debug!(surface = %surface, time = %time, "Seeking active surface");
        self.update_display(surface, time, state)
    }

    /// Re-derive highlight and cursor after the transcript or cuts changed.
    pub fn refresh(&mut self, state: &AppState) -> bool {
        let time = self.player(self.active).current_time();
        self.update_display(self.active, time, state)
    }

    fn update_display(&mut self, surface: Surface, time: TimeCode, state: &AppState) -> bool {
        let original = self.to_original(surface, time);
        let highlighted = find_closest_uncut(state.transcript().items(), state.cut_mask(), original);
        let cursor = self.duration(surface).and_then(|d| cursor_fraction(time, d));

        let next = DisplayState { highlighted, cursor };
        if next == self.display {
            return false;
        }
        self.display = next;
        true
    }
}

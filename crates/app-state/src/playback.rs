//! Playback surfaces: the two players (original and cut preview), their
//! transport state, and the media-player contract they are driven through.

use std::fmt;

use serde::{Deserialize, Serialize};
use wc_common::TimeCode;

/// One of the two playback surfaces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// The unedited source video. Its time is original-timeline time.
    #[default]
    Original,
    /// The generated preview. Its time is edited-timeline time.
    Preview,
}

impl Surface {
    pub fn other(self) -> Self {
        match self {
            Surface::Original => Surface::Preview,
            Surface::Preview => Surface::Original,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Original => write!(f, "original"),
            Surface::Preview => write!(f, "preview"),
        }
    }
}

/// Media playback primitive. The synchronizer depends only on this shape.
pub trait MediaPlayer {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, time: TimeCode);
    /// Surface-native current time.
    fn current_time(&self) -> TimeCode;
    /// Media duration, once metadata has loaded.
    fn duration(&self) -> Option<TimeCode>;
    fn set_visible(&mut self, visible: bool);
    /// Replace the media source.
    fn load(&mut self, source: &str);
    /// Drop the media source.
    fn unload(&mut self);
}

/// Notifications emitted by a player, tagged with their surface.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    TimeUpdate { surface: Surface, time: TimeCode },
    Seeked { surface: Surface, time: TimeCode },
    LoadedMetadata { surface: Surface, duration: TimeCode },
    Ended { surface: Surface },
    Error { surface: Surface, message: String },
}

impl PlayerEvent {
    pub fn surface(&self) -> Surface {
        match self {
            PlayerEvent::TimeUpdate { surface, .. }
            | PlayerEvent::Seeked { surface, .. }
            | PlayerEvent::LoadedMetadata { surface, .. }
            | PlayerEvent::Ended { surface }
            | PlayerEvent::Error { surface, .. } => *surface,
        }
    }
}

/// Transport mode of a surface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// No media loaded, or playback ran to the end.
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Bookkeeping for one surface, mirrored from its player's notifications.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SurfaceState {
    pub mode: PlaybackMode,
    /// Last reported surface-native time.
    pub current_time: TimeCode,
    /// Media duration, once known.
    pub duration: Option<TimeCode>,
    /// Playback pauses when it reaches this point.
    pub out_point: Option<TimeCode>,
    pub visible: bool,
    /// Last player error.
    pub error: Option<String>,
}

impl SurfaceState {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    pub fn play(&mut self) {
        self.mode = PlaybackMode::Playing;
    }

    pub fn pause(&mut self) {
        if self.mode == PlaybackMode::Playing {
            self.mode = PlaybackMode::Paused;
        }
    }

    /// Playback reached the end of the media.
    pub fn stop(&mut self) {
        self.mode = PlaybackMode::Stopped;
        self.out_point = None;
    }

    /// Record a new position. Leaves a stopped surface paused.
    pub fn seek(&mut self, time: TimeCode) {
        self.current_time = time;
        if self.mode == PlaybackMode::Stopped {
            self.mode = PlaybackMode::Paused;
        }
    }

    pub fn set_out_point(&mut self, time: TimeCode) {
        self.out_point = Some(time);
    }

    pub fn clear_out_point(&mut self) {
        self.out_point = None;
    }

    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing
    }

    /// Whether the current time has reached the out-point.
    pub fn is_past_out_point(&self) -> bool {
        self.out_point.is_some_and(|out| self.current_time >= out)
    }

    /// Forget everything about the loaded media.
    pub fn reset(&mut self) {
        let visible = self.visible;
        *self = Self::new(visible);
    }
}

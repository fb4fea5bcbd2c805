//! Live zoom viewport: the zoom level and focus point currently applied to
//! the video frame, driven by wheel, drag and click gestures.

use serde::{Deserialize, Serialize};
use wc_common::{FocusPoint, ZoomConfig, ZoomLevel};

/// How pointer gestures affect the viewport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomMode {
    /// Gestures are ignored and the frame is unzoomed.
    #[default]
    None,
    /// Wheel zoom and click-to-zoom.
    Simple,
    /// Wheel zoom and drag-to-pan.
    Drag,
}

/// Current zoom transform of the original player.
#[derive(Clone, Debug)]
pub struct ZoomViewport {
    mode: ZoomMode,
    level: ZoomLevel,
    focus: FocusPoint,
    dragging: bool,
    config: ZoomConfig,
}

impl Default for ZoomViewport {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl ZoomViewport {
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            mode: ZoomMode::None,
            level: ZoomLevel::clamped(1.0, config.min_level, config.max_level),
            focus: FocusPoint::CENTER,
            dragging: false,
            config,
        }
    }

    pub fn mode(&self) -> ZoomMode {
        self.mode
    }

    pub fn level(&self) -> ZoomLevel {
        self.level
    }

    pub fn focus(&self) -> FocusPoint {
        self.focus
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Switch gesture mode. Switching to [`ZoomMode::None`] resets the zoom.
    pub fn set_mode(&mut self, mode: ZoomMode) {
        self.mode = mode;
        self.dragging = false;
        if mode == ZoomMode::None {
            self.reset();
        }
        tracing::debug!(mode = ?mode, "Zoom mode changed");
    }

    /// Return to level 1 centred.
    pub fn reset(&mut self) {
        self.level = ZoomLevel::clamped(1.0, self.config.min_level, self.config.max_level);
        self.focus = FocusPoint::CENTER;
    }

    fn clamp_level(&self, level: f64) -> ZoomLevel {
        ZoomLevel::clamped(level, self.config.min_level, self.config.max_level)
    }

    /// Wheel gesture at normalized pointer position `pointer`.
    ///
    /// Positive `delta` (scrolling down) zooms out one step, negative zooms in.
    /// Returns true when the viewport changed.
    pub fn wheel(&mut self, pointer: FocusPoint, delta: f64) -> bool {
        if self.mode == ZoomMode::None || delta == 0.0 || delta.is_nan() {
            return false;
        }
        let direction = if delta > 0.0 { -1.0 } else { 1.0 };
        self.focus = pointer;
        self.level = self.clamp_level(self.level.as_f64() + self.config.wheel_step * direction);
        true
    }

    /// Start a drag. Only possible in drag mode while zoomed in.
    pub fn begin_drag(&mut self) -> bool {
        self.dragging = self.mode == ZoomMode::Drag && self.level.is_zoomed();
        self.dragging
    }

    /// Pointer moved by (`dx`, `dy`) pixels over a `width`×`height` viewport.
    ///
    /// The focus moves opposite to the pointer, scaled by `1 / (level * 2)`.
    pub fn drag_by(&mut self, dx: f64, dy: f64, width: f64, height: f64) -> bool {
        if !self.dragging || width <= 0.0 || height <= 0.0 {
            return false;
        }
        let scale = 1.0 / (self.level.as_f64() * 2.0);
        self.focus = FocusPoint::new(
            self.focus.x - dx / width * scale,
            self.focus.y - dy / height * scale,
        );
        true
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Click in simple mode: move the focus to the click point and toggle
    /// between no zoom and the configured click level.
    pub fn click(&mut self, pointer: FocusPoint) -> bool {
        if self.mode != ZoomMode::Simple {
            return false;
        }
        self.focus = pointer;
        self.level = if self.level.is_zoomed() {
            self.clamp_level(1.0)
        } else {
            self.clamp_level(self.config.click_level)
        };
        true
    }

    /// Set level and focus directly, e.g. to replay a recorded event.
    pub fn apply(&mut self, level: ZoomLevel, focus: FocusPoint) {
        self.level = self.clamp_level(level.as_f64());
        self.focus = focus;
    }

    /// Transform origin for rendering: the focus while zoomed with a mode
    /// active, the centre otherwise.
    pub fn transform_origin(&self) -> FocusPoint {
        if self.level.is_zoomed() && self.mode != ZoomMode::None {
            self.focus
        } else {
            FocusPoint::CENTER
        }
    }
}

//! Core types with newtype pattern for type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Time position in seconds (f64 precision).
///
/// A `TimeCode` carries no notion of which timeline it belongs to; callers
/// keep original-timeline and edited-timeline values apart by context.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeCode(pub f64);

impl TimeCode {
    pub const ZERO: Self = Self(0.0);

    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Whether the value is a usable time (finite, not NaN).
    pub fn is_valid(self) -> bool {
        self.0.is_finite()
    }

    /// Clamp negative values to zero.
    pub fn non_negative(self) -> Self {
        Self(self.0.max(0.0))
    }

    /// Absolute distance between two time positions in seconds.
    pub fn distance(self, other: Self) -> f64 {
        (self.0 - other.0).abs()
    }

    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0.max(0.0);
        let mins = (total_secs / 60.0).floor() as u64;
        let secs = (total_secs % 60.0).floor() as u64;
        write!(f, "{mins}:{secs:02}")
    }
}

/// Normalized (x, y) point inside the video frame, both axes in [0, 1].
///
/// Used as the transform origin of a zoom.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusPoint {
    pub x: f64,
    pub y: f64,
}

impl FocusPoint {
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Build a focus point, clamping both axes into [0, 1].
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    /// Largest per-axis distance to another point.
    pub fn max_axis_distance(self, other: Self) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Default for FocusPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Zoom factor applied to the video frame (1.0 = no zoom).
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ZoomLevel(pub f64);

impl ZoomLevel {
    pub const MIN: Self = Self(1.0);
    pub const MAX: Self = Self(5.0);

    /// Build a zoom level clamped to [`ZoomLevel::MIN`, `ZoomLevel::MAX`].
    pub fn new(level: f64) -> Self {
        Self::clamped(level, Self::MIN.0, Self::MAX.0)
    }

    /// Build a zoom level clamped to a custom range.
    pub fn clamped(level: f64, min: f64, max: f64) -> Self {
        if level.is_nan() {
            return Self(min);
        }
        Self(level.clamp(min, max))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Whether the frame is magnified at all.
    pub fn is_zoomed(self) -> bool {
        self.0 > 1.0
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}x", self.0)
    }
}

static NEXT_ZOOM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a recorded zoom event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoomId(pub u64);

impl ZoomId {
    /// Allocate the next identifier. Identifiers increase monotonically, so a
    /// larger id always belongs to a later recording.
    pub fn next() -> Self {
        Self(NEXT_ZOOM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ZoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zoom-{}", self.0)
    }
}

/// Server-side editing session identifier, as returned by the upload service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

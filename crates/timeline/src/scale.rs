//! Timeline scale geometry: cursor position, time markers, cut overlay and
//! savings summary. All positions are fractions of the timeline width in [0, 1].

use serde::{Deserialize, Serialize};
use wc_common::TimeCode;

use crate::cut::CutInterval;
use crate::remap::Remapper;

/// Cursor position as a fraction of `duration`.
///
/// Returns `None` when the duration is unknown (zero, negative or non-finite),
/// which hides the cursor.
pub fn cursor_fraction(time: TimeCode, duration: TimeCode) -> Option<f64> {
    let d = duration.as_secs();
    if !d.is_finite() || d <= 0.0 || !time.is_valid() {
        return None;
    }
    Some((time.as_secs() / d).clamp(0.0, 1.0))
}

/// One tick on the timeline scale.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleMarker {
    /// Time on the timeline being drawn.
    pub time: TimeCode,
    /// For an edited timeline, the original time the tick corresponds to.
    pub original_time: Option<TimeCode>,
    pub fraction: f64,
}

impl ScaleMarker {
    /// Marker label: `m:ss`, or `m:ss (m:ss)` when the original time differs.
    pub fn label(&self) -> String {
        match self.original_time {
            Some(orig) if orig != self.time => format!("{} ({})", self.time, orig),
            _ => self.time.to_string(),
        }
    }
}

/// Build scale markers for a timeline of `duration` seconds.
///
/// Ticks are placed every `max(1, floor(duration / max_markers))` whole
/// seconds starting at zero. When `remapper` is given the timeline is the
/// edited one and each marker also carries its original time.
pub fn scale_markers(
    duration: TimeCode,
    max_markers: u32,
    remapper: Option<&Remapper>,
) -> Vec<ScaleMarker> {
    let d = duration.as_secs();
    if !d.is_finite() || d <= 0.0 {
        return Vec::new();
    }

    let interval = (d / f64::from(max_markers.max(1))).floor().max(1.0);
    let mut markers = Vec::new();
    let mut i = 0.0;
    while i <= d {
        let time = TimeCode::from_secs(i);
        markers.push(ScaleMarker {
            time,
            original_time: remapper.map(|r| r.to_original(time)),
            fraction: i / d,
        });
        i += interval;
    }
    markers
}

/// Shaded region of a cut on the original timeline.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutOverlay {
    pub cut: CutInterval,
    pub start_fraction: f64,
    pub width_fraction: f64,
}

/// Overlay geometry for every cut, sorted by start. Empty for an unknown duration.
pub fn cut_overlay(cuts: &[CutInterval], duration: TimeCode) -> Vec<CutOverlay> {
    let d = duration.as_secs();
    if !d.is_finite() || d <= 0.0 {
        return Vec::new();
    }

    let mut overlays: Vec<CutOverlay> = cuts
        .iter()
        .map(|cut| {
            let start = (cut.start.as_secs() / d).clamp(0.0, 1.0);
            let end = (cut.end.as_secs() / d).clamp(0.0, 1.0);
            CutOverlay {
                cut: *cut,
                start_fraction: start,
                width_fraction: (end - start).max(0.0),
            }
        })
        .collect();
    overlays.sort_by(|a, b| a.start_fraction.total_cmp(&b.start_fraction));
    overlays
}

/// Time removed by an edit, comparing the two players' durations.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutSavings {
    pub saved: TimeCode,
    /// Whole percent of the original duration removed.
    pub percent: u32,
}

impl CutSavings {
    pub fn between(original_duration: TimeCode, preview_duration: TimeCode) -> Self {
        let original = original_duration.as_secs();
        let saved = (original - preview_duration.as_secs()).max(0.0);
        let percent = if original > 0.0 {
            (saved / original * 100.0).round() as u32
        } else {
            0
        };
        Self {
            saved: TimeCode::from_secs(saved),
            percent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.saved.as_secs() <= 0.0
    }

    /// Summary like `Cuts: 0:12 (20%)`.
    pub fn summary(&self) -> String {
        format!("Cuts: {} ({}%)", self.saved, self.percent)
    }
}

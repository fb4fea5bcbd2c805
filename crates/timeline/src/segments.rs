//! Kept-segment plan: the inverse of a cut list.
//!
//! The edited video is the concatenation of the kept segments. Each segment
//! knows both its original span and where it lands on the edited timeline,
//! which lets an original-time window (a zoom event) be placed on the edited
//! timeline without going through the collapsing remapper.

use serde::{Deserialize, Serialize};
use wc_common::TimeCode;

use crate::cut::CutInterval;

/// A span of the original video that survives the edit.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeptSegment {
    pub original_start: TimeCode,
    pub original_end: TimeCode,
    pub edited_start: TimeCode,
    pub edited_end: TimeCode,
}

impl KeptSegment {
    pub fn duration(&self) -> f64 {
        self.original_end.as_secs() - self.original_start.as_secs()
    }

    /// Whether `time` lies within the original span, endpoints included.
    pub fn contains_original(&self, time: TimeCode) -> bool {
        self.original_start <= time && time <= self.original_end
    }

    /// Linear position of an original time inside this segment, on the edited timeline.
    fn project(&self, time: TimeCode) -> TimeCode {
        let span = self.duration();
        if span <= 0.0 {
            return self.edited_start;
        }
        let rel = (time.as_secs() - self.original_start.as_secs()) / span;
        let edited_span = self.edited_end.as_secs() - self.edited_start.as_secs();
        TimeCode::from_secs(self.edited_start.as_secs() + rel * edited_span)
    }
}

/// Compute the segments kept by an edit of a video of `duration` seconds.
///
/// `cuts` must be sorted ascending by start. Empty gaps are skipped; the final
/// segment runs to `duration`.
pub fn kept_segments(cuts: &[CutInterval], duration: TimeCode) -> Vec<KeptSegment> {
    let mut segments = Vec::with_capacity(cuts.len() + 1);
    let mut cursor = 0.0_f64;
    let mut edited = 0.0_f64;

    let mut push = |start: f64, end: f64, edited: &mut f64| {
        let len = end - start;
        segments.push(KeptSegment {
            original_start: TimeCode::from_secs(start),
            original_end: TimeCode::from_secs(end),
            edited_start: TimeCode::from_secs(*edited),
            edited_end: TimeCode::from_secs(*edited + len),
        });
        *edited += len;
    };

    for cut in cuts {
        let start = cut.start.as_secs().min(duration.as_secs());
        if start > cursor {
            push(cursor, start, &mut edited);
        }
        cursor = cursor.max(cut.end.as_secs());
    }

    if cursor < duration.as_secs() {
        push(cursor, duration.as_secs(), &mut edited);
    }

    segments
}

/// Map an original-time window onto the edited timeline.
///
/// Each endpoint is interpolated inside the kept segment containing it.
/// Returns `None` when either endpoint falls inside a cut or the mapped window
/// is empty.
pub fn map_window_to_edited(
    start: TimeCode,
    end: TimeCode,
    segments: &[KeptSegment],
) -> Option<(TimeCode, TimeCode)> {
    let mut mapped_start = None;
    let mut mapped_end = None;

    for seg in segments {
        if mapped_start.is_none() && seg.contains_original(start) {
            mapped_start = Some(seg.project(start));
        }
        if seg.contains_original(end) {
            mapped_end = Some(seg.project(end));
        }
    }

    match (mapped_start, mapped_end) {
        (Some(s), Some(e)) if s < e => Some((s, e)),
        _ => {
            tracing::debug!(
                start = %start,
                end = %end,
                "Window cannot be placed on the edited timeline"
            );
            None
        }
    }
}

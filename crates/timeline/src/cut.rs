//! Cut intervals on the original timeline.

use serde::{Deserialize, Serialize};
use wc_common::TimeCode;

/// A span of the original timeline that is removed from the edited video.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutInterval {
    pub start: TimeCode,
    pub end: TimeCode,
}

impl CutInterval {
    pub fn new(start: TimeCode, end: TimeCode) -> Self {
        Self { start, end }
    }

    pub fn from_secs(start: f64, end: f64) -> Self {
        Self::new(TimeCode::from_secs(start), TimeCode::from_secs(end))
    }

    /// Seconds removed by this cut. Never negative.
    pub fn duration(&self) -> f64 {
        (self.end.as_secs() - self.start.as_secs()).max(0.0)
    }

    /// Whether `time` lies strictly inside the cut.
    pub fn contains(&self, time: TimeCode) -> bool {
        self.start < time && time < self.end
    }

    /// Half-open overlap test. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &CutInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn is_valid(&self) -> bool {
        self.start.is_valid() && self.end.is_valid()
    }
}

/// Return the cuts sorted ascending by start.
///
/// Cuts with non-finite bounds are dropped with a warning. Cuts with
/// `end < start` are kept but contribute no duration.
pub fn sorted_cuts(cuts: &[CutInterval]) -> Vec<CutInterval> {
    let mut sorted: Vec<CutInterval> = cuts
        .iter()
        .filter(|cut| {
            let ok = cut.is_valid();
            if !ok {
                tracing::warn!(start = cut.start.as_secs(), end = cut.end.as_secs(), "Dropping cut with non-finite bounds");
            }
            ok
        })
        .copied()
        .collect();
    sorted.sort_by(|a, b| a.start.as_secs().total_cmp(&b.start.as_secs()));
    sorted
}

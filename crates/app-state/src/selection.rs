//! Cut selection management.
//!
//! Selections are kept in insertion order. Anything that remaps time or is
//! sent to the edit service uses [`SelectionManager::sorted_by_start`] or
//! [`SelectionManager::cuts`], never the insertion order.

use serde::{Deserialize, Serialize};
use wc_common::{SelectionError, TimeCode};
use wc_timeline::{sorted_cuts, CutInterval};
use wc_transcript::Transcript;

/// A user-marked span of the transcript to remove from the video.
///
/// Serializes in the edit service's shape: `{start, end, text, startIdx, endIdx}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutSelection {
    /// Start on the original timeline (start of the first covered item).
    #[serde(rename = "start")]
    pub start_time: TimeCode,
    /// End on the original timeline (end of the last covered item).
    #[serde(rename = "end")]
    pub end_time: TimeCode,
    pub text: String,
    /// First covered transcript index (inclusive).
    #[serde(rename = "startIdx")]
    pub start_index: usize,
    /// Last covered transcript index (inclusive).
    #[serde(rename = "endIdx")]
    pub end_index: usize,
}

impl CutSelection {
    pub fn interval(&self) -> CutInterval {
        CutInterval::new(self.start_time, self.end_time)
    }

    pub fn duration(&self) -> f64 {
        self.interval().duration()
    }

    /// Whether the transcript item at `index` is covered by this selection.
    pub fn covers_index(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index
    }
}

/// Owns the set of cut selections.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SelectionManager {
    selections: Vec<CutSelection>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selection covering transcript items `a..=b` (in either order).
    ///
    /// Rejects out-of-range indices, zero-length spans, and spans that overlap
    /// an existing selection. Touching selections are allowed.
    pub fn add(&mut self, a: usize, b: usize, transcript: &Transcript) -> Result<CutSelection, SelectionError> {
        if transcript.is_empty() {
            return Err(SelectionError::EmptyTranscript);
        }
        let (start_index, end_index) = if a <= b { (a, b) } else { (b, a) };
        let len = transcript.len();
        let (first, last) = match (transcript.get(start_index), transcript.get(end_index)) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(SelectionError::IndexOutOfRange {
                    index: end_index,
                    len,
                })
            }
        };

        let start_time = first.start;
        let end_time = last.end;
        if end_time.as_secs() <= start_time.as_secs() {
            return Err(SelectionError::EmptyInterval {
                start: start_time.as_secs(),
                end: end_time.as_secs(),
            });
        }

        let candidate = CutInterval::new(start_time, end_time);
        if let Some(existing) = self.selections.iter().find(|s| s.interval().overlaps(&candidate)) {
            return Err(SelectionError::Overlap {
                start: start_time.as_secs(),
                end: end_time.as_secs(),
                existing_start: existing.start_time.as_secs(),
                existing_end: existing.end_time.as_secs(),
            });
        }

        let selection = CutSelection {
            start_time,
            end_time,
            text: transcript.text_between(start_index, end_index),
            start_index,
            end_index,
        };
        tracing::debug!(
            start = %start_time,
            end = %end_time,
            start_index,
            end_index,
            "Selection added"
        );
        self.selections.push(selection.clone());
        Ok(selection)
    }

    /// Remove the selection at list position `position`. Neighbours are not merged.
    pub fn remove(&mut self, position: usize) -> Result<CutSelection, SelectionError> {
        if position >= self.selections.len() {
            return Err(SelectionError::NotFound { position });
        }
        let removed = self.selections.remove(position);
        tracing::debug!(position, start = %removed.start_time, "Selection removed");
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.selections.clear();
        tracing::debug!("Selections cleared");
    }

    /// Selections in insertion order.
    pub fn selections(&self) -> &[CutSelection] {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// A new ordering of the selections, ascending by start time.
    pub fn sorted_by_start(&self) -> Vec<CutSelection> {
        let mut sorted = self.selections.clone();
        sorted.sort_by(|a, b| a.start_time.as_secs().total_cmp(&b.start_time.as_secs()));
        sorted
    }

    /// Cut intervals, sorted ascending by start.
    pub fn cuts(&self) -> Vec<CutInterval> {
        let intervals: Vec<CutInterval> = self.selections.iter().map(CutSelection::interval).collect();
        sorted_cuts(&intervals)
    }

    /// List position of the selection covering transcript item `index`.
    pub fn position_covering(&self, index: usize) -> Option<usize> {
        self.selections.iter().position(|s| s.covers_index(index))
    }

    /// Per-item flag: is transcript item `i` covered by any selection.
    pub fn index_mask(&self, len: usize) -> Vec<bool> {
        let mut mask = vec![false; len];
        for selection in &self.selections {
            let end = selection.end_index.min(len.saturating_sub(1));
            for flag in mask.iter_mut().take(end + 1).skip(selection.start_index) {
                *flag = true;
            }
        }
        mask
    }
}

//! Adjusted transcript construction.
//!
//! Each item is classified against every cut in ascending order, using the
//! original coordinates of both:
//!
//! - cut entirely before the item: both bounds shift left by the cut's duration
//! - cut entirely inside the item: only the end shrinks
//! - item entirely before the cut: done (later cuts start even later)
//! - any other overlap: the item is removed
//!
//! The resulting bounds equal `to_edited_time` applied to the item's bounds.

use wc_common::TimeCode;
use wc_timeline::CutInterval;

use crate::types::{AdjustedItem, AdjustedTranscript, Transcript, TranscriptItem};

/// Build the adjusted transcript for `cuts` (sorted ascending by start).
pub fn build_adjusted(transcript: &Transcript, cuts: &[CutInterval]) -> AdjustedTranscript {
    let adjusted: Vec<AdjustedItem> = transcript
        .iter()
        .enumerate()
        .map(|(index, item)| adjust_item(index, item, cuts))
        .filter(|a| !a.removed)
        .collect();

    tracing::debug!(
        original = transcript.len(),
        kept = adjusted.len(),
        cuts = cuts.len(),
        "Rebuilt adjusted transcript"
    );

    AdjustedTranscript::from_items(adjusted)
}

/// Classify one item against the cut list.
pub fn adjust_item(index: usize, item: &TranscriptItem, cuts: &[CutInterval]) -> AdjustedItem {
    let start = item.start.as_secs();
    let end = item.end.as_secs();
    let mut shift = 0.0;
    let mut shrink = 0.0;
    let mut removed = false;

    for cut in cuts {
        let (cut_start, cut_end) = (cut.start.as_secs(), cut.end.as_secs());
        if start >= cut_end {
            shift += cut.duration();
        } else if end <= cut_start {
            break;
        } else if start < cut_start && cut_end < end {
            shrink += cut.duration();
        } else {
            removed = true;
            break;
        }
    }

    let mut adjusted = item.clone();
    if !removed {
        adjusted.start = TimeCode::from_secs((start - shift).max(0.0));
        adjusted.end = TimeCode::from_secs((end - shift - shrink).max(0.0));
    }

    AdjustedItem {
        item: adjusted,
        original_index: index,
        removed,
    }
}

/// Per-item flag telling whether each original item is removed by `cuts`.
pub fn cut_mask(transcript: &Transcript, cuts: &[CutInterval]) -> Vec<bool> {
    transcript
        .iter()
        .enumerate()
        .map(|(index, item)| adjust_item(index, item, cuts).removed)
        .collect()
}

//! Time-based lookups over transcript sequences.
//!
//! Lookups degrade to the closest available item instead of failing; `None`
//! is returned only when there is nothing to search.

use wc_common::{MatchConfig, TimeCode};
use wc_timeline::Remapper;

use crate::types::{AdjustedTranscript, Timed, Transcript, TranscriptItem};

fn sanitize(time: TimeCode) -> TimeCode {
    if time.is_valid() {
        time
    } else {
        tracing::warn!(time = time.as_secs(), "Non-finite lookup time, using 0");
        TimeCode::ZERO
    }
}

fn is_cut(mask: &[bool], index: usize) -> bool {
    mask.get(index).copied().unwrap_or(false)
}

/// First item whose span contains `time` (endpoints included).
pub fn find_by_time<T: Timed>(items: &[T], time: TimeCode) -> Option<usize> {
    let time = sanitize(time);
    items.iter().position(|item| item.start() <= time && time <= item.end())
}

/// Item to highlight at `time`, skipping items flagged in `cut_mask`.
///
/// An uncut item spanning `time` wins; otherwise the uncut item whose start
/// is nearest to `time`. A mask shorter than `items` treats the rest as uncut.
pub fn find_closest_uncut<T: Timed>(items: &[T], cut_mask: &[bool], time: TimeCode) -> Option<usize> {
    let time = sanitize(time);

    let exact = items
        .iter()
        .enumerate()
        .filter(|(i, _)| !is_cut(cut_mask, *i))
        .find(|(_, item)| item.start() <= time && time <= item.end())
        .map(|(i, _)| i);
    if exact.is_some() {
        return exact;
    }

    let closest = items
        .iter()
        .enumerate()
        .filter(|(i, _)| !is_cut(cut_mask, *i))
        .min_by(|(_, a), (_, b)| a.start().distance(time).total_cmp(&b.start().distance(time)))
        .map(|(i, _)| i);

    match closest {
        Some(index) => tracing::debug!(time = %time, index, "No exact item, using closest uncut"),
        None => tracing::debug!(time = %time, "No uncut item to highlight"),
    }
    closest
}

/// First uncut item starting at or after `time`.
pub fn next_uncut_at_or_after<T: Timed>(items: &[T], cut_mask: &[bool], time: TimeCode) -> Option<usize> {
    let time = sanitize(time);
    items
        .iter()
        .enumerate()
        .find(|(i, item)| !is_cut(cut_mask, *i) && item.start() >= time)
        .map(|(i, _)| i)
}

/// Position in `adjusted` of the original item `original_index`, if it survived the cuts.
pub fn find_adjusted_for_original(adjusted: &AdjustedTranscript, original_index: usize) -> Option<usize> {
    adjusted
        .items()
        .binary_search_by_key(&original_index, |a| a.original_index)
        .ok()
}

/// Best-effort match of an edited-timeline item back to the original transcript.
///
/// Prefer the `original_index` carried by [`AdjustedTranscript`] items; this
/// is for items that arrive without one. Text is not unique, so matching is
/// approximate:
///
/// 1. silences: nearest original silence within `silence_window_secs`
/// 2. words: nearest equal word within `word_window_secs`, else the first equal word
/// 3. otherwise the item whose start is nearest overall
pub fn map_adjusted_to_original(
    original: &Transcript,
    item: &TranscriptItem,
    remapper: &Remapper,
    matching: &MatchConfig,
) -> Option<usize> {
    let target = remapper.to_original(sanitize(item.start));
    let distance = |candidate: &TranscriptItem| candidate.start.distance(target);

    let nearest = |pred: &dyn Fn(&TranscriptItem) -> bool| {
        original
            .iter()
            .enumerate()
            .filter(|(_, c)| pred(*c))
            .min_by(|(_, a), (_, b)| distance(*a).total_cmp(&distance(*b)))
    };

    match item.text() {
        None => {
            if let Some((i, c)) = nearest(&|c: &TranscriptItem| c.is_silence()) {
                if distance(c) < matching.silence_window_secs {
                    return Some(i);
                }
            }
        }
        Some(text) => {
            if let Some((i, c)) = nearest(&|c: &TranscriptItem| c.text() == Some(text)) {
                if distance(c) < matching.word_window_secs {
                    return Some(i);
                }
                tracing::debug!(word = text, "Word match outside time window, using first occurrence");
                return original.iter().position(|c| c.text() == Some(text));
            }
        }
    }

    nearest(&|_: &TranscriptItem| true).map(|(i, _)| i)
}

/// Inclusive transcript index range covered by an original-time window.
///
/// The range starts at the first item spanning `start` (else the item just
/// before the first one starting after it) and ends at the last item ending
/// by `end` (else the item just after the last one ending before it).
pub fn span_for_window(items: &[TranscriptItem], start: TimeCode, end: TimeCode) -> Option<(usize, usize)> {
    if items.is_empty() {
        return None;
    }
    let last = items.len() - 1;

    let start_index = items
        .iter()
        .position(|item| item.start <= start && item.end >= start)
        .or_else(|| {
            items
                .iter()
                .position(|item| item.start > start)
                .map(|i| i.saturating_sub(1))
        })
        .unwrap_or(0);

    let end_index = items
        .iter()
        .rposition(|item| item.end <= end)
        .or_else(|| items.iter().rposition(|item| item.end < end).map(|i| (i + 1).min(last)))
        .unwrap_or(last);

    Some((start_index, end_index.max(start_index)))
}

//! `wc-transcript` -- Word-level transcript model for the wordcut editor.
//!
//! - **Model**: [`Transcript`] (original timeline) and [`AdjustedTranscript`]
//!   (edited timeline, removed items filtered out, original index carried)
//! - **Wire format**: conversion from/to the upload service's entries
//! - **Adjustment**: [`build_adjusted`] for a sorted cut list
//! - **Lookups**: by time, closest uncut item, adjusted/original mapping

pub mod adjust;
pub mod lookup;
pub mod types;
pub mod wire;

pub use adjust::{adjust_item, build_adjusted, cut_mask};
pub use lookup::{
    find_adjusted_for_original, find_by_time, find_closest_uncut, map_adjusted_to_original,
    next_uncut_at_or_after, span_for_window,
};
pub use types::{AdjustedItem, AdjustedTranscript, ItemKind, Timed, Transcript, TranscriptItem};
pub use wire::{RawTranscriptEntry, SILENCE_WORD};

//! `wc-timeline` -- Original/edited timeline arithmetic for the wordcut editor.
//!
//! A cut list removes spans of the original video. This crate answers every
//! question that depends only on that list:
//!
//! - **Remapping**: original time to edited time and back ([`Remapper`])
//! - **Kept segments**: the spans that survive, and where they land
//! - **Scale geometry**: cursor fraction, time markers, cut overlay, savings
//!
//! ```text
//!   original  0 ─────── 2 ░░░░ 4 ──────────── 10 ░░░░ 12 ────── 20
//!   edited    0 ─────── 2 ──────────── 8 ────── 16
//! ```
//!
//! # Usage
//!
//! ```rust
//! use wc_timeline::{CutInterval, Remapper};
//! use wc_common::TimeCode;
//!
//! let remapper = Remapper::new(&[CutInterval::from_secs(2.0, 4.0)]);
//! assert_eq!(remapper.to_edited(TimeCode::from_secs(6.0)), TimeCode::from_secs(4.0));
//! ```

pub mod cut;
pub mod remap;
pub mod scale;
pub mod segments;

// Re-export primary API
pub use cut::{sorted_cuts, CutInterval};
pub use remap::{to_edited_time, to_original_time, Remapper};
pub use scale::{cursor_fraction, cut_overlay, scale_markers, CutOverlay, CutSavings, ScaleMarker};
pub use segments::{kept_segments, map_window_to_edited, KeptSegment};

//! Transcript data model.
//!
//! A [`Transcript`] is the ordered word/silence sequence produced by the
//! transcription service, indexed by original position. An
//! [`AdjustedTranscript`] is derived from it for a given cut list and is
//! never patched in place: it is rebuilt whenever the cuts change.

use serde::{Deserialize, Serialize};
use wc_common::TimeCode;

/// What a transcript item represents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemKind {
    Word { text: String },
    Silence,
}

/// One word or silence gap, timed on the original timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptItem {
    pub kind: ItemKind,
    pub start: TimeCode,
    pub end: TimeCode,
}

impl TranscriptItem {
    pub fn word(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            kind: ItemKind::Word { text: text.into() },
            start: TimeCode::from_secs(start),
            end: TimeCode::from_secs(end),
        }
    }

    pub fn silence(start: f64, end: f64) -> Self {
        Self {
            kind: ItemKind::Silence,
            start: TimeCode::from_secs(start),
            end: TimeCode::from_secs(end),
        }
    }

    pub fn is_silence(&self) -> bool {
        matches!(self.kind, ItemKind::Silence)
    }

    /// Word form, or `None` for a silence.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Word { text } => Some(text),
            ItemKind::Silence => None,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.as_secs() - self.start.as_secs()).max(0.0)
    }

    /// Whether `time` lies within the item, endpoints included.
    pub fn spans(&self, time: TimeCode) -> bool {
        self.start <= time && time <= self.end
    }

    /// Text shown for the item: the word itself, or `[1.5s silence]`.
    pub fn display_text(&self) -> String {
        match &self.kind {
            ItemKind::Word { text } => text.clone(),
            ItemKind::Silence => format!("[{:.1}s silence]", self.duration()),
        }
    }
}

/// Anything with a start/end span on some timeline.
pub trait Timed {
    fn start(&self) -> TimeCode;
    fn end(&self) -> TimeCode;
}

impl Timed for TranscriptItem {
    fn start(&self) -> TimeCode {
        self.start
    }
    fn end(&self) -> TimeCode {
        self.end
    }
}

/// The ordered original transcript.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    items: Vec<TranscriptItem>,
}

impl Transcript {
    pub fn new(items: Vec<TranscriptItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[TranscriptItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&TranscriptItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptItem> {
        self.items.iter()
    }

    /// End time of the last item, or zero for an empty transcript.
    pub fn duration(&self) -> TimeCode {
        self.items.last().map_or(TimeCode::ZERO, |item| item.end)
    }

    /// Space-joined display text of the inclusive index range.
    ///
    /// Out-of-range bounds are clipped to the transcript.
    pub fn text_between(&self, start_index: usize, end_index: usize) -> String {
        if self.items.is_empty() || start_index > end_index {
            return String::new();
        }
        let last = end_index.min(self.items.len() - 1);
        self.items
            .get(start_index..=last)
            .unwrap_or_default()
            .iter()
            .map(|item| item.display_text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An item of the adjusted transcript, timed on the edited timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustedItem {
    pub item: TranscriptItem,
    /// Position of the source item in the original transcript.
    pub original_index: usize,
    /// Set when the item overlaps a cut. Removed items are filtered out of
    /// an [`AdjustedTranscript`]; the flag is kept for callers that build
    /// their own views.
    pub removed: bool,
}

impl Timed for AdjustedItem {
    fn start(&self) -> TimeCode {
        self.item.start
    }
    fn end(&self) -> TimeCode {
        self.item.end
    }
}

/// The transcript as it plays back in the edited video.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustedTranscript {
    items: Vec<AdjustedItem>,
}

impl AdjustedTranscript {
    pub(crate) fn from_items(items: Vec<AdjustedItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[AdjustedItem] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<&AdjustedItem> {
        self.items.get(position)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjustedItem> {
        self.items.iter()
    }

    /// Original transcript index of the item at `position`.
    pub fn original_index(&self, position: usize) -> Option<usize> {
        self.items.get(position).map(|a| a.original_index)
    }
}

//! Transcript wire format, as returned by the upload service:
//! `{word, start, end, is_silence, duration?}`.

use serde::{Deserialize, Serialize};

use crate::types::{ItemKind, Transcript, TranscriptItem};

/// Word text the transcription service uses for silence entries.
pub const SILENCE_WORD: &str = "[silence]";

/// One transcript entry as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTranscriptEntry {
    #[serde(default)]
    pub word: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub is_silence: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Transcript {
    /// Build a transcript from wire entries.
    ///
    /// Entries with non-finite times or `start > end` are dropped with a warning.
    pub fn from_wire(entries: &[RawTranscriptEntry]) -> Self {
        let mut items = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if !entry.start.is_finite() || !entry.end.is_finite() {
                tracing::warn!(index = i, "Dropping transcript entry with non-finite times");
                continue;
            }
            if entry.start > entry.end {
                tracing::warn!(
                    index = i,
                    start = entry.start,
                    end = entry.end,
                    "Dropping transcript entry that ends before it starts"
                );
                continue;
            }
            let item = if entry.is_silence {
                TranscriptItem::silence(entry.start, entry.end)
            } else {
                TranscriptItem::word(entry.word.trim(), entry.start, entry.end)
            };
            items.push(item);
        }
        tracing::debug!(items = items.len(), dropped = entries.len() - items.len(), "Built transcript");
        Self::new(items)
    }

    /// Serialize back to wire entries. Silence durations are rounded to one decimal.
    pub fn to_wire(&self) -> Vec<RawTranscriptEntry> {
        self.iter()
            .map(|item| match &item.kind {
                ItemKind::Word { text } => RawTranscriptEntry {
                    word: text.clone(),
                    start: item.start.as_secs(),
                    end: item.end.as_secs(),
                    is_silence: false,
                    duration: None,
                },
                ItemKind::Silence => RawTranscriptEntry {
                    word: SILENCE_WORD.to_string(),
                    start: item.start.as_secs(),
                    end: item.end.as_secs(),
                    is_silence: true,
                    duration: Some((item.duration() * 10.0).round() / 10.0),
                },
            })
            .collect()
    }
}

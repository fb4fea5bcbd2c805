//! Editor configuration: preview scheduling, zoom gestures, transcript
//! matching windows and timeline layout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EditorResult;

/// Top-level editor configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Quiet period after the last edit before a preview is requested.
    pub preview_debounce_ms: u64,
    /// Regenerate the preview automatically after selection/zoom changes.
    pub auto_preview: bool,
    pub zoom: ZoomConfig,
    pub matching: MatchConfig,
    pub timeline: TimelineConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            preview_debounce_ms: 2000,
            auto_preview: false,
            zoom: ZoomConfig::default(),
            matching: MatchConfig::default(),
            timeline: TimelineConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> EditorResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }
}

/// Zoom gesture settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    pub min_level: f64,
    pub max_level: f64,
    /// Minimum focus movement (normalized) before a recording update is kept.
    pub position_threshold: f64,
    /// Minimum zoom-level change before a recording update is kept.
    pub level_threshold: f64,
    /// Level toggled to by a click in simple mode.
    pub click_level: f64,
    /// Level change per wheel notch.
    pub wheel_step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_level: 1.0,
            max_level: 5.0,
            position_threshold: 0.01,
            level_threshold: 0.1,
            click_level: 2.0,
            wheel_step: 0.25,
        }
    }
}

/// Windows used when matching an adjusted item back to the original transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchConfig {
    pub silence_window_secs: f64,
    pub word_window_secs: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            silence_window_secs: 0.1,
            word_window_secs: 5.0,
        }
    }
}

/// Timeline scale settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    pub max_markers: u32,
    /// Duration assumed for the scale before any media metadata arrives.
    pub fallback_duration_secs: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            max_markers: 10,
            fallback_duration_secs: 60.0,
        }
    }
}

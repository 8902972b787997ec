//! Tunable settings for both perception loops.
//!
//! Every field has a working default; a settings file only needs the keys it
//! wants to override. Binaries take the file path as their first argument.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifierConfig {
    /// Render tick period in milliseconds.
    pub tick_interval_ms: u64,

    /// Half-extent of the capture window around the cursor, horizontal.
    pub half_extent_x: u32,

    /// Half-extent of the capture window around the cursor, vertical.
    pub half_extent_y: u32,

    /// Zoom bounds; any command sequence keeps the scale inside them.
    pub min_scale: f32,
    pub max_scale: f32,

    /// Scale change per zoom_in / zoom_out command.
    pub zoom_step: f32,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 30,
            half_extent_x: 200,
            half_extent_y: 150,
            min_scale: 2.5,
            max_scale: 5.0,
            zoom_step: 0.1,
        }
    }
}

impl MagnifierConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The overlay viewport matches the unscaled capture extent.
    pub fn viewport(&self) -> (u32, u32) {
        (self.half_extent_x * 2, self.half_extent_y * 2)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// OCR cycle period in milliseconds. Independent of (and slower than)
    /// the magnifier tick.
    pub cycle_interval_ms: u64,

    /// Capture window around the cursor for text recognition.
    pub capture_width: u32,
    pub capture_height: u32,

    /// Recognized strings shorter than this are capture noise, not text.
    pub min_text_chars: usize,

    /// Consecutive identical reads required before narrating.
    pub stable_reads: u32,

    /// Upper bound on a single recognition call; a cycle that exceeds it is
    /// skipped like any other transient failure.
    pub ocr_timeout_ms: u64,

    /// Tesseract language code.
    pub language: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            cycle_interval_ms: 700,
            capture_width: 600,
            capture_height: 250,
            min_text_chars: 4,
            stable_reads: 3,
            ocr_timeout_ms: 10_000,
            language: "eng".to_string(),
        }
    }
}

impl ReaderConfig {
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_millis(self.ocr_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Speech rate in words per minute.
    pub rate_wpm: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self { rate_wpm: 170.0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub magnifier: MagnifierConfig,
    pub reader: ReaderConfig,
    pub speech: SpeechConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings from {}", path.display()))
    }

    /// Load from `path` when given, falling back to defaults (with a warning)
    /// when the file is missing or malformed.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Settings::load(path).unwrap_or_else(|err| {
                warn!("{err:#}; using default settings");
                Settings::default()
            }),
            None => Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.magnifier.tick_interval_ms, 30);
        assert_eq!(settings.magnifier.viewport(), (400, 300));
        assert_eq!(settings.reader.cycle_interval_ms, 700);
        assert_eq!(settings.reader.stable_reads, 3);
        assert_eq!(settings.speech.rate_wpm, 170.0);
    }

    #[test]
    fn partial_settings_file_keeps_defaults_elsewhere() {
        let settings: Settings =
            serde_json::from_str(r#"{"magnifier": {"min_scale": 2.0}}"#).unwrap();
        assert_eq!(settings.magnifier.min_scale, 2.0);
        assert_eq!(settings.magnifier.max_scale, 5.0);
        assert_eq!(settings.reader.language, "eng");
    }
}

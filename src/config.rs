//! Settings threaded through quantization, slicing and export
//!
//! There is no global resolution: callers build a `Settings` (or load one
//! from a YAML/JSON file) and pass it to the constructors that quantize.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::{Span, SpanOptions, Time};
use crate::renderers::midi::defaults::{DEFAULT_PROGRAM, DEFAULT_TEMPO_BPM, DEFAULT_TPQ, DEFAULT_VELOCITY};

/// Default time grid: 1/48 of a beat holds both 1/16 and triplet subdivisions
pub const DEFAULT_RESOLUTION: f64 = 1.0 / 48.0;

/// Default slice width for feature extraction, in beats
pub const DEFAULT_SLICE_RESOLUTION: f64 = 1.0;

/// Tolerance when checking a padded span against its requested length
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.0001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported settings file extension: {0}")]
    UnsupportedFormat(String),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Grid for onsets and durations, in beats. `None` keeps raw values.
    pub resolution: Option<f64>,

    /// Width of the windows produced by `Span::generate_slices`
    pub slice_resolution: f64,

    /// Allowed slack between a span's content and its requested length
    pub length_tolerance: f64,

    pub midi: MidiSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MidiSettings {
    /// Ticks per quarter note
    pub tpq: u16,
    pub tempo_bpm: f64,
    pub velocity: u8,
    pub program: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            resolution: Some(DEFAULT_RESOLUTION),
            slice_resolution: DEFAULT_SLICE_RESOLUTION,
            length_tolerance: DEFAULT_LENGTH_TOLERANCE,
            midi: MidiSettings::default(),
        }
    }
}

impl Default for MidiSettings {
    fn default() -> Self {
        MidiSettings {
            tpq: DEFAULT_TPQ,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            velocity: DEFAULT_VELOCITY,
            program: DEFAULT_PROGRAM,
        }
    }
}

impl Settings {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(s)?;
        settings.validate()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(s)?;
        settings.validate()
    }

    /// Load settings from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();
        log::debug!("Loading settings from {}", path.display());
        match extension.as_str() {
            "yaml" | "yml" => Settings::from_yaml_str(&contents),
            "json" => Settings::from_json_str(&contents),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn validate(self) -> Result<Self> {
        if let Some(resolution) = self.resolution {
            if !(resolution > 0.0) {
                return Err(ConfigError::Invalid(format!("resolution must be positive, got {}", resolution)));
            }
        }
        if !(self.slice_resolution > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "slice_resolution must be positive, got {}",
                self.slice_resolution
            )));
        }
        if self.length_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "length_tolerance must not be negative, got {}",
                self.length_tolerance
            )));
        }
        if self.midi.tpq == 0 {
            return Err(ConfigError::Invalid("midi.tpq must be positive".to_string()));
        }
        Ok(self)
    }

    /// A time on this settings' grid
    pub fn time(&self, beats: f64) -> Time {
        Time::new(beats, self.resolution)
    }

    /// Span construction options using this settings' tolerance
    pub fn span_options(&self, length: Option<f64>) -> SpanOptions {
        SpanOptions {
            length,
            sort: true,
            tolerance: self.length_tolerance,
        }
    }

    /// Slices of `span` at the configured slice resolution
    pub fn slices<'a>(&self, span: &'a Span) -> crate::models::Result<crate::models::Slices<'a>> {
        span.generate_slices(self.slice_resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.resolution, Some(1.0 / 48.0));
        assert_eq!(settings.slice_resolution, 1.0);
        assert_eq!(settings.length_tolerance, 0.0001);
        assert_eq!(settings.midi.tpq, 480);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml_str("slice_resolution: 0.5\nmidi:\n  tempo_bpm: 90.0\n").unwrap();
        assert_eq!(settings.slice_resolution, 0.5);
        assert_eq!(settings.midi.tempo_bpm, 90.0);
        assert_eq!(settings.midi.tpq, 480);
        assert_eq!(settings.resolution, Some(1.0 / 48.0));
    }

    #[test]
    fn test_unquantized_json() {
        let settings = Settings::from_json_str(r#"{"resolution": null}"#).unwrap();
        assert_eq!(settings.resolution, None);
        assert!(!settings.time(0.3).is_quantized());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_yaml_str("resolution: 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json_str(r#"{"slice_resolution": -1.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(Settings::from_json_str("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("settings.yaml");
        std::fs::write(&yaml, "resolution: 0.25\n").unwrap();
        assert_eq!(Settings::load(&yaml).unwrap().resolution, Some(0.25));

        let json = dir.path().join("settings.json");
        std::fs::write(&json, r#"{"length_tolerance": 0.01}"#).unwrap();
        assert_eq!(Settings::load(&json).unwrap().length_tolerance, 0.01);

        let toml = dir.path().join("settings.toml");
        std::fs::write(&toml, "").unwrap();
        assert!(matches!(Settings::load(&toml), Err(ConfigError::UnsupportedFormat(_))));

        assert!(matches!(
            Settings::load(dir.path().join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}

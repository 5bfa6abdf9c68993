//! Editor configuration
//!
//! Loaded from TOML. Every field is optional; missing fields fall back to
//! the values in [`crate::constants`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::Result;
use crate::model::TimingWindow;
use crate::tracks::Intensity;

/// Tunable limits for the editing engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Timing windows remembered per word
    pub history_limit: usize,
    /// Minimum gap between a window's start and end, in seconds
    pub min_timing_gap: f64,
    /// Intensity given to tracks added without one
    pub default_intensity: Intensity,
    /// Track timing used when the word has no timing history
    pub default_track_timing: TimingWindow,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: constants::timing::HISTORY_LIMIT,
            min_timing_gap: constants::timing::MIN_GAP_SECS,
            default_intensity: Intensity::default(),
            default_track_timing: TimingWindow {
                start: constants::timing::DEFAULT_TRACK_START,
                end: constants::timing::DEFAULT_TRACK_END,
            },
        }
    }
}

impl EditorConfig {
    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: EditorConfig = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load the given file, else `~/.wordcue/config.toml`, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading editor config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Location of the user-level config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| {
            home.join(constants::config::CONFIG_DIR_NAME)
                .join(constants::config::CONFIG_FILE_NAME)
        })
    }

    /// Bring out-of-range values back to something the engine can honour
    fn sanitized(mut self) -> Self {
        if self.history_limit == 0 {
            tracing::warn!("history_limit must be at least 1, using 1");
            self.history_limit = 1;
        }
        if self.min_timing_gap.is_nan() || self.min_timing_gap <= 0.0 {
            tracing::warn!(
                min_timing_gap = self.min_timing_gap,
                "min_timing_gap must be positive, using default"
            );
            self.min_timing_gap = constants::timing::MIN_GAP_SECS;
        }
        self.default_intensity =
            Intensity::clamped(self.default_intensity.min, self.default_intensity.max);
        self.default_track_timing = TimingWindow::clamped(
            self.default_track_timing.start,
            self.default_track_timing.end,
            self.min_timing_gap,
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.history_limit, 50);
        assert!((config.min_timing_gap - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.default_intensity, Intensity { min: 0.3, max: 0.7 });
        assert_eq!(config.default_track_timing, TimingWindow { start: 0.0, end: 1.0 });
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml("history_limit = 10\n").unwrap();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.default_intensity, Intensity::default());
    }

    #[test]
    fn test_out_of_range_values_are_sanitized() {
        let config = EditorConfig::from_toml(
            r#"
            history_limit = 0
            min_timing_gap = -1.0

            [default_intensity]
            min = 0.9
            max = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.history_limit, 1);
        assert!((config.min_timing_gap - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.default_intensity.max, 1.0);
        assert!(config.default_intensity.min < config.default_intensity.max);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[default_track_timing]\nstart = 0.25\nend = 0.75").unwrap();

        let config = EditorConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(
            config.default_track_timing,
            TimingWindow { start: 0.25, end: 0.75 }
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EditorConfig::from_toml("history_limit = \"lots\"").is_err());
    }
}

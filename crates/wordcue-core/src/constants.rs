//! Editing limits and default values
//!
//! Centralized location for magic numbers used across the engine

/// Timing history limits
pub mod timing {
    /// Maximum number of timing windows remembered per word
    pub const HISTORY_LIMIT: usize = 50;

    /// Smallest allowed gap between a window's start and end, in seconds
    pub const MIN_GAP_SECS: f64 = 0.01;

    /// Timing used for a new track when the word has no timing history
    pub const DEFAULT_TRACK_START: f64 = 0.0;
    pub const DEFAULT_TRACK_END: f64 = 1.0;
}

/// Animation track limits
pub mod tracks {
    /// Tracks per word. Tied to the three-colour palette.
    pub const MAX_PER_WORD: usize = 3;

    /// Default intensity range for a new track
    pub const DEFAULT_INTENSITY_MIN: f64 = 0.3;
    pub const DEFAULT_INTENSITY_MAX: f64 = 0.7;

    /// Smallest allowed gap between intensity min and max
    pub const MIN_INTENSITY_GAP: f64 = 0.01;
}

/// Configuration file locations
pub mod config {
    /// Config directory name under the user's home
    pub const CONFIG_DIR_NAME: &str = ".wordcue";

    /// Config file name inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

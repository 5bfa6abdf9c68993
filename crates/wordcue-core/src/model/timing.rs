//! Timing windows in seconds

use serde::{Deserialize, Serialize};

/// A `[start, end)` window in seconds
///
/// Windows built through [`TimingWindow::clamped`] always satisfy
/// `end >= start + min_gap`. Violating writes are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingWindow {
    pub start: f64,
    pub end: f64,
}

impl TimingWindow {
    /// Build a window, pushing `end` out so it sits at least `min_gap`
    /// after `start`
    pub fn clamped(start: f64, end: f64, min_gap: f64) -> Self {
        Self {
            start,
            end: end.max(start + min_gap),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

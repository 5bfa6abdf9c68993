//! Animation track records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants;
use crate::model::TimingWindow;

/// Colour slot of a track, assigned by position within the word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackColor {
    A,
    B,
    C,
}

impl TrackColor {
    /// Colour for a 0-based slot index. `None` past the palette.
    pub fn for_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(TrackColor::A),
            1 => Some(TrackColor::B),
            2 => Some(TrackColor::C),
            _ => None,
        }
    }
}

/// Intensity range of a track, both ends in `[0, 1]` with `min < max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intensity {
    pub min: f64,
    pub max: f64,
}

impl Default for Intensity {
    fn default() -> Self {
        Self {
            min: constants::tracks::DEFAULT_INTENSITY_MIN,
            max: constants::tracks::DEFAULT_INTENSITY_MAX,
        }
    }
}

impl Intensity {
    /// Clamp both ends into `[0, 1]` and keep `min` strictly below `max`
    pub fn clamped(min: f64, max: f64) -> Self {
        let gap = constants::tracks::MIN_INTENSITY_GAP;
        let min = min.clamp(0.0, 1.0 - gap);
        let max = max.clamp(0.0, 1.0).max(min + gap);
        Self { min, max }
    }
}

/// The asset a track instantiates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub asset_id: String,
    pub asset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_key: Option<String>,
}

impl AssetRef {
    pub fn new(asset_id: impl Into<String>, asset_name: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            asset_name: asset_name.into(),
            plugin_key: None,
        }
    }

    pub fn with_plugin_key(mut self, plugin_key: impl Into<String>) -> Self {
        self.plugin_key = Some(plugin_key.into());
        self
    }
}

/// An animation effect attached to a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationTrack {
    pub asset_id: String,
    pub asset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_key: Option<String>,
    pub timing: TimingWindow,
    pub intensity: Intensity,
    pub color: TrackColor,
    /// Lead-in and lead-out around the timing window, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<(f64, f64)>,
    /// Opaque parameters consumed by the scenario compiler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl AnimationTrack {
    pub fn asset(&self) -> AssetRef {
        AssetRef {
            asset_id: self.asset_id.clone(),
            asset_name: self.asset_name.clone(),
            plugin_key: self.plugin_key.clone(),
        }
    }

    /// Shallow-merge `partial` into this track's params
    pub fn merge_params(&mut self, partial: Map<String, Value>) {
        let params = self.params.get_or_insert_with(Map::new);
        for (key, value) in partial {
            params.insert(key, value);
        }
    }
}

//! External collaborators the engine talks to
//!
//! The engine never owns clips, never compiles scenarios and never reads
//! plugin manifests itself. Each concern is a trait injected at
//! construction so every component declares exactly what it calls.
//!
//! Implementations use interior mutability: the engine only holds shared
//! references (`Arc<dyn ...>`).

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::model::{Clip, ClipId, TimingWindow, WordId};
use crate::tracks::AnimationTrack;

/// Owner of the canonical ordered clip and word lists
pub trait ClipStore: Send + Sync {
    /// Snapshot of every clip in display order
    fn clips(&self) -> Vec<Clip>;

    /// Mirror the asset ids applied to a word
    fn apply_assets_to_word(&self, clip_id: &ClipId, word_id: &WordId, asset_ids: &[String])
        -> Result<()>;

    /// Mirror a word's full track list
    fn update_word_animation_tracks(
        &self,
        clip_id: &ClipId,
        word_id: &WordId,
        tracks: &[AnimationTrack],
    ) -> Result<()>;

    /// Replace the clip list (used for destructive word removal)
    fn update_clips(&self, clips: Vec<Clip>) -> Result<()>;

    /// Clip that owns a word
    fn clip_of_word(&self, word_id: &WordId) -> Option<ClipId> {
        self.clips()
            .into_iter()
            .find(|clip| clip.contains_word(word_id))
            .map(|clip| clip.id)
    }

    /// Timing the store currently holds for a word
    fn word_timing(&self, word_id: &WordId) -> Option<TimingWindow> {
        self.clips()
            .iter()
            .flat_map(|clip| clip.words.iter())
            .find(|w| &w.id == word_id)
            .map(|w| w.timing())
    }
}

/// Turns per-word track lists into renderable output
///
/// Either call may fail on input it cannot compile.
pub trait ScenarioCompiler: Send + Sync {
    /// Rebuild a word's plugin chain from its complete track list
    fn refresh_word_plugin_chain(&self, word_id: &WordId, tracks: &[AnimationTrack]) -> Result<()>;

    /// Move a word's base timing
    fn update_word_base_time(&self, word_id: &WordId, timing: TimingWindow) -> Result<()>;
}

/// Source of per-plugin defaults for new tracks
#[async_trait]
pub trait PluginManifest: Send + Sync {
    /// Lead-in and lead-out seconds for a plugin
    async fn plugin_time_offset(&self, plugin_key: &str) -> Result<(f64, f64)>;

    /// Default parameter map for a plugin
    async fn plugin_default_params(&self, plugin_key: &str) -> Result<Map<String, Value>>;
}

/// Manifest data fetched ahead of an asynchronous track add
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestDefaults {
    pub time_offset: Option<(f64, f64)>,
    pub params: Option<Map<String, Value>>,
}

impl ManifestDefaults {
    /// Fetch both defaults for a plugin. No plugin key means no defaults.
    pub async fn fetch(
        manifest: &dyn PluginManifest,
        plugin_key: Option<&str>,
    ) -> crate::Result<Self> {
        let Some(key) = plugin_key else {
            return Ok(Self::default());
        };

        let manifest_error = |source| crate::EditorError::Manifest {
            plugin_key: key.to_string(),
            source,
        };
        let time_offset = manifest
            .plugin_time_offset(key)
            .await
            .map_err(manifest_error)?;
        let params = manifest
            .plugin_default_params(key)
            .await
            .map_err(manifest_error)?;

        Ok(Self {
            time_offset: Some(time_offset),
            params: Some(params),
        })
    }
}

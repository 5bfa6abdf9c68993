//! Propagation of per-word mutations to external collaborators
//!
//! Every push carries the word's complete current track list, never a
//! diff, so out-of-order completions converge.
//!
//! - Scenario compiler: may fail loudly, surfaced as [`EditorError::Propagation`]
//! - Clip store mirror: best effort, failures are logged and swallowed

use std::sync::Arc;
use tracing::{debug, warn};

use crate::collaborators::{ClipStore, ScenarioCompiler};
use crate::error::{EditorError, Result};
use crate::model::{TimingWindow, WordId};
use crate::tracks::AnimationTrack;

/// Pushes word state to the scenario compiler and clip store
#[derive(Clone)]
pub struct Propagator {
    clips: Arc<dyn ClipStore>,
    compiler: Arc<dyn ScenarioCompiler>,
}

impl Propagator {
    pub fn new(clips: Arc<dyn ClipStore>, compiler: Arc<dyn ScenarioCompiler>) -> Self {
        Self { clips, compiler }
    }

    /// Publish a word's timing together with its track list
    ///
    /// The track list is pushed even when the base time is rejected. The
    /// first compiler error is reported.
    pub fn publish_timing(
        &self,
        word_id: &WordId,
        timing: TimingWindow,
        tracks: &[AnimationTrack],
    ) -> Result<()> {
        let base_time = self.compiler.update_word_base_time(word_id, timing);
        let chain = self.compiler.refresh_word_plugin_chain(word_id, tracks);
        self.mirror(word_id, tracks);
        base_time
            .and(chain)
            .map_err(|source| propagation_error(word_id, false, source))
    }

    /// Publish a word's track list
    ///
    /// The mutation stands even when the compiler rejects it; the error is
    /// reported so the caller knows the two views have diverged.
    pub fn publish_tracks(&self, word_id: &WordId, tracks: &[AnimationTrack]) -> Result<()> {
        let compiled = self.compiler.refresh_word_plugin_chain(word_id, tracks);
        self.mirror(word_id, tracks);
        compiled.map_err(|source| propagation_error(word_id, false, source))
    }

    /// Push a track list to the compiler only
    pub fn compile(&self, word_id: &WordId, tracks: &[AnimationTrack]) -> anyhow::Result<()> {
        self.compiler.refresh_word_plugin_chain(word_id, tracks)
    }

    /// Mirror applied asset ids and the track list onto the word's record
    pub fn mirror(&self, word_id: &WordId, tracks: &[AnimationTrack]) {
        let Some(clip_id) = self.clips.clip_of_word(word_id) else {
            debug!(word_id = %word_id, "Mirror skipped (word not in clip store)");
            return;
        };

        let asset_ids: Vec<String> = tracks.iter().map(|t| t.asset_id.clone()).collect();
        if let Err(e) = self.clips.apply_assets_to_word(&clip_id, word_id, &asset_ids) {
            warn!(word_id = %word_id, clip_id = %clip_id, "Failed to mirror applied assets: {}", e);
        }
        if let Err(e) = self
            .clips
            .update_word_animation_tracks(&clip_id, word_id, tracks)
        {
            warn!(word_id = %word_id, clip_id = %clip_id, "Failed to mirror animation tracks: {}", e);
        }
    }
}

pub(crate) fn propagation_error(
    word_id: &WordId,
    rolled_back: bool,
    source: anyhow::Error,
) -> EditorError {
    warn!(word_id = %word_id, rolled_back, "Scenario compiler rejected update: {}", source);
    EditorError::Propagation {
        word_id: word_id.clone(),
        rolled_back,
        source,
    }
}

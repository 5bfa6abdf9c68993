//! Word editor - single owner of all word-level editing state
//!
//! Wraps the interaction state, timing ledger and track set, and routes
//! every externally visible mutation through the [`Propagator`].
//!
//! ## Propagation rules
//! - Timing writes, undo and redo publish base time and the track list
//! - Track add/remove/timing/clear and batch toggles publish the track list
//! - Intensity changes are presentational and publish nothing
//! - Parameter changes are rolled back if the scenario compiler rejects them

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::collaborators::{ClipStore, ManifestDefaults, PluginManifest, ScenarioCompiler};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::history::{TimingHistory, TimingLedger};
use crate::interaction::{DropPosition, InteractionState, WordStatePriority};
use crate::model::{ClipId, TimingWindow, WordId, WordRef};
use crate::propagation::{propagation_error, Propagator};
use crate::selection;
use crate::tracks::{AnimationTrack, AssetRef, Intensity, ToggleOutcome, TrackSet};

/// Word-level editing engine
pub struct WordEditor {
    config: EditorConfig,
    state: InteractionState,
    ledger: TimingLedger,
    tracks: TrackSet,
    clips: Arc<dyn ClipStore>,
    manifest: Arc<dyn PluginManifest>,
    propagator: Propagator,
}

impl WordEditor {
    pub fn new(
        config: EditorConfig,
        clips: Arc<dyn ClipStore>,
        compiler: Arc<dyn ScenarioCompiler>,
        manifest: Arc<dyn PluginManifest>,
    ) -> Self {
        Self {
            ledger: TimingLedger::new(config.history_limit, config.min_timing_gap),
            state: InteractionState::new(),
            tracks: TrackSet::new(),
            propagator: Propagator::new(clips.clone(), compiler),
            clips,
            manifest,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub(crate) fn manifest(&self) -> Arc<dyn PluginManifest> {
        self.manifest.clone()
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    pub fn set_focused_word(&mut self, clip_id: ClipId, word_id: Option<WordId>) -> bool {
        self.state.set_focused_word(clip_id, word_id)
    }

    pub fn clear_word_focus(&mut self) -> bool {
        self.state.clear_word_focus()
    }

    pub fn start_group_selection(&mut self, clip_id: ClipId, word_id: WordId) {
        self.state.start_group_selection(clip_id, word_id)
    }

    pub fn add_to_group_selection(&mut self, word_id: WordId) -> bool {
        self.state.add_to_group_selection(word_id)
    }

    pub fn end_group_selection(&mut self) {
        self.state.end_group_selection()
    }

    pub fn toggle_word_in_group(&mut self, word_id: WordId) -> bool {
        self.state.toggle_word_in_group(word_id)
    }

    pub fn start_word_drag(&mut self, word_id: WordId) -> bool {
        self.state.start_word_drag(word_id)
    }

    pub fn end_word_drag(&mut self) {
        self.state.end_word_drag()
    }

    pub fn set_drop_target(&mut self, word_id: Option<WordId>, position: Option<DropPosition>) {
        self.state.set_drop_target(word_id, position)
    }

    pub fn start_inline_edit(&mut self, clip_id: ClipId, word_id: WordId) {
        self.state.start_inline_edit(clip_id, word_id)
    }

    pub fn end_inline_edit(&mut self) {
        self.state.end_inline_edit()
    }

    pub fn expand_clip(&mut self, clip_id: ClipId, word_id: WordId) -> bool {
        self.state.expand_clip(clip_id, word_id)
    }

    pub fn collapse_clip(&mut self) {
        self.state.collapse_clip()
    }

    pub fn set_playing_word(&mut self, word: Option<WordRef>) {
        self.state.set_playing_word(word)
    }

    pub fn word_state_priority(&self, word_id: &WordId) -> WordStatePriority {
        self.state.word_state_priority(word_id)
    }

    pub fn can_change_word_state(&self, word_id: &WordId, requested: WordStatePriority) -> bool {
        self.state.can_change_word_state(word_id, requested)
    }

    // =========================================================================
    // Timing history
    // =========================================================================

    /// Write a new timing window for a word and publish it
    ///
    /// The first write for a word seeds the history with the clip store's
    /// timing so that write can itself be undone. Returns the stored
    /// (clamped) window; on a propagation error the write still stands.
    pub fn update_word_timing(&mut self, word_id: &WordId, start: f64, end: f64) -> Result<TimingWindow> {
        if self.ledger.history(word_id).is_none() {
            let requested = TimingWindow::clamped(start, end, self.ledger.min_gap());
            if let Some(original) = self.clips.word_timing(word_id) {
                if original != requested {
                    self.ledger.seed(word_id, original.start, original.end);
                }
            }
        }

        let window = self.ledger.record(word_id, start, end);
        debug!(word_id = %word_id, start = window.start, end = window.end, "Word timing updated");
        self.propagator
            .publish_timing(word_id, window, self.tracks.tracks(word_id))?;
        Ok(window)
    }

    /// Step a word's timing back. `Ok(None)` at the start of history.
    pub fn undo_word_timing(&mut self, word_id: &WordId) -> Result<Option<TimingWindow>> {
        let Some(window) = self.ledger.undo(word_id) else {
            return Ok(None);
        };
        self.propagator
            .publish_timing(word_id, window, self.tracks.tracks(word_id))?;
        Ok(Some(window))
    }

    /// Step a word's timing forward. `Ok(None)` at the end of history.
    pub fn redo_word_timing(&mut self, word_id: &WordId) -> Result<Option<TimingWindow>> {
        let Some(window) = self.ledger.redo(word_id) else {
            return Ok(None);
        };
        self.propagator
            .publish_timing(word_id, window, self.tracks.tracks(word_id))?;
        Ok(Some(window))
    }

    pub fn current_timing(&self, word_id: &WordId) -> Option<TimingWindow> {
        self.ledger.current(word_id)
    }

    pub fn timing_history(&self, word_id: &WordId) -> Option<&TimingHistory> {
        self.ledger.history(word_id)
    }

    pub fn can_undo(&self, word_id: &WordId) -> bool {
        self.ledger.can_undo(word_id)
    }

    pub fn can_redo(&self, word_id: &WordId) -> bool {
        self.ledger.can_redo(word_id)
    }

    /// Number of timing windows remembered for a word
    pub fn history_len(&self, word_id: &WordId) -> usize {
        self.ledger.history(word_id).map_or(0, TimingHistory::len)
    }

    // =========================================================================
    // Animation tracks
    // =========================================================================

    pub fn tracks(&self, word_id: &WordId) -> &[AnimationTrack] {
        self.tracks.tracks(word_id)
    }

    pub fn has_asset(&self, word_id: &WordId, asset_id: &str) -> bool {
        self.tracks.has_asset(word_id, asset_id)
    }

    pub fn track_count(&self, word_id: &WordId) -> usize {
        self.tracks.len(word_id)
    }

    /// Timing a new track gets when none is given
    fn default_track_timing(&self, word_id: &WordId) -> TimingWindow {
        self.ledger
            .current(word_id)
            .unwrap_or(self.config.default_track_timing)
    }

    /// Attach an asset to a word
    ///
    /// `Ok(false)` when the asset is already attached or the word already
    /// carries the maximum number of tracks.
    pub fn add_animation_track(
        &mut self,
        word_id: &WordId,
        asset: AssetRef,
        timing: Option<TimingWindow>,
        time_offset: Option<(f64, f64)>,
        params: Option<Map<String, Value>>,
    ) -> Result<bool> {
        let timing = match timing {
            Some(t) => TimingWindow::clamped(t.start, t.end, self.config.min_timing_gap),
            None => self.default_track_timing(word_id),
        };
        let added = self.tracks.add(
            word_id,
            asset,
            timing,
            self.config.default_intensity,
            time_offset,
            params,
        );
        if !added {
            return Ok(false);
        }
        self.propagator
            .publish_tracks(word_id, self.tracks.tracks(word_id))?;
        Ok(true)
    }

    /// Attach an asset after fetching its plugin defaults
    ///
    /// Duplicate and capacity checks run after the fetch completes. A
    /// failed fetch degrades to adding the track without defaults.
    pub async fn add_animation_track_async(
        &mut self,
        word_id: &WordId,
        asset: AssetRef,
        timing: Option<TimingWindow>,
    ) -> Result<bool> {
        let manifest = self.manifest();
        let defaults = fetch_defaults_or_empty(manifest.as_ref(), &asset).await;
        self.add_animation_track(word_id, asset, timing, defaults.time_offset, defaults.params)
    }

    pub fn remove_animation_track(&mut self, word_id: &WordId, asset_id: &str) -> Result<bool> {
        if !self.tracks.remove(word_id, asset_id) {
            return Ok(false);
        }
        self.propagator
            .publish_tracks(word_id, self.tracks.tracks(word_id))?;
        Ok(true)
    }

    pub fn update_animation_track_timing(
        &mut self,
        word_id: &WordId,
        asset_id: &str,
        start: f64,
        end: f64,
    ) -> Result<bool> {
        let timing = TimingWindow::clamped(start, end, self.config.min_timing_gap);
        if !self.tracks.update_timing(word_id, asset_id, timing) {
            return Ok(false);
        }
        self.propagator
            .publish_tracks(word_id, self.tracks.tracks(word_id))?;
        Ok(true)
    }

    /// Change a track's intensity range. Presentational only: nothing is
    /// published.
    pub fn update_animation_track_intensity(
        &mut self,
        word_id: &WordId,
        asset_id: &str,
        min: f64,
        max: f64,
    ) -> bool {
        self.tracks
            .update_intensity(word_id, asset_id, Intensity::clamped(min, max))
    }

    /// Merge parameters into a track, atomically
    ///
    /// If the scenario compiler rejects the result, the word's tracks are
    /// restored exactly and the error reports the rollback. A failed clip
    /// store mirror afterwards is only logged.
    pub fn update_animation_track_params(
        &mut self,
        word_id: &WordId,
        asset_id: &str,
        partial: Map<String, Value>,
    ) -> Result<bool> {
        let snapshot = self.tracks.snapshot(word_id);
        if !self.tracks.merge_params(word_id, asset_id, partial) {
            return Ok(false);
        }

        if let Err(source) = self.propagator.compile(word_id, self.tracks.tracks(word_id)) {
            self.tracks.restore(word_id, snapshot);
            return Err(propagation_error(word_id, true, source));
        }

        self.propagator.mirror(word_id, self.tracks.tracks(word_id));
        Ok(true)
    }

    /// Drop all of a word's tracks and publish the empty list
    pub fn clear_animation_tracks(&mut self, word_id: &WordId) -> Result<()> {
        self.tracks.clear(word_id);
        self.propagator.publish_tracks(word_id, &[])
    }

    /// Toggle one asset on many words
    ///
    /// Words carrying the asset lose it; the rest gain it unless already
    /// full. Every changed word is published once the batch is applied.
    /// Publishing continues past failures; the first one is returned.
    /// Repeated ids are toggled once. Returns the number of words changed.
    pub fn toggle_animation_for_words(&mut self, word_ids: &[WordId], asset: &AssetRef) -> Result<usize> {
        let mut seen = BTreeSet::new();
        let mut changed = Vec::new();
        for word_id in word_ids {
            if !seen.insert(word_id) {
                continue;
            }
            let timing = self.default_track_timing(word_id);
            match self
                .tracks
                .toggle(word_id, asset, timing, self.config.default_intensity)
            {
                ToggleOutcome::Added | ToggleOutcome::Removed => changed.push(word_id),
                ToggleOutcome::Skipped => {
                    debug!(word_id = %word_id, asset_id = %asset.asset_id, "Toggle skipped (word full)")
                }
            }
        }

        let mut first_error = None;
        for word_id in &changed {
            if let Err(e) = self
                .propagator
                .publish_tracks(word_id, self.tracks.tracks(word_id))
            {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(changed.len()),
        }
    }

    // =========================================================================
    // Multi-selection
    // =========================================================================

    pub fn toggle_multi_select_word(&mut self, clip_id: ClipId, word_id: WordId) -> bool {
        let clips = self.clips.clips();
        self.state.toggle_multi_select_word(&clips, clip_id, word_id)
    }

    pub fn select_word_range(&mut self, to_clip: ClipId, to_word: WordId) -> bool {
        let clips = self.clips.clips();
        self.state.select_word_range(&clips, to_clip, to_word)
    }

    pub fn clear_multi_selection(&mut self) {
        self.state.clear_multi_selection()
    }

    pub fn is_multiple_words_selected(&self) -> bool {
        self.state.is_multiple_words_selected()
    }

    /// Remove every multi-selected word from the clip store
    ///
    /// Clip texts are rebuilt from the remaining words. On success the
    /// deleted words' history and tracks are dropped and all selection and
    /// focus state is cleared. On failure nothing changes.
    pub fn delete_selected_words(&mut self) -> Result<usize> {
        let selected = self.state.multi_selected_word_ids().clone();
        if selected.is_empty() {
            return Ok(0);
        }

        let (updated, removed) = selection::without_words(&self.clips.clips(), &selected);
        self.clips
            .update_clips(updated)
            .map_err(EditorError::ClipStore)?;

        for word_id in &selected {
            self.ledger.forget(word_id);
            self.tracks.forget(word_id);
        }
        self.state.reset_after_delete();
        info!(removed, "Deleted selected words");
        Ok(removed)
    }
}

/// Fetch plugin defaults, degrading to none on failure
pub(crate) async fn fetch_defaults_or_empty(
    manifest: &dyn PluginManifest,
    asset: &AssetRef,
) -> ManifestDefaults {
    match ManifestDefaults::fetch(manifest, asset.plugin_key.as_deref()).await {
        Ok(defaults) => defaults,
        Err(e) => {
            warn!(asset_id = %asset.asset_id, "Adding track without plugin defaults: {}", e);
            ManifestDefaults::default()
        }
    }
}

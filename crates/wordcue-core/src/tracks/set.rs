//! Per-word track collections

use serde_json::{Map, Value};
use std::collections::HashMap;

use super::track::{AnimationTrack, AssetRef, Intensity, TrackColor};
use crate::constants::tracks::MAX_PER_WORD;
use crate::model::{TimingWindow, WordId};

/// What a toggle did to a word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Word already at capacity and did not carry the asset
    Skipped,
}

/// Track lists for every word that has been given one
///
/// Entries are created on first add and removed when cleared. Every list
/// is kept in slot order with colours matching slot positions.
#[derive(Debug, Clone, Default)]
pub struct TrackSet {
    tracks: HashMap<WordId, Vec<AnimationTrack>>,
    /// Asset last toggled off each word and the slot it held
    vacated: HashMap<WordId, (String, usize)>,
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks of a word in slot order (empty if it has none)
    pub fn tracks(&self, word_id: &WordId) -> &[AnimationTrack] {
        self.tracks.get(word_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, word_id: &WordId) -> usize {
        self.tracks(word_id).len()
    }

    pub fn has_asset(&self, word_id: &WordId, asset_id: &str) -> bool {
        self.tracks(word_id).iter().any(|t| t.asset_id == asset_id)
    }

    /// Whether a new asset could be attached right now
    pub fn can_add(&self, word_id: &WordId, asset_id: &str) -> bool {
        self.len(word_id) < MAX_PER_WORD && !self.has_asset(word_id, asset_id)
    }

    /// Attach a track. Refused when the asset is already attached or the
    /// word is full.
    pub fn add(
        &mut self,
        word_id: &WordId,
        asset: AssetRef,
        timing: TimingWindow,
        intensity: Intensity,
        time_offset: Option<(f64, f64)>,
        params: Option<Map<String, Value>>,
    ) -> bool {
        if !self.can_add(word_id, &asset.asset_id) {
            tracing::debug!(
                word_id = %word_id,
                asset_id = %asset.asset_id,
                count = self.len(word_id),
                "Track add refused (duplicate or full)"
            );
            return false;
        }

        let list = self.tracks.entry(word_id.clone()).or_default();
        list.push(AnimationTrack {
            asset_id: asset.asset_id,
            asset_name: asset.asset_name,
            plugin_key: asset.plugin_key,
            timing,
            intensity,
            // Overwritten by recolor below
            color: TrackColor::A,
            time_offset,
            params,
        });
        recolor(list);
        true
    }

    /// Detach a track and shift the remaining colours down
    pub fn remove(&mut self, word_id: &WordId, asset_id: &str) -> bool {
        let Some(list) = self.tracks.get_mut(word_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|t| t.asset_id != asset_id);
        if list.len() == before {
            return false;
        }
        recolor(list);
        true
    }

    pub fn update_timing(&mut self, word_id: &WordId, asset_id: &str, timing: TimingWindow) -> bool {
        match self.track_mut(word_id, asset_id) {
            Some(track) => {
                track.timing = timing;
                true
            }
            None => false,
        }
    }

    pub fn update_intensity(
        &mut self,
        word_id: &WordId,
        asset_id: &str,
        intensity: Intensity,
    ) -> bool {
        match self.track_mut(word_id, asset_id) {
            Some(track) => {
                track.intensity = intensity;
                true
            }
            None => false,
        }
    }

    pub fn merge_params(
        &mut self,
        word_id: &WordId,
        asset_id: &str,
        partial: Map<String, Value>,
    ) -> bool {
        match self.track_mut(word_id, asset_id) {
            Some(track) => {
                track.merge_params(partial);
                true
            }
            None => false,
        }
    }

    /// Drop every track of a word, returning how many were removed
    pub fn clear(&mut self, word_id: &WordId) -> usize {
        self.vacated.remove(word_id);
        self.tracks.remove(word_id).map(|l| l.len()).unwrap_or(0)
    }

    /// Remove the asset if present, otherwise add it when there is room
    ///
    /// Toggling an asset back on puts it in the slot it was toggled off
    /// from, so toggling twice leaves the word's order and colours as they
    /// were.
    pub fn toggle(
        &mut self,
        word_id: &WordId,
        asset: &AssetRef,
        timing: TimingWindow,
        intensity: Intensity,
    ) -> ToggleOutcome {
        let position = self
            .tracks(word_id)
            .iter()
            .position(|t| t.asset_id == asset.asset_id);
        if let Some(slot) = position {
            self.remove(word_id, &asset.asset_id);
            self.vacated
                .insert(word_id.clone(), (asset.asset_id.clone(), slot));
            return ToggleOutcome::Removed;
        }

        if !self.add(word_id, asset.clone(), timing, intensity, None, None) {
            return ToggleOutcome::Skipped;
        }

        let vacated_slot = match self.vacated.get(word_id) {
            Some((asset_id, slot)) if *asset_id == asset.asset_id => Some(*slot),
            _ => None,
        };
        if let Some(slot) = vacated_slot {
            self.vacated.remove(word_id);
            if let Some(list) = self.tracks.get_mut(word_id) {
                if let Some(track) = list.pop() {
                    list.insert(slot.min(list.len()), track);
                }
                recolor(list);
            }
        }
        ToggleOutcome::Added
    }

    /// Copy of a word's entry, including whether it exists at all
    pub fn snapshot(&self, word_id: &WordId) -> Option<Vec<AnimationTrack>> {
        self.tracks.get(word_id).cloned()
    }

    /// Put back an entry taken with [`TrackSet::snapshot`]
    pub fn restore(&mut self, word_id: &WordId, snapshot: Option<Vec<AnimationTrack>>) {
        match snapshot {
            Some(list) => {
                self.tracks.insert(word_id.clone(), list);
            }
            None => {
                self.tracks.remove(word_id);
            }
        }
    }

    /// Drop a word's entry without any bookkeeping
    pub fn forget(&mut self, word_id: &WordId) -> bool {
        self.vacated.remove(word_id);
        self.tracks.remove(word_id).is_some()
    }

    fn track_mut(&mut self, word_id: &WordId, asset_id: &str) -> Option<&mut AnimationTrack> {
        self.tracks
            .get_mut(word_id)?
            .iter_mut()
            .find(|t| t.asset_id == asset_id)
    }
}

/// Reassign colours from slot positions
fn recolor(list: &mut [AnimationTrack]) {
    for (slot, track) in list.iter_mut().enumerate() {
        if let Some(color) = TrackColor::for_slot(slot) {
            track.color = color;
        }
    }
}

//! In-memory collaborators
//!
//! Used by the replay binary and throughout the tests. The compiler and
//! clip store can be armed to fail so rollback and mirror paths can be
//! exercised.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::collaborators::{ClipStore, PluginManifest, ScenarioCompiler};
use crate::model::{Clip, ClipId, TimingWindow, WordId};
use crate::tracks::AnimationTrack;

/// Clip store backed by a vector
#[derive(Default)]
pub struct MemoryClipStore {
    clips: RwLock<Vec<Clip>>,
    fail_mirror: AtomicBool,
    fail_updates: AtomicBool,
}

impl MemoryClipStore {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self {
            clips: RwLock::new(clips),
            fail_mirror: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Make track/asset mirroring fail
    pub fn set_fail_mirror(&self, fail: bool) {
        self.fail_mirror.store(fail, Ordering::SeqCst);
    }

    /// Make `update_clips` fail
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn with_word<F>(&self, clip_id: &ClipId, word_id: &WordId, f: F) -> Result<()>
    where
        F: FnOnce(&mut crate::model::Word),
    {
        if self.fail_mirror.load(Ordering::SeqCst) {
            return Err(anyhow!("clip store unavailable"));
        }
        let mut clips = self.clips.write();
        let word = clips
            .iter_mut()
            .filter(|c| &c.id == clip_id)
            .flat_map(|c| c.words.iter_mut())
            .find(|w| &w.id == word_id)
            .ok_or_else(|| anyhow!("word {} not found in clip {}", word_id, clip_id))?;
        f(word);
        Ok(())
    }
}

impl ClipStore for MemoryClipStore {
    fn clips(&self) -> Vec<Clip> {
        self.clips.read().clone()
    }

    fn apply_assets_to_word(
        &self,
        clip_id: &ClipId,
        word_id: &WordId,
        asset_ids: &[String],
    ) -> Result<()> {
        self.with_word(clip_id, word_id, |word| {
            word.applied_assets = asset_ids.to_vec();
        })
    }

    fn update_word_animation_tracks(
        &self,
        clip_id: &ClipId,
        word_id: &WordId,
        tracks: &[AnimationTrack],
    ) -> Result<()> {
        self.with_word(clip_id, word_id, |word| {
            word.animation_tracks = tracks.to_vec();
        })
    }

    fn update_clips(&self, clips: Vec<Clip>) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(anyhow!("clip store rejected update"));
        }
        *self.clips.write() = clips;
        Ok(())
    }
}

/// A call received by [`RecordingCompiler`]
#[derive(Debug, Clone, PartialEq)]
pub enum CompilerCall {
    RefreshChain {
        word_id: WordId,
        tracks: Vec<AnimationTrack>,
    },
    BaseTime {
        word_id: WordId,
        timing: TimingWindow,
    },
}

/// Scenario compiler that records every call
#[derive(Default)]
pub struct RecordingCompiler {
    calls: Mutex<Vec<CompilerCall>>,
    fail: AtomicBool,
    fail_base_time: AtomicBool,
}

impl RecordingCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Make only base-time updates fail
    pub fn set_fail_base_time(&self, fail: bool) {
        self.fail_base_time.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<CompilerCall> {
        self.calls.lock().clone()
    }

    /// Track list from the most recent chain refresh for a word
    pub fn last_chain(&self, word_id: &WordId) -> Option<Vec<AnimationTrack>> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            CompilerCall::RefreshChain { word_id: id, tracks } if id == word_id => {
                Some(tracks.clone())
            }
            _ => None,
        })
    }

    /// Timing from the most recent base-time update for a word
    pub fn last_base_time(&self, word_id: &WordId) -> Option<TimingWindow> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            CompilerCall::BaseTime { word_id: id, timing } if id == word_id => Some(*timing),
            _ => None,
        })
    }

    fn check(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(anyhow!("scenario compilation failed"))
        } else {
            Ok(())
        }
    }
}

impl ScenarioCompiler for RecordingCompiler {
    fn refresh_word_plugin_chain(&self, word_id: &WordId, tracks: &[AnimationTrack]) -> Result<()> {
        self.check()?;
        self.calls.lock().push(CompilerCall::RefreshChain {
            word_id: word_id.clone(),
            tracks: tracks.to_vec(),
        });
        Ok(())
    }

    fn update_word_base_time(&self, word_id: &WordId, timing: TimingWindow) -> Result<()> {
        self.check()?;
        if self.fail_base_time.load(Ordering::SeqCst) {
            return Err(anyhow!("base time rejected for {}", word_id));
        }
        self.calls.lock().push(CompilerCall::BaseTime {
            word_id: word_id.clone(),
            timing,
        });
        Ok(())
    }
}

/// Defaults published for one plugin
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginEntry {
    pub time_offset: (f64, f64),
    pub params: Map<String, Value>,
}

/// Plugin manifest with a fixed table of plugins
///
/// An optional gate holds each time-offset lookup (the first half of a
/// fetch) until notified, so tests can interleave other mutations with a
/// pending fetch.
#[derive(Default)]
pub struct StaticManifest {
    plugins: HashMap<String, PluginEntry>,
    gate: Option<Arc<Notify>>,
}

impl StaticManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, key: impl Into<String>, entry: PluginEntry) -> Self {
        self.plugins.insert(key.into(), entry);
        self
    }

    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn lookup(&self, plugin_key: &str) -> Result<&PluginEntry> {
        self.plugins
            .get(plugin_key)
            .ok_or_else(|| anyhow!("unknown plugin: {}", plugin_key))
    }
}

#[async_trait]
impl PluginManifest for StaticManifest {
    async fn plugin_time_offset(&self, plugin_key: &str) -> Result<(f64, f64)> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.lookup(plugin_key)?.time_offset)
    }

    async fn plugin_default_params(&self, plugin_key: &str) -> Result<Map<String, Value>> {
        Ok(self.lookup(plugin_key)?.params.clone())
    }
}

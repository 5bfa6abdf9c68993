//! Clip and word records as exposed by the clip store

use serde::{Deserialize, Serialize};

use super::{ClipId, TimingWindow, WordId};
use crate::tracks::AnimationTrack;

/// A timed text token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub text: String,
    pub start: f64,
    pub end: f64,
    /// Asset ids mirrored from the word's animation tracks
    #[serde(default)]
    pub applied_assets: Vec<String>,
    /// Track list mirrored from the engine
    #[serde(default)]
    pub animation_tracks: Vec<AnimationTrack>,
}

impl Word {
    pub fn new(id: impl Into<WordId>, text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            start,
            end,
            applied_assets: Vec::new(),
            animation_tracks: Vec::new(),
        }
    }

    pub fn timing(&self) -> TimingWindow {
        TimingWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// An ordered run of words with its derived full text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: ClipId,
    #[serde(default)]
    pub text: String,
    pub words: Vec<Word>,
}

impl Clip {
    /// Build a clip whose text is derived from its words
    pub fn new(id: impl Into<ClipId>, words: Vec<Word>) -> Self {
        let mut clip = Self {
            id: id.into(),
            text: String::new(),
            words,
        };
        clip.rebuild_text();
        clip
    }

    /// Position of a word inside this clip
    pub fn word_index(&self, word_id: &WordId) -> Option<usize> {
        self.words.iter().position(|w| &w.id == word_id)
    }

    pub fn contains_word(&self, word_id: &WordId) -> bool {
        self.word_index(word_id).is_some()
    }

    /// Recompute the full text as the space-joined word texts
    pub fn rebuild_text(&mut self) {
        self.text = self
            .words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
    }
}

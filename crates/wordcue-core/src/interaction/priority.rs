//! Word state ranking and the state-change guard
//!
//! Renderers consult [`InteractionState::can_change_word_state`] before
//! letting a click or hover reassign a word's state.

use serde::{Deserialize, Serialize};

use super::InteractionState;
use crate::model::WordId;

/// Visual state of a word, ordered from weakest to strongest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WordStatePriority {
    Normal = 0,
    Grouped = 1,
    Focused = 2,
    Editing = 3,
}

impl WordStatePriority {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl InteractionState {
    /// Highest state a word currently holds
    pub fn word_state_priority(&self, word_id: &WordId) -> WordStatePriority {
        if self.editing_word.as_ref().map(|e| &e.word_id) == Some(word_id) {
            WordStatePriority::Editing
        } else if self.focused_word_id() == Some(word_id) {
            WordStatePriority::Focused
        } else if self.grouped_word_ids.len() > 1 && self.grouped_word_ids.contains(word_id) {
            WordStatePriority::Grouped
        } else {
            WordStatePriority::Normal
        }
    }

    /// Whether a word may move to `requested`
    ///
    /// Always false while a drag or group sweep is in progress; otherwise a
    /// word may only move to an equal or stronger state.
    pub fn can_change_word_state(&self, word_id: &WordId, requested: WordStatePriority) -> bool {
        if self.drag.active || self.is_group_selecting {
            return false;
        }
        requested >= self.word_state_priority(word_id)
    }
}

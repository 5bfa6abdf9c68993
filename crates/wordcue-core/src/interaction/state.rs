//! Focus, grouping, drag, inline-edit and expanded-view state

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{ClipId, WordId, WordRef};

/// Side of the drop target a dragged word lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    Before,
    After,
}

/// Transient drag bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragState {
    pub active: bool,
    pub dragged_word_id: Option<WordId>,
    pub drop_target_word_id: Option<WordId>,
    pub drop_position: Option<DropPosition>,
}

/// Interaction state shared by every word-level view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    pub(crate) focused_word: Option<WordRef>,
    pub(crate) grouped_word_ids: BTreeSet<WordId>,
    pub(crate) is_group_selecting: bool,
    pub(crate) multi_selected_word_ids: BTreeSet<WordId>,
    pub(crate) multi_selected_clip_ids: BTreeSet<ClipId>,
    pub(crate) last_selected_word: Option<WordRef>,
    pub(crate) editing_word: Option<WordRef>,
    pub(crate) drag: DragState,
    pub(crate) expanded_view: Option<WordRef>,
    pub(crate) playing_word: Option<WordRef>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn focused_word(&self) -> Option<&WordRef> {
        self.focused_word.as_ref()
    }

    pub fn focused_word_id(&self) -> Option<&WordId> {
        self.focused_word.as_ref().map(|f| &f.word_id)
    }

    pub fn grouped_word_ids(&self) -> &BTreeSet<WordId> {
        &self.grouped_word_ids
    }

    pub fn is_group_selecting(&self) -> bool {
        self.is_group_selecting
    }

    pub fn multi_selected_word_ids(&self) -> &BTreeSet<WordId> {
        &self.multi_selected_word_ids
    }

    pub fn multi_selected_clip_ids(&self) -> &BTreeSet<ClipId> {
        &self.multi_selected_clip_ids
    }

    pub fn last_selected_word(&self) -> Option<&WordRef> {
        self.last_selected_word.as_ref()
    }

    pub fn editing_word(&self) -> Option<&WordRef> {
        self.editing_word.as_ref()
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    pub fn expanded_view(&self) -> Option<&WordRef> {
        self.expanded_view.as_ref()
    }

    pub fn playing_word(&self) -> Option<&WordRef> {
        self.playing_word.as_ref()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Focus a word (or nothing) inside `clip_id`
    ///
    /// Resets the group to the new word, closes the expanded view when the
    /// focused clip changes and keeps an inline edit only if it is on the
    /// newly focused word. Returns false when already focused there.
    pub fn set_focused_word(&mut self, clip_id: ClipId, word_id: Option<WordId>) -> bool {
        let target = word_id.map(|word_id| WordRef {
            clip_id: clip_id.clone(),
            word_id,
        });
        if target.is_some() && self.focused_word == target {
            return false;
        }

        let previous_clip = self.focused_word.as_ref().map(|f| f.clip_id.clone());
        if previous_clip.as_ref() != Some(&clip_id) || target.is_none() {
            self.expanded_view = None;
        }

        self.grouped_word_ids.clear();
        if let Some(focus) = &target {
            self.grouped_word_ids.insert(focus.word_id.clone());
        }

        if self.editing_word.is_some() && self.editing_word != target {
            self.editing_word = None;
        }

        tracing::debug!(
            clip_id = %clip_id,
            word_id = ?target.as_ref().map(|t| t.word_id.as_str()),
            "Word focus changed"
        );
        self.focused_word = target;
        true
    }

    /// Clear focus together with the group, inline edit and expanded view
    pub fn clear_word_focus(&mut self) -> bool {
        if self.focused_word.is_none() {
            return false;
        }
        self.focused_word = None;
        self.grouped_word_ids.clear();
        self.editing_word = None;
        self.expanded_view = None;
        true
    }

    // =========================================================================
    // Group gesture
    // =========================================================================

    /// Begin a sweep gesture anchored on a word, which becomes focused
    pub fn start_group_selection(&mut self, clip_id: ClipId, word_id: WordId) {
        self.set_focused_word(clip_id, Some(word_id.clone()));
        self.grouped_word_ids.clear();
        self.grouped_word_ids.insert(word_id);
        self.is_group_selecting = true;
    }

    /// Extend the in-progress sweep. Ignored outside a gesture.
    pub fn add_to_group_selection(&mut self, word_id: WordId) -> bool {
        if !self.is_group_selecting || self.focused_word.is_none() {
            return false;
        }
        self.grouped_word_ids.insert(word_id)
    }

    /// Finish the sweep. The group itself persists until focus changes.
    pub fn end_group_selection(&mut self) {
        self.is_group_selecting = false;
    }

    /// Add or remove a word from the group. The focused word always stays.
    pub fn toggle_word_in_group(&mut self, word_id: WordId) -> bool {
        let Some(focus) = &self.focused_word else {
            return false;
        };
        if focus.word_id == word_id {
            return false;
        }
        if !self.grouped_word_ids.remove(&word_id) {
            self.grouped_word_ids.insert(word_id);
        }
        true
    }

    // =========================================================================
    // Drag
    // =========================================================================

    /// Whether a word may be dragged: only the focused or grouped ones
    pub fn can_drag(&self, word_id: &WordId) -> bool {
        self.focused_word_id() == Some(word_id) || self.grouped_word_ids.contains(word_id)
    }

    /// Start dragging a word. Refused for words neither focused nor grouped.
    pub fn start_word_drag(&mut self, word_id: WordId) -> bool {
        if !self.can_drag(&word_id) {
            tracing::debug!(word_id = %word_id, "Drag refused (word not focused or grouped)");
            return false;
        }
        self.drag = DragState {
            active: true,
            dragged_word_id: Some(word_id),
            drop_target_word_id: None,
            drop_position: None,
        };
        true
    }

    pub fn end_word_drag(&mut self) {
        self.drag = DragState::default();
    }

    pub fn set_drop_target(&mut self, word_id: Option<WordId>, position: Option<DropPosition>) {
        self.drag.drop_target_word_id = word_id;
        self.drag.drop_position = position;
    }

    // =========================================================================
    // Inline edit and expanded view
    // =========================================================================

    /// Put a word into inline-text-edit mode, focusing it
    pub fn start_inline_edit(&mut self, clip_id: ClipId, word_id: WordId) {
        self.set_focused_word(clip_id.clone(), Some(word_id.clone()));
        self.editing_word = Some(WordRef { clip_id, word_id });
    }

    pub fn end_inline_edit(&mut self) {
        self.editing_word = None;
    }

    /// Open the detail view for a word. Refused while several words are
    /// multi-selected.
    pub fn expand_clip(&mut self, clip_id: ClipId, word_id: WordId) -> bool {
        if self.is_multiple_words_selected() {
            tracing::debug!(word_id = %word_id, "Expand refused (multiple words selected)");
            return false;
        }
        self.expanded_view = Some(WordRef { clip_id, word_id });
        true
    }

    pub fn collapse_clip(&mut self) {
        self.expanded_view = None;
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Mirror the word under the playhead
    pub fn set_playing_word(&mut self, word: Option<WordRef>) {
        self.playing_word = word;
    }
}

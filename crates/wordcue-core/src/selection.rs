//! Multi-selection across the ordered clip list
//!
//! Persistent selection independent of focus. Ordering comes from a clip
//! snapshot supplied by the caller; the selection engine never owns clips.

use std::collections::BTreeSet;

use crate::interaction::InteractionState;
use crate::model::{Clip, ClipId, WordId, WordRef};

/// Clip index and word index of a word within a clip snapshot
fn locate(clips: &[Clip], word: &WordRef) -> Option<(usize, usize)> {
    let clip_index = clips.iter().position(|c| c.id == word.clip_id)?;
    let word_index = clips[clip_index].word_index(&word.word_id)?;
    Some((clip_index, word_index))
}

/// Every word between two endpoints, inclusive, in clip order
///
/// Endpoint order does not matter. `None` when either endpoint is not in
/// the snapshot.
pub fn words_between(clips: &[Clip], from: &WordRef, to: &WordRef) -> Option<Vec<WordRef>> {
    let a = locate(clips, from)?;
    let b = locate(clips, to)?;
    let ((first_clip, first_word), (last_clip, last_word)) = if a <= b { (a, b) } else { (b, a) };

    let mut range = Vec::new();
    for (clip_index, clip) in clips
        .iter()
        .enumerate()
        .take(last_clip + 1)
        .skip(first_clip)
    {
        let start = if clip_index == first_clip { first_word } else { 0 };
        let end = if clip_index == last_clip {
            last_word
        } else {
            clip.words.len().saturating_sub(1)
        };
        if clip.words.is_empty() {
            continue;
        }
        range.extend(
            clip.words[start..=end]
                .iter()
                .map(|w| WordRef::new(clip.id.clone(), w.id.clone())),
        );
    }
    Some(range)
}

/// Clips with the given words removed and their text rebuilt
///
/// Returns the full clip list and the number of words removed.
pub fn without_words(clips: &[Clip], word_ids: &BTreeSet<WordId>) -> (Vec<Clip>, usize) {
    let mut removed = 0;
    let updated = clips
        .iter()
        .map(|clip| {
            if !clip.words.iter().any(|w| word_ids.contains(&w.id)) {
                return clip.clone();
            }
            let mut clip = clip.clone();
            let before = clip.words.len();
            clip.words.retain(|w| !word_ids.contains(&w.id));
            removed += before - clip.words.len();
            clip.rebuild_text();
            clip
        })
        .collect();
    (updated, removed)
}

impl InteractionState {
    pub fn is_multiple_words_selected(&self) -> bool {
        self.multi_selected_word_ids.len() > 1
    }

    /// Add or remove one word from the multi-selection
    ///
    /// The toggled word becomes the range anchor and the focused word; any
    /// expanded view closes. Returns whether the word is now selected.
    pub fn toggle_multi_select_word(
        &mut self,
        clips: &[Clip],
        clip_id: ClipId,
        word_id: WordId,
    ) -> bool {
        let selected = if self.multi_selected_word_ids.remove(&word_id) {
            let clip_still_selected = clips
                .iter()
                .find(|c| c.id == clip_id)
                .is_some_and(|clip| {
                    clip.words
                        .iter()
                        .any(|w| self.multi_selected_word_ids.contains(&w.id))
                });
            if !clip_still_selected {
                self.multi_selected_clip_ids.remove(&clip_id);
            }
            false
        } else {
            self.multi_selected_word_ids.insert(word_id.clone());
            self.multi_selected_clip_ids.insert(clip_id.clone());
            true
        };

        self.last_selected_word = Some(WordRef::new(clip_id.clone(), word_id.clone()));
        self.set_focused_word(clip_id, Some(word_id));
        self.expanded_view = None;
        selected
    }

    /// Replace the multi-selection with the span from the anchor to a word
    ///
    /// No-op without an anchor or when either endpoint is missing from the
    /// clip snapshot.
    pub fn select_word_range(&mut self, clips: &[Clip], to_clip: ClipId, to_word: WordId) -> bool {
        let Some(anchor) = self.last_selected_word.clone() else {
            tracing::debug!("Range selection ignored (no anchor)");
            return false;
        };
        let target = WordRef::new(to_clip, to_word);
        let Some(range) = words_between(clips, &anchor, &target) else {
            tracing::debug!(anchor = %anchor, target = %target, "Range selection ignored (unresolved endpoint)");
            return false;
        };

        self.multi_selected_word_ids = range.iter().map(|r| r.word_id.clone()).collect();
        self.multi_selected_clip_ids = range.into_iter().map(|r| r.clip_id).collect();
        if self.is_multiple_words_selected() {
            self.expanded_view = None;
        }
        true
    }

    /// Clear selected words and clips and the anchor
    pub fn clear_multi_selection(&mut self) {
        self.multi_selected_word_ids.clear();
        self.multi_selected_clip_ids.clear();
        self.last_selected_word = None;
    }

    /// Reset selection and focus after the selected words were deleted
    pub(crate) fn reset_after_delete(&mut self) {
        self.clear_multi_selection();
        self.focused_word = None;
        self.grouped_word_ids.clear();
        self.editing_word = None;
        self.expanded_view = None;
        self.drag = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Word;

    /// Three clips with 3, 2 and 4 words
    fn fixture() -> Vec<Clip> {
        let clip = |id: &str, words: &[&str]| {
            Clip::new(
                id,
                words
                    .iter()
                    .enumerate()
                    .map(|(i, w)| Word::new(*w, w.to_uppercase(), i as f64, i as f64 + 0.5))
                    .collect(),
            )
        };
        vec![
            clip("c1", &["a1", "a2", "a3"]),
            clip("c2", &["b1", "b2"]),
            clip("c3", &["d1", "d2", "d3", "d4"]),
        ]
    }

    fn ids(state: &InteractionState) -> Vec<&str> {
        state.multi_selected_word_ids().iter().map(|w| w.as_str()).collect()
    }

    #[test]
    fn test_range_across_three_clips() {
        // Anchor at index 2 of c1, target at index 2 of c3: 1 + 2 + 3 words
        let clips = fixture();
        let mut state = InteractionState::new();
        state.toggle_multi_select_word(&clips, "c1".into(), "a3".into());

        assert!(state.select_word_range(&clips, "c3".into(), "d3".into()));
        assert_eq!(state.multi_selected_word_ids().len(), 6);
        assert_eq!(ids(&state), vec!["a3", "b1", "b2", "d1", "d2", "d3"]);
        assert_eq!(state.multi_selected_clip_ids().len(), 3);
        assert_eq!(state.last_selected_word(), Some(&WordRef::new("c1", "a3")));
    }

    #[test]
    fn test_range_from_mid_clip_takes_its_tail() {
        let clips = fixture();
        let mut state = InteractionState::new();
        state.toggle_multi_select_word(&clips, "c1".into(), "a2".into());

        assert!(state.select_word_range(&clips, "c3".into(), "d1".into()));
        assert_eq!(ids(&state), vec!["a2", "a3", "b1", "b2", "d1"]);
    }

    #[test]
    fn test_range_within_clip_is_order_independent() {
        let clips = fixture();
        let mut state = InteractionState::new();
        state.toggle_multi_select_word(&clips, "c3".into(), "d4".into());

        assert!(state.select_word_range(&clips, "c3".into(), "d2".into()));
        assert_eq!(ids(&state), vec!["d2", "d3", "d4"]);
        assert_eq!(state.multi_selected_clip_ids().len(), 1);
    }

    #[test]
    fn test_range_backwards_across_clips() {
        let clips = fixture();
        let mut state = InteractionState::new();
        state.toggle_multi_select_word(&clips, "c2".into(), "b2".into());

        assert!(state.select_word_range(&clips, "c1".into(), "a3".into()));
        assert_eq!(ids(&state), vec!["a3", "b1", "b2"]);
    }

    #[test]
    fn test_range_without_anchor_or_unknown_word_is_noop() {
        let clips = fixture();
        let mut state = InteractionState::new();
        assert!(!state.select_word_range(&clips, "c1".into(), "a1".into()));

        state.toggle_multi_select_word(&clips, "c1".into(), "a1".into());
        assert!(!state.select_word_range(&clips, "c9".into(), "zz".into()));
        assert_eq!(ids(&state), vec!["a1"]);
    }

    #[test]
    fn test_toggle_moves_anchor_and_focus() {
        let clips = fixture();
        let mut state = InteractionState::new();
        assert!(state.toggle_multi_select_word(&clips, "c2".into(), "b1".into()));
        assert_eq!(state.last_selected_word(), Some(&WordRef::new("c2", "b1")));
        assert_eq!(state.focused_word(), Some(&WordRef::new("c2", "b1")));
    }

    #[test]
    fn test_toggle_off_drops_clip_when_empty() {
        let clips = fixture();
        let mut state = InteractionState::new();
        state.toggle_multi_select_word(&clips, "c2".into(), "b1".into());
        state.toggle_multi_select_word(&clips, "c2".into(), "b2".into());

        assert!(!state.toggle_multi_select_word(&clips, "c2".into(), "b1".into()));
        assert!(state.multi_selected_clip_ids().contains(&ClipId::from("c2")));

        state.toggle_multi_select_word(&clips, "c2".into(), "b2".into());
        assert!(state.multi_selected_clip_ids().is_empty());
    }

    #[test]
    fn test_toggle_closes_expanded_view_and_expand_refused_when_multiple() {
        let clips = fixture();
        let mut state = InteractionState::new();
        state.toggle_multi_select_word(&clips, "c1".into(), "a1".into());
        assert!(state.expand_clip("c1".into(), "a1".into()));

        state.toggle_multi_select_word(&clips, "c1".into(), "a2".into());
        assert!(state.expanded_view().is_none());
        assert!(state.is_multiple_words_selected());
        assert!(!state.expand_clip("c1".into(), "a2".into()));
    }

    #[test]
    fn test_clear_multi_selection() {
        let clips = fixture();
        let mut state = InteractionState::new();
        state.toggle_multi_select_word(&clips, "c1".into(), "a1".into());
        state.clear_multi_selection();
        assert!(state.multi_selected_word_ids().is_empty());
        assert!(state.multi_selected_clip_ids().is_empty());
        assert!(state.last_selected_word().is_none());
    }

    #[test]
    fn test_without_words_rebuilds_text() {
        let clips = fixture();
        let doomed: BTreeSet<WordId> = ["a2", "b1", "b2"].iter().map(|w| WordId::from(*w)).collect();
        let (updated, removed) = without_words(&clips, &doomed);

        assert_eq!(removed, 3);
        assert_eq!(updated[0].text, "A1 A3");
        assert!(updated[1].words.is_empty());
        assert_eq!(updated[1].text, "");
        assert_eq!(updated[2], clips[2]);
    }
}

//! Serializable editing intents
//!
//! Every public editing operation has an [`Intent`] variant so a session
//! can be scripted or replayed from JSON. [`WordEditor::dispatch`] applies
//! one intent; refused guarded operations are logged, not errors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::editor::WordEditor;
use crate::error::Result;
use crate::interaction::DropPosition;
use crate::model::{ClipId, TimingWindow, WordId, WordRef};
use crate::tracks::AssetRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    SetFocusedWord {
        clip_id: ClipId,
        #[serde(default)]
        word_id: Option<WordId>,
    },
    ClearWordFocus,
    StartGroupSelection {
        clip_id: ClipId,
        word_id: WordId,
    },
    AddToGroupSelection {
        word_id: WordId,
    },
    EndGroupSelection,
    ToggleWordInGroup {
        word_id: WordId,
    },
    StartWordDrag {
        word_id: WordId,
    },
    EndWordDrag,
    SetDropTarget {
        #[serde(default)]
        word_id: Option<WordId>,
        #[serde(default)]
        position: Option<DropPosition>,
    },
    StartInlineEdit {
        clip_id: ClipId,
        word_id: WordId,
    },
    EndInlineEdit,
    ExpandClip {
        clip_id: ClipId,
        word_id: WordId,
    },
    CollapseClip,
    SetPlayingWord {
        #[serde(default)]
        word: Option<WordRef>,
    },
    UpdateWordTiming {
        word_id: WordId,
        start: f64,
        end: f64,
    },
    UndoWordTiming {
        word_id: WordId,
    },
    RedoWordTiming {
        word_id: WordId,
    },
    /// Without explicit offset or params the plugin manifest is consulted
    AddAnimationTrack {
        word_id: WordId,
        asset: AssetRef,
        #[serde(default)]
        timing: Option<TimingWindow>,
        #[serde(default)]
        time_offset: Option<(f64, f64)>,
        #[serde(default)]
        params: Option<Map<String, Value>>,
    },
    RemoveAnimationTrack {
        word_id: WordId,
        asset_id: String,
    },
    UpdateAnimationTrackTiming {
        word_id: WordId,
        asset_id: String,
        start: f64,
        end: f64,
    },
    UpdateAnimationTrackIntensity {
        word_id: WordId,
        asset_id: String,
        min: f64,
        max: f64,
    },
    UpdateAnimationTrackParams {
        word_id: WordId,
        asset_id: String,
        params: Map<String, Value>,
    },
    ClearAnimationTracks {
        word_id: WordId,
    },
    ToggleAnimationForWords {
        word_ids: Vec<WordId>,
        asset: AssetRef,
    },
    ToggleMultiSelectWord {
        clip_id: ClipId,
        word_id: WordId,
    },
    SelectWordRange {
        clip_id: ClipId,
        word_id: WordId,
    },
    ClearMultiSelection,
    DeleteSelectedWords,
}

impl WordEditor {
    /// Apply one intent
    pub async fn dispatch(&mut self, intent: Intent) -> Result<()> {
        debug!(intent = ?intent, "Dispatching intent");
        let acted = match intent {
            Intent::SetFocusedWord { clip_id, word_id } => self.set_focused_word(clip_id, word_id),
            Intent::ClearWordFocus => self.clear_word_focus(),
            Intent::StartGroupSelection { clip_id, word_id } => {
                self.start_group_selection(clip_id, word_id);
                true
            }
            Intent::AddToGroupSelection { word_id } => self.add_to_group_selection(word_id),
            Intent::EndGroupSelection => {
                self.end_group_selection();
                true
            }
            Intent::ToggleWordInGroup { word_id } => self.toggle_word_in_group(word_id),
            Intent::StartWordDrag { word_id } => self.start_word_drag(word_id),
            Intent::EndWordDrag => {
                self.end_word_drag();
                true
            }
            Intent::SetDropTarget { word_id, position } => {
                self.set_drop_target(word_id, position);
                true
            }
            Intent::StartInlineEdit { clip_id, word_id } => {
                self.start_inline_edit(clip_id, word_id);
                true
            }
            Intent::EndInlineEdit => {
                self.end_inline_edit();
                true
            }
            Intent::ExpandClip { clip_id, word_id } => self.expand_clip(clip_id, word_id),
            Intent::CollapseClip => {
                self.collapse_clip();
                true
            }
            Intent::SetPlayingWord { word } => {
                self.set_playing_word(word);
                true
            }
            Intent::UpdateWordTiming { word_id, start, end } => {
                self.update_word_timing(&word_id, start, end)?;
                true
            }
            Intent::UndoWordTiming { word_id } => self.undo_word_timing(&word_id)?.is_some(),
            Intent::RedoWordTiming { word_id } => self.redo_word_timing(&word_id)?.is_some(),
            Intent::AddAnimationTrack {
                word_id,
                asset,
                timing,
                time_offset,
                params,
            } => {
                if time_offset.is_none() && params.is_none() {
                    self.add_animation_track_async(&word_id, asset, timing).await?
                } else {
                    self.add_animation_track(&word_id, asset, timing, time_offset, params)?
                }
            }
            Intent::RemoveAnimationTrack { word_id, asset_id } => {
                self.remove_animation_track(&word_id, &asset_id)?
            }
            Intent::UpdateAnimationTrackTiming {
                word_id,
                asset_id,
                start,
                end,
            } => self.update_animation_track_timing(&word_id, &asset_id, start, end)?,
            Intent::UpdateAnimationTrackIntensity {
                word_id,
                asset_id,
                min,
                max,
            } => self.update_animation_track_intensity(&word_id, &asset_id, min, max),
            Intent::UpdateAnimationTrackParams {
                word_id,
                asset_id,
                params,
            } => self.update_animation_track_params(&word_id, &asset_id, params)?,
            Intent::ClearAnimationTracks { word_id } => {
                self.clear_animation_tracks(&word_id)?;
                true
            }
            Intent::ToggleAnimationForWords { word_ids, asset } => {
                self.toggle_animation_for_words(&word_ids, &asset)? > 0
            }
            Intent::ToggleMultiSelectWord { clip_id, word_id } => {
                self.toggle_multi_select_word(clip_id, word_id);
                true
            }
            Intent::SelectWordRange { clip_id, word_id } => self.select_word_range(clip_id, word_id),
            Intent::ClearMultiSelection => {
                self.clear_multi_selection();
                true
            }
            Intent::DeleteSelectedWords => self.delete_selected_words()? > 0,
        };

        if !acted {
            debug!("Intent had no effect");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::memory::{MemoryClipStore, PluginEntry, RecordingCompiler, StaticManifest};
    use crate::model::{Clip, Word};
    use serde_json::json;
    use std::sync::Arc;

    fn editor() -> (WordEditor, Arc<RecordingCompiler>) {
        let store = Arc::new(MemoryClipStore::new(vec![Clip::new(
            "c1",
            vec![
                Word::new("w1", "hello", 0.0, 0.4),
                Word::new("w2", "there", 0.4, 0.9),
            ],
        )]));
        let compiler = Arc::new(RecordingCompiler::new());
        let manifest = Arc::new(StaticManifest::new().with_plugin(
            "fx.pop",
            PluginEntry {
                time_offset: (0.05, 0.05),
                params: Map::new(),
            },
        ));
        let editor = WordEditor::new(EditorConfig::default(), store, compiler.clone(), manifest);
        (editor, compiler)
    }

    #[test]
    fn test_intent_json_shape() {
        let intent: Intent = serde_json::from_value(json!({
            "type": "add_animation_track",
            "word_id": "w1",
            "asset": {"assetId": "pop", "assetName": "Pop", "pluginKey": "fx.pop"}
        }))
        .unwrap();
        match intent {
            Intent::AddAnimationTrack { word_id, asset, timing, .. } => {
                assert_eq!(word_id, WordId::from("w1"));
                assert_eq!(asset.plugin_key.as_deref(), Some("fx.pop"));
                assert!(timing.is_none());
            }
            other => panic!("unexpected intent: {:?}", other),
        }

        let unit: Intent = serde_json::from_value(json!({"type": "clear_word_focus"})).unwrap();
        assert_eq!(unit, Intent::ClearWordFocus);
    }

    #[tokio::test]
    async fn test_dispatch_script() {
        let (mut editor, compiler) = editor();
        let script: Vec<Intent> = serde_json::from_value(json!([
            {"type": "set_focused_word", "clip_id": "c1", "word_id": "w1"},
            {"type": "update_word_timing", "word_id": "w1", "start": 0.1, "end": 0.5},
            {"type": "add_animation_track", "word_id": "w1",
             "asset": {"assetId": "pop", "assetName": "Pop", "pluginKey": "fx.pop"}},
            {"type": "start_inline_edit", "clip_id": "c1", "word_id": "w1"},
            {"type": "undo_word_timing", "word_id": "w1"}
        ]))
        .unwrap();

        for intent in script {
            editor.dispatch(intent).await.unwrap();
        }

        assert_eq!(
            editor.current_timing(&"w1".into()),
            Some(TimingWindow { start: 0.0, end: 0.4 })
        );
        let track = &editor.tracks(&"w1".into())[0];
        assert_eq!(track.time_offset, Some((0.05, 0.05)));
        assert_eq!(track.timing, TimingWindow { start: 0.1, end: 0.5 });
        assert_eq!(editor.state().editing_word(), Some(&WordRef::new("c1", "w1")));
        assert!(compiler.last_chain(&"w1".into()).is_some());
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_propagation_error() {
        let (mut editor, compiler) = editor();
        compiler.set_fail(true);
        let err = editor
            .dispatch(Intent::UpdateWordTiming {
                word_id: "w2".into(),
                start: 0.4,
                end: 1.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.word_id(), Some(&WordId::from("w2")));
    }

    #[tokio::test]
    async fn test_refused_guard_is_not_an_error() {
        let (mut editor, _) = editor();
        editor
            .dispatch(Intent::AddToGroupSelection {
                word_id: "w2".into(),
            })
            .await
            .unwrap();
        assert!(editor.state().grouped_word_ids().is_empty());
    }
}

//! Shared handle to a word editor
//!
//! The editor itself is a plain `&mut self` state machine. The handle
//! wraps it for use from concurrent tasks and keeps slow manifest lookups
//! outside the lock, so other mutations proceed while a fetch is pending.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::collaborators::PluginManifest;
use crate::editor::{fetch_defaults_or_empty, WordEditor};
use crate::error::Result;
use crate::intent::Intent;
use crate::model::{TimingWindow, WordId};
use crate::tracks::AssetRef;

/// Cloneable, task-safe access to one [`WordEditor`]
#[derive(Clone)]
pub struct EditorHandle {
    editor: Arc<RwLock<WordEditor>>,
    manifest: Arc<dyn PluginManifest>,
}

impl EditorHandle {
    pub fn new(editor: WordEditor) -> Self {
        Self {
            manifest: editor.manifest(),
            editor: Arc::new(RwLock::new(editor)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, WordEditor> {
        self.editor.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, WordEditor> {
        self.editor.write().await
    }

    /// Attach an asset after fetching its plugin defaults
    ///
    /// The fetch runs without the editor lock. Duplicate and capacity
    /// checks happen once the lock is taken, against whatever state other
    /// tasks left behind in the meantime.
    pub async fn add_animation_track_async(
        &self,
        word_id: &WordId,
        asset: AssetRef,
        timing: Option<TimingWindow>,
    ) -> Result<bool> {
        let defaults = fetch_defaults_or_empty(self.manifest.as_ref(), &asset).await;
        debug!(word_id = %word_id, asset_id = %asset.asset_id, "Plugin defaults fetched");

        let mut editor = self.editor.write().await;
        editor.add_animation_track(word_id, asset, timing, defaults.time_offset, defaults.params)
    }

    /// Apply one intent, fetching manifest defaults outside the lock
    pub async fn dispatch(&self, intent: Intent) -> Result<()> {
        match intent {
            Intent::AddAnimationTrack {
                word_id,
                asset,
                timing,
                time_offset: None,
                params: None,
            } => {
                self.add_animation_track_async(&word_id, asset, timing)
                    .await?;
                Ok(())
            }
            other => self.editor.write().await.dispatch(other).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::memory::{MemoryClipStore, PluginEntry, RecordingCompiler, StaticManifest};
    use crate::model::{Clip, Word};
    use serde_json::Map;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn gated_handle() -> (EditorHandle, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(MemoryClipStore::new(vec![Clip::new(
            "c1",
            vec![Word::new("w1", "go", 0.0, 0.5)],
        )]));
        let manifest = Arc::new(
            StaticManifest::new()
                .with_plugin(
                    "fx.bounce",
                    PluginEntry {
                        time_offset: (0.1, 0.1),
                        params: Map::new(),
                    },
                )
                .with_gate(gate.clone()),
        );
        let editor = WordEditor::new(
            EditorConfig::default(),
            store,
            Arc::new(RecordingCompiler::new()),
            manifest,
        );
        (EditorHandle::new(editor), gate)
    }

    fn bounce() -> AssetRef {
        AssetRef::new("bounce", "Bounce").with_plugin_key("fx.bounce")
    }

    #[tokio::test]
    async fn test_pending_fetch_does_not_hold_lock() {
        let (handle, gate) = gated_handle();
        let pending = {
            let handle = handle.clone();
            tokio::spawn(async move {
                handle
                    .add_animation_track_async(&"w1".into(), bounce(), None)
                    .await
            })
        };
        tokio::task::yield_now().await;

        let guard = tokio::time::timeout(Duration::from_secs(1), handle.write())
            .await
            .expect("editor lock held during manifest fetch");
        drop(guard);

        gate.notify_one();
        assert!(pending.await.unwrap().unwrap());
        let editor = handle.read().await;
        assert_eq!(editor.tracks(&"w1".into())[0].time_offset, Some((0.1, 0.1)));
    }

    #[tokio::test]
    async fn test_capacity_rechecked_after_fetch() {
        let (handle, gate) = gated_handle();
        let pending = {
            let handle = handle.clone();
            tokio::spawn(async move {
                handle
                    .add_animation_track_async(&"w1".into(), bounce(), None)
                    .await
            })
        };
        tokio::task::yield_now().await;

        {
            let mut editor = handle.write().await;
            for id in ["fade", "glow", "spin"] {
                editor
                    .add_animation_track(&"w1".into(), AssetRef::new(id, id), None, None, None)
                    .unwrap();
            }
        }

        gate.notify_one();
        assert!(!pending.await.unwrap().unwrap());
        let editor = handle.read().await;
        assert_eq!(editor.tracks(&"w1".into()).len(), 3);
        assert!(!editor.has_asset(&"w1".into(), "bounce"));
    }

    #[tokio::test]
    async fn test_duplicate_rechecked_after_fetch() {
        let (handle, gate) = gated_handle();
        let pending = {
            let handle = handle.clone();
            tokio::spawn(async move {
                handle
                    .add_animation_track_async(&"w1".into(), bounce(), None)
                    .await
            })
        };
        tokio::task::yield_now().await;

        handle
            .write()
            .await
            .add_animation_track(&"w1".into(), bounce(), None, None, None)
            .unwrap();

        gate.notify_one();
        assert!(!pending.await.unwrap().unwrap());
        let editor = handle.read().await;
        assert_eq!(editor.tracks(&"w1".into()).len(), 1);
        assert!(editor.tracks(&"w1".into())[0].time_offset.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_through_handle() {
        let (handle, gate) = gated_handle();
        gate.notify_one();
        handle
            .dispatch(Intent::AddAnimationTrack {
                word_id: "w1".into(),
                asset: bounce(),
                timing: None,
                time_offset: None,
                params: None,
            })
            .await
            .unwrap();
        handle
            .dispatch(Intent::SetFocusedWord {
                clip_id: "c1".into(),
                word_id: Some("w1".into()),
            })
            .await
            .unwrap();

        let editor = handle.read().await;
        assert!(editor.has_asset(&"w1".into(), "bounce"));
        assert!(editor.state().focused_word().is_some());
    }
}

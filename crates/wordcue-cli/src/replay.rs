//! Scripted replay of editing intents against in-memory collaborators

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use wordcue_core::memory::{MemoryClipStore, PluginEntry, RecordingCompiler, StaticManifest};
use wordcue_core::{
    AnimationTrack, Clip, ClipStore, EditorConfig, Intent, InteractionState, WordEditor,
};

/// Inputs of one replay run
pub struct ReplayInput<'a> {
    pub project: &'a Path,
    pub script: &'a Path,
    pub manifest: Option<&'a Path>,
    pub config: EditorConfig,
}

/// Final editor state after a replay
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub applied: usize,
    pub failed: usize,
    pub compiler_calls: usize,
    pub state: InteractionState,
    pub clips: Vec<Clip>,
    pub tracks: BTreeMap<String, Vec<AnimationTrack>>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {} file {}", what, path.display()))
}

/// Run every intent of the script in order
///
/// A failing intent is logged and the replay continues with the next one.
pub async fn run(input: ReplayInput<'_>) -> Result<ReplayReport> {
    let mut clips: Vec<Clip> = read_json(input.project, "project")?;
    for clip in &mut clips {
        clip.rebuild_text();
    }
    let script: Vec<Intent> = read_json(input.script, "script")?;

    let mut manifest = StaticManifest::new();
    if let Some(path) = input.manifest {
        let plugins: HashMap<String, PluginEntry> = read_json(path, "manifest")?;
        for (key, entry) in plugins {
            manifest = manifest.with_plugin(key, entry);
        }
    }

    let store = Arc::new(MemoryClipStore::new(clips));
    let compiler = Arc::new(RecordingCompiler::new());
    let mut editor = WordEditor::new(input.config, store.clone(), compiler.clone(), Arc::new(manifest));

    tracing::info!(intents = script.len(), "Replaying script");
    let mut failed = 0;
    for (index, intent) in script.iter().enumerate() {
        if let Err(e) = editor.dispatch(intent.clone()).await {
            failed += 1;
            tracing::warn!(index, "Intent failed: {}", e);
        }
    }

    let clips = store.clips();
    let tracks = clips
        .iter()
        .flat_map(|clip| clip.words.iter())
        .filter(|word| !editor.tracks(&word.id).is_empty())
        .map(|word| (word.id.to_string(), editor.tracks(&word.id).to_vec()))
        .collect();

    Ok(ReplayReport {
        applied: script.len() - failed,
        failed,
        compiler_calls: compiler.calls().len(),
        state: editor.state().clone(),
        clips,
        tracks,
    })
}

/// Serialize a report for stdout
pub fn to_json(report: &ReplayReport) -> Result<Value> {
    serde_json::to_value(report).context("Failed to serialize replay report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(value: Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn project() -> NamedTempFile {
        json_file(json!([
            {"id": "c1", "words": [
                {"id": "w1", "text": "hello", "start": 0.0, "end": 0.4},
                {"id": "w2", "text": "big", "start": 0.4, "end": 0.7},
                {"id": "w3", "text": "world", "start": 0.7, "end": 1.2}
            ]}
        ]))
    }

    #[tokio::test]
    async fn test_replay_applies_script() {
        let project = project();
        let script = json_file(json!([
            {"type": "add_animation_track", "word_id": "w1",
             "asset": {"assetId": "pop", "assetName": "Pop", "pluginKey": "fx.pop"}},
            {"type": "toggle_multi_select_word", "clip_id": "c1", "word_id": "w2"},
            {"type": "select_word_range", "clip_id": "c1", "word_id": "w3"},
            {"type": "delete_selected_words"}
        ]));
        let manifest = json_file(json!({
            "fx.pop": {"timeOffset": [0.1, 0.2], "params": {"scale": 1.5}}
        }));

        let report = run(ReplayInput {
            project: project.path(),
            script: script.path(),
            manifest: Some(manifest.path()),
            config: EditorConfig::default(),
        })
        .await
        .unwrap();

        assert_eq!(report.applied, 4);
        assert_eq!(report.failed, 0);
        assert_eq!(report.clips[0].text, "hello");
        assert_eq!(report.tracks["w1"][0].time_offset, Some((0.1, 0.2)));
        assert!(report.state.multi_selected_word_ids().is_empty());

        let value = to_json(&report).unwrap();
        assert_eq!(value["clips"][0]["words"][0]["appliedAssets"], json!(["pop"]));
    }

    #[tokio::test]
    async fn test_replay_rejects_bad_script() {
        let project = project();
        let script = json_file(json!([{"type": "no_such_intent"}]));
        let result = run(ReplayInput {
            project: project.path(),
            script: script.path(),
            manifest: None,
            config: EditorConfig::default(),
        })
        .await;
        assert!(result.is_err());
    }
}

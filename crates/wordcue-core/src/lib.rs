//! Wordcue Core - word-level editing engine for timed-text (subtitle) editors
//!
//! This crate tracks how a user is interacting with the words of an ordered
//! list of clips and keeps the per-word editing data in sync with the rest
//! of the editor:
//! - Interaction state (focus, grouping, drag, inline edit, expanded view)
//! - Per-word timing history with bounded undo/redo
//! - Up to three animation tracks per word with slot-based colours
//! - Range and toggle multi-selection across clips
//! - Propagation of every mutation to the scenario compiler and clip store
//!
//! Storage of clips and words, scenario compilation and plugin manifests
//! are external collaborators, see [`collaborators`].

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod handle;
pub mod history;
pub mod intent;
pub mod interaction;
pub mod memory;
pub mod model;
pub mod propagation;
pub mod selection;
pub mod tracks;

// Re-exports for convenience
pub use collaborators::{ClipStore, PluginManifest, ScenarioCompiler};
pub use config::EditorConfig;
pub use editor::WordEditor;
pub use error::{EditorError, Result};
pub use handle::EditorHandle;
pub use intent::Intent;
pub use interaction::{DropPosition, InteractionState, WordStatePriority};
pub use model::{Clip, ClipId, TimingWindow, Word, WordId, WordRef};
pub use tracks::{AnimationTrack, AssetRef, Intensity, TrackColor};

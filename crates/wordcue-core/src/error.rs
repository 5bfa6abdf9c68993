//! Engine error types
//!
//! Guard rejections are not errors: operations that refuse to act report
//! that through their `bool` return value instead.

use thiserror::Error;

use crate::model::WordId;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors surfaced to callers of the editor
#[derive(Debug, Error)]
pub enum EditorError {
    /// The scenario compiler rejected the word's new state
    #[error("scenario compiler rejected word {word_id}{}: {source}", rollback_note(.rolled_back))]
    Propagation {
        word_id: WordId,
        /// Whether the in-memory change was undone
        rolled_back: bool,
        #[source]
        source: anyhow::Error,
    },

    /// Destructive clip-store update failed
    #[error("clip store update failed: {0}")]
    ClipStore(#[source] anyhow::Error),

    /// Plugin manifest lookup failed
    #[error("plugin manifest lookup failed for {plugin_key}: {source}")]
    Manifest {
        plugin_key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Config file could not be read
    #[error("config io error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config file is not valid TOML for `EditorConfig`
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

fn rollback_note(rolled_back: &bool) -> &'static str {
    if *rolled_back {
        " (rolled back)"
    } else {
        ""
    }
}

impl EditorError {
    /// The word whose propagation failed, if this is a propagation error
    pub fn word_id(&self) -> Option<&WordId> {
        match self {
            EditorError::Propagation { word_id, .. } => Some(word_id),
            _ => None,
        }
    }

    /// Whether the failed mutation was rolled back
    pub fn is_rolled_back(&self) -> bool {
        matches!(self, EditorError::Propagation { rolled_back: true, .. })
    }
}

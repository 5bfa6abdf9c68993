//! Animation tracks attached to words
//!
//! A word carries at most [`MAX_PER_WORD`](crate::constants::tracks::MAX_PER_WORD)
//! tracks. Colours follow slot position and are recomputed for the whole
//! word whenever its track list changes.

mod set;
mod track;

pub use set::{ToggleOutcome, TrackSet};
pub use track::{AnimationTrack, AssetRef, Intensity, TrackColor};

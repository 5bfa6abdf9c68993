//! Interaction state machine
//!
//! Owns the single process-wide interaction state: which word is focused,
//! grouped for a gesture, dragged, edited inline or expanded. Mutators are
//! plain `&mut self` methods; guarded ones report whether they acted.
//!
//! ## Invariants
//! - The group, when non-empty, always contains the focused word
//! - An inline-edited word is always the focused word
//! - An expanded view never coexists with more than one multi-selected word

mod priority;
mod state;

pub use priority::WordStatePriority;
pub use state::{DragState, DropPosition, InteractionState};

//! Data model shared by every component
//!
//! Words and clips are owned by the external clip store; the engine only
//! references them by id and reads snapshots of them.

mod clip;
mod ids;
mod timing;

pub use clip::{Clip, Word};
pub use ids::{ClipId, WordId, WordRef};
pub use timing::TimingWindow;

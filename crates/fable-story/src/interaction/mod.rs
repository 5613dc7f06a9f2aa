//! Pointer selection and timed overlays.

/// Dialogue and narration panels.
pub mod overlay;
/// Pointer-release picking.
pub mod selection;

pub use overlay::{OverlayHandle, show_dialogue, show_narration};
pub use selection::{PointerRelease, Selection, pick};

//! Error types for the story layer.

use thiserror::Error;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur while sequencing scenes.
#[derive(Debug, Error)]
pub enum StoryError {
    /// A navigation request pointed outside the scene list.
    #[error("scene index {index} out of bounds (0..{count})")]
    IndexOutOfRange {
        /// Requested index.
        index: i64,
        /// Number of scenes.
        count: usize,
    },

    /// The autopilot ran out of virtual time before the story ended.
    #[error("playthrough stalled at {at_ms} ms in scene {scene}")]
    Stalled {
        /// Virtual time when it gave up.
        at_ms: u64,
        /// Scene index it was stuck in.
        scene: usize,
    },

    /// Stage error.
    #[error("stage error: {0}")]
    Stage(#[from] fable_stage::StageError),

    /// Scene tree error.
    #[error("scene tree error: {0}")]
    Core(#[from] fable_core::CoreError),
}

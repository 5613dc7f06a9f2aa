//! The Tortoise and the Hare, as a staged story.
//!
//! A [`Sequencer`] owns the stage and an ordered ring of six scenes. Loading a
//! scene clears the active container, bumps the stage generation, and starts
//! the scene's opening [`Script`] on the [`Director`]. Scripts narrate, move
//! models, and reach cues where scenes show their buttons; pointer releases
//! are routed back to the scene that owns what they hit.

/// Headless playthroughs that tap through the story.
pub mod autopilot;
/// AR readiness and the desktop fallback.
pub mod bootstrap;
/// Runs scripts against the stage clock.
pub mod director;
/// Error types for the story crate.
pub mod error;
/// Pointer selection and timed overlays.
pub mod interaction;
/// The six scenes and their shared contract.
pub mod scenes;
/// Script steps and the script builder.
pub mod script;
/// Scene navigation and input routing.
pub mod sequencer;

pub use autopilot::{Autopilot, NapDecision, Playthrough, tap};
pub use bootstrap::{BootPhase, Bootstrap, Platform};
pub use director::Director;
pub use error::{StoryError, StoryResult};
pub use interaction::{OverlayHandle, PointerRelease, Selection};
pub use scenes::{
    CHEER_LABEL, NapState, PLAY_AGAIN_LABEL, Reaction, SLEEP_LABEL, SceneContext,
    SceneController, SceneDefinition,
};
pub use script::{Cue, Script, Step};
pub use sequencer::Sequencer;

//! Scene choreography as data.
//!
//! A [`Script`] is an ordered list of [`Step`]s. The director runs it as a
//! track, suspending on overlays, waits and awaited moves, and handing
//! [`Cue`]s back to the owning scene.

use std::collections::VecDeque;
use std::fmt;

use fable_stage::RateCurve;
use glam::Vec3;

/// A named callback into the scene controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cue(pub &'static str);

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cue '{}'", self.0)
    }
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Show narration and wait for it to clear.
    Narrate {
        /// Narrated text.
        text: String,
        /// Panel position.
        position: Vec3,
        /// Display time; `None` uses the configured default.
        duration_ms: Option<u64>,
    },
    /// Show a line of dialogue and wait for it to clear.
    Say {
        /// Speaking character.
        speaker: String,
        /// The line.
        text: String,
        /// Panel position.
        position: Vec3,
        /// Display time; `None` uses the configured default.
        duration_ms: Option<u64>,
    },
    /// Tween a loaded entity between two positions.
    Move {
        /// Entity name in the loaded-models table.
        entity: String,
        /// Start position.
        from: Vec3,
        /// End position.
        to: Vec3,
        /// Duration in milliseconds.
        duration_ms: u64,
        /// Pacing.
        curve: RateCurve,
        /// Keep going without waiting for the move to finish.
        detach: bool,
    },
    /// Pause the track.
    Wait(u64),
    /// Switch an entity's clip.
    Animate {
        /// Entity name.
        entity: String,
        /// Clip name.
        clip: String,
    },
    /// Request a sound.
    Sound {
        /// Sound asset.
        asset: String,
        /// Volume in `[0, 1]`.
        volume: f32,
    },
    /// Call back into the scene.
    Cue(Cue),
}

/// An ordered list of steps, built fluently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: VecDeque<Step>,
}

impl Script {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any step.
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push_back(step);
        self
    }

    /// Narrate for `duration_ms`.
    pub fn narrate(self, text: &str, position: Vec3, duration_ms: u64) -> Self {
        self.then(Step::Narrate {
            text: text.to_string(),
            position,
            duration_ms: Some(duration_ms),
        })
    }

    /// A dialogue line for `duration_ms`.
    pub fn say(self, speaker: &str, text: &str, position: Vec3, duration_ms: u64) -> Self {
        self.then(Step::Say {
            speaker: speaker.to_string(),
            text: text.to_string(),
            position,
            duration_ms: Some(duration_ms),
        })
    }

    /// Move and wait for arrival.
    pub fn walk(self, entity: &str, from: Vec3, to: Vec3, duration_ms: u64) -> Self {
        self.then(Step::Move {
            entity: entity.to_string(),
            from,
            to,
            duration_ms,
            curve: RateCurve::Linear,
            detach: false,
        })
    }

    /// Start a move and carry on immediately.
    pub fn dash(
        self,
        entity: &str,
        from: Vec3,
        to: Vec3,
        duration_ms: u64,
        curve: RateCurve,
    ) -> Self {
        self.then(Step::Move {
            entity: entity.to_string(),
            from,
            to,
            duration_ms,
            curve,
            detach: true,
        })
    }

    /// Pause.
    pub fn wait(self, ms: u64) -> Self {
        self.then(Step::Wait(ms))
    }

    /// Switch a clip.
    pub fn animate(self, entity: &str, clip: &str) -> Self {
        self.then(Step::Animate {
            entity: entity.to_string(),
            clip: clip.to_string(),
        })
    }

    /// Request a sound.
    pub fn sound(self, asset: &str, volume: f32) -> Self {
        self.then(Step::Sound {
            asset: asset.to_string(),
            volume,
        })
    }

    /// Hand control back to the scene.
    pub fn cue(self, cue: Cue) -> Self {
        self.then(Step::Cue(cue))
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there is nothing to run.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps in order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub(crate) fn into_steps(self) -> VecDeque<Step> {
        self.steps
    }
}

//! Headless playthroughs.
//!
//! The autopilot waits until the current scene is idle, then taps the button
//! on screen the way a viewer would: it projects the button to screen space
//! and sends a pointer release through selection routing.

use std::collections::VecDeque;
use std::fmt;

use fable_core::NodeId;

use crate::error::{StoryError, StoryResult};
use crate::interaction::PointerRelease;
use crate::scenes::{CHEER_LABEL, PLAY_AGAIN_LABEL, SLEEP_LABEL};
use crate::sequencer::Sequencer;

/// Default cap on a playthrough's virtual length.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 10 * 60 * 1000;

/// One decision at the nap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NapDecision {
    /// Let the hare sleep (the choice comes back).
    Sleep,
    /// Cheer the tortoise on (the story moves on).
    Cheer,
}

impl NapDecision {
    /// Button label for this choice.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sleep => SLEEP_LABEL,
            Self::Cheer => CHEER_LABEL,
        }
    }
}

impl fmt::Display for NapDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sleep => "sleep",
            Self::Cheer => "cheer",
        })
    }
}

impl std::str::FromStr for NapDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sleep" => Ok(Self::Sleep),
            "cheer" => Ok(Self::Cheer),
            other => Err(format!("unknown nap choice '{other}' (expected sleep or cheer)")),
        }
    }
}

/// What a finished playthrough looked like.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playthrough {
    /// Labels tapped, in order.
    pub taps: Vec<String>,
    /// Scene indices in the order they were on stage.
    pub scenes: Vec<usize>,
    /// Virtual time when the final control appeared.
    pub finished_at_ms: u64,
}

/// Drives a sequencer from its current scene to the final Play Again control.
#[derive(Debug, Clone)]
pub struct Autopilot {
    nap_choices: VecDeque<NapDecision>,
    time_limit_ms: u64,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            nap_choices: VecDeque::new(),
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
        }
    }
}

impl Autopilot {
    /// An autopilot that cheers at the first chance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decisions to make at the nap, in order. Once they run out it cheers.
    pub fn with_nap_choices(mut self, choices: impl IntoIterator<Item = NapDecision>) -> Self {
        self.nap_choices = choices.into_iter().collect();
        self
    }

    /// Give up after this much virtual time.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    fn choose(&mut self, buttons: &[(NodeId, String)]) -> Option<(NodeId, String)> {
        let offers_nap = buttons.iter().any(|(_, l)| l == SLEEP_LABEL)
            && buttons.iter().any(|(_, l)| l == CHEER_LABEL);
        if offers_nap {
            let choice = self.nap_choices.pop_front().unwrap_or(NapDecision::Cheer);
            return buttons
                .iter()
                .find(|(_, label)| label == choice.label())
                .cloned();
        }
        buttons.first().cloned()
    }

    /// Tap through the story until Play Again shows in the last scene.
    pub fn run(&mut self, seq: &mut Sequencer) -> StoryResult<Playthrough> {
        let deadline = seq.stage().now() + self.time_limit_ms;
        let last = seq.scene_count() - 1;
        let mut report = Playthrough {
            scenes: vec![seq.current_index()],
            ..Playthrough::default()
        };

        loop {
            if report.scenes.last() != Some(&seq.current_index()) {
                report.scenes.push(seq.current_index());
            }
            if seq.is_idle() {
                let buttons = seq.visible_buttons();
                if seq.current_index() == last
                    && buttons.iter().any(|(_, l)| l == PLAY_AGAIN_LABEL)
                {
                    report.finished_at_ms = seq.stage().now();
                    return Ok(report);
                }
                if let Some((button, label)) = self.choose(&buttons)
                    && tap(seq, button)?
                {
                    log::debug!("autopilot tapped '{label}'");
                    report.taps.push(label);
                }
            }
            if seq.stage().now() >= deadline {
                return Err(StoryError::Stalled {
                    at_ms: seq.stage().now(),
                    scene: seq.current_index(),
                });
            }
            seq.frame()?;
        }
    }
}

/// Tap a node where it appears on screen. Returns whether anything was selected.
pub fn tap(seq: &mut Sequencer, node: NodeId) -> StoryResult<bool> {
    let stage = seq.stage();
    let Some(screen) = stage
        .tree()
        .world_position(node)
        .and_then(|world| stage.camera().project(world))
    else {
        log::warn!("cannot tap {node}: not in view");
        return Ok(false);
    };
    let selected = seq.pointer_release(PointerRelease::at(screen.x, screen.y))?;
    Ok(selected.is_some())
}

//! The six scenes and the contract they implement.

mod finish_line;
mod intro;
mod keeps_going;
mod moral;
mod nap_choice;
mod race_begins;

use std::fmt;

use fable_core::{NodeId, Transform};
use fable_stage::{Stage, StageError};
use glam::Vec3;

use crate::error::StoryResult;
use crate::script::{Cue, Script};

pub use finish_line::FinishLine;
pub use intro::Intro;
pub use keeps_going::TortoiseKeepsGoing;
pub use moral::{MoralEnding, PLAY_AGAIN_LABEL};
pub use nap_choice::{CHEER_LABEL, NapChoice, NapState, SLEEP_LABEL};
pub use race_begins::RaceBegins;

/// Where narration panels float.
pub(crate) const NARRATION_AT: Vec3 = Vec3::new(0.0, 1.5, 0.0);
/// Where a single advancing button sits.
pub(crate) const BUTTON_AT: Vec3 = Vec3::new(0.0, 0.8, 0.0);
/// Above the tortoise's head.
pub(crate) const TORTOISE_SAYS_AT: Vec3 = Vec3::new(-0.5, 1.0, 0.0);
/// Above the hare's head.
pub(crate) const HARE_SAYS_AT: Vec3 = Vec3::new(0.5, 1.0, 0.0);

/// Immutable per-scene metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneDefinition {
    /// Short tag.
    pub id: &'static str,
    /// Title shown on the status board.
    pub title: &'static str,
    /// What the viewer should do.
    pub instructions: &'static str,
}

/// What a scene wants to happen after a cue or a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// Run another script alongside whatever is running.
    Continue(Script),
    /// Move on to the next scene.
    Advance,
    /// Nothing to do.
    Ignore,
}

/// One staged scene.
///
/// `enter` populates the container and returns the opening script. Cues and
/// selections come back through `on_cue` and `on_select`. Every handle a
/// scene needs later is stored in its own fields.
pub trait SceneController: fmt::Debug {
    /// Title, instructions and tag.
    fn definition(&self) -> &SceneDefinition;

    /// Reset scene state, populate the container, and return the opening script.
    fn enter(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<Script>;

    /// A script reached a [`Cue`] step.
    fn on_cue(&mut self, _cue: Cue, _ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        Ok(Reaction::Ignore)
    }

    /// A pointer release selected `entity`.
    fn on_select(&mut self, _entity: NodeId, _ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        Ok(Reaction::Ignore)
    }
}

/// What a scene may touch: the stage and its active container.
#[derive(Debug)]
pub struct SceneContext<'a> {
    /// Shared runtime.
    pub stage: &'a mut Stage,
    /// The container this scene renders into.
    pub container: NodeId,
}

impl<'a> SceneContext<'a> {
    /// Bind a context to `container`.
    pub fn new(stage: &'a mut Stage, container: NodeId) -> Self {
        Self { stage, container }
    }

    /// Place a catalog model in the container.
    ///
    /// An asset the provider cannot build is reported like any other missing
    /// node and the scene goes on without it.
    pub fn place(&mut self, asset: &str, transform: Transform) -> StoryResult<Option<NodeId>> {
        match self.stage.spawn_model(self.container, asset, transform) {
            Ok(id) => Ok(Some(id)),
            Err(StageError::UnknownAsset(name)) => {
                self.stage.report_missing(&name);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Place a button in the container.
    pub fn button(&mut self, label: &str, position: Vec3) -> StoryResult<NodeId> {
        Ok(self.stage.spawn_button(self.container, label, position)?)
    }

    /// Switch an entity's clip.
    pub fn animate(&mut self, entity: &str, clip: &str) {
        self.stage.animate(entity, clip);
    }

    /// Remove a node placed earlier, if it is still there.
    pub fn remove(&mut self, node: Option<NodeId>) -> StoryResult<()> {
        if let Some(id) = node
            && self.stage.tree().contains(id)
        {
            self.stage.tree_mut().remove(id)?;
        }
        Ok(())
    }

    /// Flag a loaded entity as tappable. Missing entities are reported.
    pub fn make_interactive(&mut self, entity: &str) -> Option<NodeId> {
        let id = self.stage.entity(entity)?;
        if let Some(node) = self.stage.tree_mut().get_mut(id) {
            node.interactive = true;
        }
        Some(id)
    }
}

/// Position plus Y rotation, the way every scene places its props.
pub(crate) fn placed(position: Vec3, yaw_deg: f32) -> Transform {
    Transform::at(position).with_rotation(Vec3::new(0.0, yaw_deg, 0.0))
}

/// The grass, dirt path and two trees used along the race course.
pub(crate) fn race_course(ctx: &mut SceneContext<'_>) -> StoryResult<()> {
    ctx.place("grassPatch", Transform::default().with_scale(Vec3::new(2.0, 1.0, 2.0)))?;
    ctx.place(
        "dirtPath",
        placed(Vec3::new(0.0, 0.01, 0.0), 90.0).with_scale(Vec3::new(2.0, 1.0, 1.0)),
    )?;
    ctx.place("tree", placed(Vec3::new(-1.0, 0.0, -1.0), 45.0))?;
    ctx.place("tree", placed(Vec3::new(1.0, 0.0, -1.0), -30.0))?;
    Ok(())
}

/// Every scene, in story order.
pub fn story() -> Vec<Box<dyn SceneController>> {
    vec![
        Box::new(Intro::default()),
        Box::new(RaceBegins::default()),
        Box::new(TortoiseKeepsGoing::default()),
        Box::new(NapChoice::default()),
        Box::new(FinishLine::default()),
        Box::new(MoralEnding::default()),
    ]
}

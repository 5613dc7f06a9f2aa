use fable_core::{NodeId, Transform};
use glam::Vec3;

use super::{
    HARE_SAYS_AT, NARRATION_AT, Reaction, SceneContext, SceneController, SceneDefinition, placed,
};
use crate::error::StoryResult;
use crate::script::{Cue, Script};

const OFFER_REPLAY: Cue = Cue("offer-replay");

/// Label of the control that ends the story.
pub const PLAY_AGAIN_LABEL: &str = "Play Again";

/// Scene 6: the moral, and a way back to the start.
#[derive(Debug, Default)]
pub struct MoralEnding {
    replay: Option<NodeId>,
}

impl MoralEnding {
    const DEFINITION: SceneDefinition = SceneDefinition {
        id: "moral-ending",
        title: "Scene 6: Slow and Steady",
        instructions: "Tap \"Play Again\" to watch the race from the start",
    };
}

impl SceneController for MoralEnding {
    fn definition(&self) -> &SceneDefinition {
        &Self::DEFINITION
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<Script> {
        *self = Self::default();

        ctx.place("grassPatch", Transform::default())?;
        ctx.place("finishFlag", placed(Vec3::new(0.0, 0.0, -0.8), 0.0))?;
        ctx.place("tortoise", placed(Vec3::new(-0.5, 0.3, 0.0), 30.0))?;
        ctx.animate("tortoise", "celebrate");
        ctx.place("hare", placed(Vec3::new(0.5, 0.5, 0.0), -30.0))?;
        ctx.animate("hare", "sulk");

        Ok(Script::new()
            .narrate(
                "Slow and steady wins the race. Keep going, and you will get there.",
                NARRATION_AT,
                8000,
            )
            .say(
                "Hare",
                "You never stopped, and I did. Well raced, Tortoise.",
                HARE_SAYS_AT,
                5000,
            )
            .cue(OFFER_REPLAY))
    }

    fn on_cue(&mut self, cue: Cue, ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        if cue == OFFER_REPLAY {
            self.replay = Some(ctx.button(PLAY_AGAIN_LABEL, super::BUTTON_AT)?);
        }
        Ok(Reaction::Ignore)
    }

    fn on_select(&mut self, entity: NodeId, _ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        Ok(if self.replay == Some(entity) {
            Reaction::Advance
        } else {
            Reaction::Ignore
        })
    }
}

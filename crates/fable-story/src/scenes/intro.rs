use fable_core::{NodeId, Transform};
use glam::Vec3;

use super::{
    BUTTON_AT, HARE_SAYS_AT, NARRATION_AT, Reaction, SceneContext, SceneController,
    SceneDefinition, TORTOISE_SAYS_AT, placed,
};
use crate::error::StoryResult;
use crate::script::{Cue, Script};

const OFFER_TALK: Cue = Cue("offer-talk");
const OFFER_START: Cue = Cue("offer-start");

/// Scene 1: the two meet on the forest path and agree to race.
#[derive(Debug, Default)]
pub struct Intro {
    talk: Option<NodeId>,
    start: Option<NodeId>,
}

impl Intro {
    const DEFINITION: SceneDefinition = SceneDefinition {
        id: "intro",
        title: "Scene 1: The First Meeting",
        instructions: "Tap the \"Talk\" button to start the conversation",
    };
}

impl SceneController for Intro {
    fn definition(&self) -> &SceneDefinition {
        &Self::DEFINITION
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<Script> {
        *self = Self::default();

        ctx.place("grassPatch", Transform::default())?;
        ctx.place("dirtPath", Transform::at(Vec3::new(0.0, 0.01, 0.0)))?;
        ctx.place("tree", placed(Vec3::new(1.0, 0.0, -1.0), 45.0))?;
        ctx.place("tortoise", placed(Vec3::new(-0.5, 0.3, 0.0), 90.0))?;
        ctx.animate("tortoise", "idle");
        ctx.place("hare", placed(Vec3::new(0.5, 0.5, 0.0), -90.0))?;
        ctx.animate("hare", "idle");

        Ok(Script::new()
            .narrate(
                "One sunny morning, the Tortoise and the Hare met on a forest path. \
                 They'd never raced before… but something was in the air.",
                NARRATION_AT,
                8000,
            )
            .cue(OFFER_TALK))
    }

    fn on_cue(&mut self, cue: Cue, ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        match cue {
            OFFER_TALK => self.talk = Some(ctx.button("Talk", BUTTON_AT)?),
            OFFER_START => self.start = Some(ctx.button("Start the Race", BUTTON_AT)?),
            _ => {}
        }
        Ok(Reaction::Ignore)
    }

    fn on_select(&mut self, entity: NodeId, ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        if self.talk == Some(entity) {
            ctx.remove(self.talk.take())?;
            return Ok(Reaction::Continue(
                Script::new()
                    .animate("hare", "smug")
                    .say(
                        "Hare",
                        "Hey slowpoke, want to race just for fun?",
                        HARE_SAYS_AT,
                        5000,
                    )
                    .animate("tortoise", "blink")
                    .say(
                        "Tortoise",
                        "Sure, let's see who keeps going longer.",
                        TORTOISE_SAYS_AT,
                        5000,
                    )
                    .animate("hare", "idle")
                    .animate("tortoise", "idle")
                    .cue(OFFER_START),
            ));
        }
        if self.start == Some(entity) {
            return Ok(Reaction::Advance);
        }
        Ok(Reaction::Ignore)
    }
}

use fable_core::NodeId;
use fable_stage::RateCurve;
use glam::Vec3;

use super::{
    BUTTON_AT, NARRATION_AT, Reaction, SceneContext, SceneController, SceneDefinition, placed,
    race_course,
};
use crate::error::StoryResult;
use crate::script::{Cue, Script};

const OFFER_CONTINUE: Cue = Cue("offer-continue");

/// How long the final stretch takes for both racers.
pub const RACE_MS: u64 = 8000;

/// Where both racers are headed.
pub const FINISH_X: f32 = 1.2;

const TORTOISE_FROM: Vec3 = Vec3::new(-1.0, 0.3, 0.6);
const TORTOISE_TO: Vec3 = Vec3::new(FINISH_X, 0.3, 0.6);
const HARE_FROM: Vec3 = Vec3::new(-0.4, 0.5, -0.6);
const HARE_TO: Vec3 = Vec3::new(FINISH_X, 0.5, -0.6);

/// Scene 5: the hare wakes too late and the tortoise takes the flag.
///
/// The hare runs on [`RateCurve::HARE`], so when both tweens complete it
/// stands at 70% of its path, short of the line.
#[derive(Debug, Default)]
pub struct FinishLine {
    proceed: Option<NodeId>,
}

impl FinishLine {
    const DEFINITION: SceneDefinition = SceneDefinition {
        id: "finish-line",
        title: "Scene 5: The Finish Line",
        instructions: "Watch the final stretch",
    };
}

impl SceneController for FinishLine {
    fn definition(&self) -> &SceneDefinition {
        &Self::DEFINITION
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<Script> {
        *self = Self::default();

        race_course(ctx)?;
        ctx.place("finishFlag", placed(Vec3::new(FINISH_X, 0.0, 0.0), 0.0))?;
        ctx.place("tortoise", placed(TORTOISE_FROM, 90.0))?;
        ctx.place("hare", placed(HARE_FROM, 90.0))?;
        ctx.animate("hare", "wake");

        Ok(Script::new()
            .narrate(
                "Hare woke with a start and saw Tortoise nearing the finish line!",
                NARRATION_AT,
                5000,
            )
            .animate("hare", "run")
            .animate("tortoise", "walk")
            .dash("hare", HARE_FROM, HARE_TO, RACE_MS, RateCurve::HARE)
            .walk("tortoise", TORTOISE_FROM, TORTOISE_TO, RACE_MS)
            .animate("tortoise", "celebrate")
            .animate("hare", "sulk")
            .narrate(
                "Tortoise crossed the line first. Hare was still a few bounds behind.",
                NARRATION_AT,
                6000,
            )
            .cue(OFFER_CONTINUE))
    }

    fn on_cue(&mut self, cue: Cue, ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        if cue == OFFER_CONTINUE {
            self.proceed = Some(ctx.button("Continue", BUTTON_AT)?);
        }
        Ok(Reaction::Ignore)
    }

    fn on_select(&mut self, entity: NodeId, _ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        Ok(if self.proceed == Some(entity) {
            Reaction::Advance
        } else {
            Reaction::Ignore
        })
    }
}

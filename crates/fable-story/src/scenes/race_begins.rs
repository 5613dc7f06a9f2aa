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

const HARE_FROM: Vec3 = Vec3::new(-0.8, 0.5, -0.6);
const HARE_TO: Vec3 = Vec3::new(1.0, 0.5, -0.6);
const TORTOISE_FROM: Vec3 = Vec3::new(-1.0, 0.3, 0.6);
const TORTOISE_TO: Vec3 = Vec3::new(-0.5, 0.3, 0.6);

/// Scene 2: the hare bolts, the tortoise plods.
#[derive(Debug, Default)]
pub struct RaceBegins {
    proceed: Option<NodeId>,
}

impl RaceBegins {
    const DEFINITION: SceneDefinition = SceneDefinition {
        id: "race-begins",
        title: "Scene 2: The Race Begins",
        instructions: "Watch as the race begins",
    };
}

impl SceneController for RaceBegins {
    fn definition(&self) -> &SceneDefinition {
        &Self::DEFINITION
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<Script> {
        *self = Self::default();

        race_course(ctx)?;
        ctx.place("tortoise", placed(TORTOISE_FROM, 90.0))?;
        ctx.place("hare", placed(HARE_FROM, 90.0))?;

        Ok(Script::new()
            .narrate(
                "The race began! The Hare took off with lightning speed \
                 while the Tortoise moved steadily.",
                NARRATION_AT,
                6000,
            )
            .animate("hare", "run")
            .animate("tortoise", "walk")
            .dash("hare", HARE_FROM, HARE_TO, 3000, RateCurve::Linear)
            .dash("tortoise", TORTOISE_FROM, TORTOISE_TO, 6000, RateCurve::Linear)
            .wait(6000)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing;
    use crate::script::Step;

    #[test]
    fn double_scale_course_and_racers() {
        let (mut stage, ar) = testing::stage();
        let mut scene = RaceBegins::default();
        let script = scene.enter(&mut SceneContext::new(&mut stage, ar)).unwrap();

        // grass, path, two trees, tortoise, hare
        assert_eq!(stage.tree().children(ar).len(), 6);
        let grass = stage.tree().children(ar)[0];
        assert_eq!(
            stage.tree().get(grass).unwrap().transform.scale,
            Vec3::new(2.0, 1.0, 2.0)
        );

        let moves: Vec<(bool, u64)> = script
            .steps()
            .filter_map(|s| match s {
                Step::Move {
                    detach,
                    duration_ms,
                    ..
                } => Some((*detach, *duration_ms)),
                _ => None,
            })
            .collect();
        assert_eq!(moves, vec![(true, 3000), (true, 6000)]);
    }

    #[test]
    fn continue_advances() {
        let (mut stage, ar) = testing::stage();
        let mut scene = RaceBegins::default();
        let mut ctx = SceneContext::new(&mut stage, ar);
        scene.enter(&mut ctx).unwrap();
        scene.on_cue(OFFER_CONTINUE, &mut ctx).unwrap();
        let (button, _) = testing::buttons(ctx.stage, ar).remove(0);
        assert_eq!(scene.on_select(button, &mut ctx).unwrap(), Reaction::Advance);
    }
}

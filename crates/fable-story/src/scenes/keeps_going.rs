use fable_core::NodeId;
use glam::Vec3;

use super::{
    BUTTON_AT, NARRATION_AT, Reaction, SceneContext, SceneController, SceneDefinition,
    TORTOISE_SAYS_AT, placed, race_course,
};
use crate::error::StoryResult;
use crate::script::{Cue, Script};

const OFFER_CONTINUE: Cue = Cue("offer-continue");

const WALK_FROM: Vec3 = Vec3::new(-0.5, 0.3, 0.0);
const WALK_TO: Vec3 = Vec3::new(0.5, 0.3, 0.0);

/// Scene 3: the tortoise walks on alone; tap it to hear what it thinks.
#[derive(Debug, Default)]
pub struct TortoiseKeepsGoing {
    tortoise: Option<NodeId>,
    proceed: Option<NodeId>,
}

impl TortoiseKeepsGoing {
    const DEFINITION: SceneDefinition = SceneDefinition {
        id: "tortoise-keeps-going",
        title: "Scene 3: Tortoise Keeps Going",
        instructions: "Tap on Tortoise to hear his thoughts",
    };
}

impl SceneController for TortoiseKeepsGoing {
    fn definition(&self) -> &SceneDefinition {
        &Self::DEFINITION
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<Script> {
        *self = Self::default();

        race_course(ctx)?;
        ctx.place("tortoise", placed(WALK_FROM, 90.0))?;
        self.tortoise = ctx.make_interactive("tortoise");
        ctx.animate("tortoise", "walk");

        Ok(Script::new()
            .narrate(
                "As Hare speeds ahead, Tortoise stays focused, moving at his own pace.",
                NARRATION_AT,
                6000,
            )
            .walk("tortoise", WALK_FROM, WALK_TO, 10_000)
            .cue(OFFER_CONTINUE))
    }

    fn on_cue(&mut self, cue: Cue, ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        if cue == OFFER_CONTINUE {
            self.proceed = Some(ctx.button("Continue", BUTTON_AT)?);
        }
        Ok(Reaction::Ignore)
    }

    fn on_select(&mut self, entity: NodeId, _ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        if self.tortoise == Some(entity) {
            return Ok(Reaction::Continue(
                Script::new()
                    .animate("tortoise", "blink")
                    .say(
                        "Tortoise",
                        "No rush. I'll just keep moving forward.",
                        TORTOISE_SAYS_AT,
                        5000,
                    )
                    .animate("tortoise", "walk"),
            ));
        }
        if self.proceed == Some(entity) {
            return Ok(Reaction::Advance);
        }
        Ok(Reaction::Ignore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing;

    #[test]
    fn tortoise_is_tappable_and_walking() {
        let (mut stage, ar) = testing::stage();
        let mut scene = TortoiseKeepsGoing::default();
        scene.enter(&mut SceneContext::new(&mut stage, ar)).unwrap();

        let tortoise = stage.models().loaded_model(stage.tree(), "tortoise").unwrap();
        assert!(stage.tree().get(tortoise).unwrap().interactive);
        assert_eq!(
            stage.models().current_clip(stage.tree(), "tortoise"),
            Some("walk")
        );
    }

    #[test]
    fn tapping_tortoise_shares_a_thought() {
        let (mut stage, ar) = testing::stage();
        let mut scene = TortoiseKeepsGoing::default();
        let mut ctx = SceneContext::new(&mut stage, ar);
        scene.enter(&mut ctx).unwrap();
        let tortoise = scene.tortoise.unwrap();

        let reaction = scene.on_select(tortoise, &mut ctx).unwrap();
        assert!(matches!(reaction, Reaction::Continue(ref s) if s.len() == 3));
    }

    #[test]
    fn continue_advances_to_the_nap() {
        let (mut stage, ar) = testing::stage();
        let mut scene = TortoiseKeepsGoing::default();
        let mut ctx = SceneContext::new(&mut stage, ar);
        scene.enter(&mut ctx).unwrap();
        scene.on_cue(OFFER_CONTINUE, &mut ctx).unwrap();
        let (button, label) = testing::buttons(ctx.stage, ar).remove(0);
        assert_eq!(label, "Continue");
        assert_eq!(scene.on_select(button, &mut ctx).unwrap(), Reaction::Advance);
    }
}

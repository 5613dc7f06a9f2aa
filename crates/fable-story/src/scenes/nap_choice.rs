use fable_core::NodeId;
use glam::Vec3;

use super::{
    BUTTON_AT, NARRATION_AT, Reaction, SceneContext, SceneController, SceneDefinition,
    TORTOISE_SAYS_AT, placed,
};
use crate::error::StoryResult;
use crate::script::{Cue, Script};

const OFFER: Cue = Cue("offer");
const CHEERED: Cue = Cue("cheered");

/// Label of the button that lets the hare nap.
pub const SLEEP_LABEL: &str = "Let Hare Sleep";
/// Label of the button that cheers the tortoise on.
pub const CHEER_LABEL: &str = "Cheer for Tortoise";

const SNORE_VOLUME: f32 = 0.5;

/// Where the nap scene stands.
///
/// `Arriving -> Offering`, then either `Offering -> Sleeping -> Offering`
/// or `Offering -> Cheering -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NapState {
    /// Opening narration is still up.
    #[default]
    Arriving,
    /// Both choices are on screen.
    Offering,
    /// The hare is napping; the choice comes back afterwards.
    Sleeping,
    /// The crowd is cheering the tortoise past.
    Cheering,
    /// Only Continue remains.
    Done,
}

/// Scene 4: the hare stops for a nap and the viewer decides what happens.
#[derive(Debug, Default)]
pub struct NapChoice {
    state: NapState,
    sleep: Option<NodeId>,
    cheer: Option<NodeId>,
    proceed: Option<NodeId>,
    naps: u32,
}

impl NapChoice {
    const DEFINITION: SceneDefinition = SceneDefinition {
        id: "nap-choice",
        title: "Scene 4: A Tempting Nap",
        instructions: "Choose what happens while Hare rests",
    };

    /// Current state.
    pub fn state(&self) -> NapState {
        self.state
    }

    /// How many times the hare has been allowed to sleep.
    pub fn naps(&self) -> u32 {
        self.naps
    }

    fn clear_choice(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<()> {
        ctx.remove(self.sleep.take())?;
        ctx.remove(self.cheer.take())
    }
}

impl SceneController for NapChoice {
    fn definition(&self) -> &SceneDefinition {
        &Self::DEFINITION
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) -> StoryResult<Script> {
        *self = Self::default();

        ctx.place("grassPatch", fable_core::Transform::default())?;
        ctx.place("tree", placed(Vec3::new(1.0, 0.0, -1.0), 45.0))?;
        ctx.place("hare", placed(Vec3::new(0.7, 0.5, -0.7), -90.0))?;
        ctx.animate("hare", "idle");
        ctx.place("tortoise", placed(Vec3::new(-1.0, 0.3, 0.6), 90.0))?;
        ctx.animate("tortoise", "walk");

        Ok(Script::new()
            .narrate(
                "Far ahead and sure of victory, Hare flopped down beneath a shady tree.",
                NARRATION_AT,
                6000,
            )
            .cue(OFFER))
    }

    fn on_cue(&mut self, cue: Cue, ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        match (cue, self.state) {
            (OFFER, NapState::Arriving | NapState::Sleeping) => {
                self.sleep = Some(ctx.button(SLEEP_LABEL, Vec3::new(-0.6, 0.8, 0.0))?);
                self.cheer = Some(ctx.button(CHEER_LABEL, Vec3::new(0.6, 0.8, 0.0))?);
                self.state = NapState::Offering;
            }
            (CHEERED, NapState::Cheering) => {
                self.proceed = Some(ctx.button("Continue", BUTTON_AT)?);
                self.state = NapState::Done;
            }
            (cue, state) => log::debug!("nap scene ignores {cue} while {state:?}"),
        }
        Ok(Reaction::Ignore)
    }

    fn on_select(&mut self, entity: NodeId, ctx: &mut SceneContext<'_>) -> StoryResult<Reaction> {
        let selected = Some(entity);
        match self.state {
            NapState::Offering if selected == self.sleep => {
                self.clear_choice(ctx)?;
                self.state = NapState::Sleeping;
                self.naps += 1;
                Ok(Reaction::Continue(
                    Script::new()
                        .animate("hare", "sleep")
                        .sound("snore", SNORE_VOLUME)
                        .narrate(
                            "Hare curled up for a quick nap. Surely Tortoise was miles behind…",
                            NARRATION_AT,
                            5000,
                        )
                        .cue(OFFER),
                ))
            }
            NapState::Offering if selected == self.cheer => {
                self.clear_choice(ctx)?;
                self.state = NapState::Cheering;
                Ok(Reaction::Continue(
                    Script::new()
                        .animate("hare", "sleep")
                        .narrate(
                            "The forest animals cheered as Tortoise plodded past the sleeping Hare.",
                            NARRATION_AT,
                            5000,
                        )
                        .say(
                            "Tortoise",
                            "Slow and steady. One step at a time.",
                            TORTOISE_SAYS_AT,
                            5000,
                        )
                        .cue(CHEERED),
                ))
            }
            NapState::Done if selected == self.proceed => Ok(Reaction::Advance),
            _ => Ok(Reaction::Ignore),
        }
    }
}

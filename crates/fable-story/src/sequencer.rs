use fable_core::{ContainerKind, NodeId, NodeKind};
use fable_stage::{Completion, Stage, StageConfig, StageEventKind};

use crate::director::Director;
use crate::error::{StoryError, StoryResult};
use crate::interaction::{PointerRelease, Selection, pick};
use crate::scenes::{self, Reaction, SceneContext, SceneController, SceneDefinition};
use crate::script::Cue;

/// The scene sequencer.
///
/// Owns the stage, the director and the ordered scene list, plus the
/// navigation state (`current_index`, `non_ar_mode`). Every load bumps the
/// stage generation, so work left over from a previous scene is discarded
/// instead of touching the new one.
pub struct Sequencer {
    stage: Stage,
    director: Director,
    scenes: Vec<Box<dyn SceneController>>,
    current_index: usize,
    non_ar_mode: bool,
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("current_index", &self.current_index)
            .field("non_ar_mode", &self.non_ar_mode)
            .field("scenes", &self.scenes.len())
            .field("tracks", &self.director.track_count())
            .field("stage", &self.stage)
            .finish()
    }
}

impl Sequencer {
    /// A sequencer for the full story on a fresh stage.
    pub fn new(config: StageConfig) -> Self {
        Self::with_stage(Stage::new(config))
    }

    /// A sequencer for the full story on an existing stage.
    pub fn with_stage(stage: Stage) -> Self {
        Self {
            stage,
            director: Director::new(),
            scenes: scenes::story(),
            current_index: 0,
            non_ar_mode: false,
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Number of scenes.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Index of the scene on stage (0 before the first load).
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Metadata of the current scene.
    pub fn current_scene(&self) -> &SceneDefinition {
        self.scenes[self.current_index].definition()
    }

    /// Metadata of every scene, in order.
    pub fn definitions(&self) -> impl Iterator<Item = &SceneDefinition> {
        self.scenes.iter().map(|s| s.definition())
    }

    /// Whether scenes render into the fallback container.
    pub fn non_ar_mode(&self) -> bool {
        self.non_ar_mode
    }

    /// Pick the container for subsequent loads.
    pub fn set_non_ar_mode(&mut self, enabled: bool) {
        self.non_ar_mode = enabled;
        log::info!("non-AR mode: {enabled}");
    }

    /// The container scenes currently render into.
    pub fn active_container(&self) -> NodeId {
        let kind = if self.non_ar_mode {
            ContainerKind::Fallback
        } else {
            ContainerKind::Ar
        };
        self.stage.tree().container(kind)
    }

    /// Load scene `index`.
    ///
    /// Out-of-range indices are reported and leave everything as it was.
    /// Once the index is valid the load commits: a scene whose setup fails
    /// keeps what it built and is logged, not returned as an error.
    pub fn load_scene(&mut self, index: i64) -> StoryResult<()> {
        let count = self.scenes.len();
        let Some(target) = usize::try_from(index).ok().filter(|i| *i < count) else {
            log::error!("scene index {index} out of bounds");
            self.stage
                .record(StageEventKind::NavigationRejected { index });
            return Err(StoryError::IndexOutOfRange { index, count });
        };

        let generation = self.stage.next_generation();
        self.current_index = target;
        let container = self.active_container();
        let cleared = self.stage.clear_container(ContainerKind::Ar)?
            + self.stage.clear_container(ContainerKind::Fallback)?;
        let dropped = self.director.reset();

        let definition = *self.scenes[target].definition();
        self.stage
            .status_mut()
            .show(definition.title, definition.instructions);
        self.stage.record(StageEventKind::SceneLoaded {
            index: target,
            title: definition.title.to_string(),
        });
        log::info!(
            "loading scene {target} '{}' (generation {generation}, cleared {cleared} nodes, dropped {dropped} tracks)",
            definition.id
        );

        let entered = {
            let mut ctx = SceneContext::new(&mut self.stage, container);
            self.scenes[target].enter(&mut ctx)
        };
        match entered {
            Ok(script) => self.director.start(script, generation),
            Err(e) => log::error!("scene {target} '{}' left incomplete: {e}", definition.id),
        }
        self.pump(&[])
    }

    /// Next scene, wrapping from the last back to the first.
    pub fn advance(&mut self) -> StoryResult<()> {
        let next = (self.current_index + 1) % self.scenes.len();
        self.load_scene(next as i64)
    }

    /// Previous scene, wrapping from the first to the last.
    pub fn retreat(&mut self) -> StoryResult<()> {
        let count = self.scenes.len();
        let previous = (self.current_index + count - 1) % count;
        self.load_scene(previous as i64)
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Route a pointer release to the scene that owns what it hit.
    pub fn pointer_release(&mut self, release: PointerRelease) -> StoryResult<Option<Selection>> {
        let container = self.active_container();
        let Some(selection) = pick(self.stage.tree(), self.stage.camera(), container, release)
        else {
            return Ok(None);
        };
        self.stage.record(StageEventKind::Selected {
            entity: selection.name.clone(),
        });

        let reaction = {
            let mut ctx = SceneContext::new(&mut self.stage, container);
            self.scenes[self.current_index].on_select(selection.entity, &mut ctx)?
        };
        self.react(reaction)?;
        Ok(Some(selection))
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Advance one frame and run whatever it unblocked.
    pub fn frame(&mut self) -> StoryResult<Vec<Completion>> {
        let completions = self.stage.step(self.stage.config().frame_ms);
        self.pump(&completions)?;
        Ok(completions)
    }

    /// Run frames until at least `ms` of virtual time has passed.
    pub fn run_for(&mut self, ms: u64) -> StoryResult<()> {
        let until = self.stage.now() + ms;
        while self.stage.now() < until {
            self.frame()?;
        }
        Ok(())
    }

    /// No script is running or waiting; the scene is waiting for a tap.
    pub fn is_idle(&self) -> bool {
        self.director.is_idle()
    }

    /// Buttons currently showing in the active container, in placement order.
    pub fn visible_buttons(&self) -> Vec<(NodeId, String)> {
        let tree = self.stage.tree();
        tree.children(self.active_container())
            .iter()
            .filter_map(|id| match &tree.get(*id)?.kind {
                NodeKind::Button { label } => Some((*id, label.clone())),
                _ => None,
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// The stage.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mutable access to the stage.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn react(&mut self, reaction: Reaction) -> StoryResult<()> {
        match reaction {
            Reaction::Continue(script) => {
                self.director.start(script, self.stage.generation());
                self.pump(&[])
            }
            Reaction::Advance => self.advance(),
            Reaction::Ignore => Ok(()),
        }
    }

    fn pump(&mut self, completions: &[Completion]) -> StoryResult<()> {
        let generation = self.stage.generation();
        let mut cues = self.pump_director(completions)?;
        while !cues.is_empty() {
            for cue in cues {
                if self.stage.generation() != generation {
                    log::debug!("dropping {cue} from generation {generation}");
                    continue;
                }
                match self.cue(cue)? {
                    // Runs once the rest of this batch has been delivered.
                    Reaction::Continue(script) => self.director.start(script, generation),
                    reaction => self.react(reaction)?,
                }
            }
            if self.stage.generation() != generation {
                return Ok(());
            }
            cues = self.pump_director(&[])?;
        }
        Ok(())
    }

    fn pump_director(&mut self, completions: &[Completion]) -> StoryResult<Vec<Cue>> {
        let container = self.active_container();
        let mut ctx = SceneContext::new(&mut self.stage, container);
        self.director.pump(&mut ctx, completions)
    }

    fn cue(&mut self, cue: Cue) -> StoryResult<Reaction> {
        let container = self.active_container();
        let mut ctx = SceneContext::new(&mut self.stage, container);
        self.scenes[self.current_index].on_cue(cue, &mut ctx)
    }
}

use fable_core::{ContainerKind, NodeId, SceneTree, Transform};
use glam::Vec3;

use crate::audio::{AudioSink, RecordingSink};
use crate::camera::Camera;
use crate::clock::StageClock;
use crate::config::{MissingNodePolicy, StageConfig};
use crate::error::{StageError, StageResult};
use crate::event::{EventLog, StageEvent, StageEventKind};
use crate::models::{AssetCatalog, ModelManager, ModelProvider};
use crate::status::StatusBoard;
use crate::timer::{TimerAction, TimerId, TimerQueue};
use crate::tween::{PositionTween, RateCurve, TweenId};

/// What finished during a [`Stage::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// A timer fired.
    Timer(TimerId),
    /// A tween reached the end of its duration.
    Tween(TweenId),
}

/// A finished timer or tween, tagged with the generation it belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Which wait finished.
    pub signal: Signal,
    /// Generation the wait was started under. Always the current one.
    pub generation: u64,
}

/// The shared runtime every scene script acts on.
///
/// Owns the scene tree, clock, pending timers and tweens, the model provider,
/// audio sink, status board and event log. Continuations scheduled before the
/// latest [`Stage::next_generation`] are dropped when they come due.
pub struct Stage {
    tree: SceneTree,
    clock: StageClock,
    timers: TimerQueue,
    tweens: Vec<PositionTween>,
    next_tween: u64,
    models: Box<dyn ModelProvider>,
    audio: Box<dyn AudioSink>,
    status: StatusBoard,
    events: EventLog,
    camera: Camera,
    config: StageConfig,
    generation: u64,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("now_ms", &self.clock.now())
            .field("generation", &self.generation)
            .field("nodes", &self.tree.len())
            .field("timers", &self.timers.len())
            .field("tweens", &self.tweens.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Stage {
    /// A stage with the story asset catalog and a recording audio sink.
    pub fn new(config: StageConfig) -> Self {
        Self {
            tree: SceneTree::new(),
            clock: StageClock::new(),
            timers: TimerQueue::new(),
            tweens: Vec::new(),
            next_tween: 0,
            models: Box::new(ModelManager::new(AssetCatalog::story())),
            audio: Box::new(RecordingSink::new()),
            status: StatusBoard::default(),
            events: EventLog::new(config.max_events),
            camera: Camera::new(config.camera, config.viewport),
            config,
            generation: 0,
        }
    }

    /// Replace the model provider.
    pub fn with_models(mut self, models: impl ModelProvider + 'static) -> Self {
        self.models = Box::new(models);
        self
    }

    /// Replace the audio sink.
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    // -----------------------------------------------------------------------
    // Generations
    // -----------------------------------------------------------------------

    /// Invalidate every pending continuation and return the new generation.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        log::debug!("stage generation is now {}", self.generation);
        self.generation
    }

    /// The current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// The virtual clock.
    pub fn clock(&self) -> &StageClock {
        &self.clock
    }

    /// Schedule a timer `delay_ms` from now under the current generation.
    pub fn schedule(&mut self, delay_ms: u64, action: TimerAction) -> TimerId {
        let due = self.clock.now() + delay_ms;
        self.timers.schedule(due, self.generation, action)
    }

    /// Number of timers still waiting, stale ones included.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether this timer has yet to fire.
    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.timers.is_pending(id)
    }

    /// Move `node` from `start` to `end` over `duration_ms`.
    ///
    /// The node jumps to `start` immediately.
    pub fn start_tween(
        &mut self,
        node: NodeId,
        start: Vec3,
        end: Vec3,
        duration_ms: u64,
        curve: RateCurve,
    ) -> StageResult<TweenId> {
        self.tree.set_position(node, start)?;
        self.next_tween += 1;
        let id = TweenId(self.next_tween);
        self.tweens.push(PositionTween {
            id,
            node,
            start,
            end,
            started_ms: self.clock.now(),
            duration_ms,
            curve,
            generation: self.generation,
        });
        Ok(id)
    }

    /// Tweens still running, stale ones included.
    pub fn active_tweens(&self) -> &[PositionTween] {
        &self.tweens
    }

    /// Advance the clock by `dt_ms`, apply tweens and fire due timers.
    ///
    /// Returns what finished, in order: tweens first, then timers by due time.
    pub fn step(&mut self, dt_ms: u64) -> Vec<Completion> {
        let now = self.clock.advance(dt_ms);
        let mut done = Vec::new();

        let tweens = std::mem::take(&mut self.tweens);
        for tween in tweens {
            if tween.generation != self.generation {
                self.discard_stale(tween.generation, &tween.id.to_string());
                continue;
            }
            let name = self.tree.get(tween.node).map(|n| n.name.clone());
            let Some(name) = name else {
                log::debug!("{} lost its node, finishing early", tween.id);
                done.push(Completion {
                    signal: Signal::Tween(tween.id),
                    generation: tween.generation,
                });
                continue;
            };
            if let Err(e) = self.tree.set_position(tween.node, tween.sample(now)) {
                log::warn!("{}: {e}", tween.id);
            }
            if tween.is_finished(now) {
                self.record(StageEventKind::MoveFinished { entity: name });
                done.push(Completion {
                    signal: Signal::Tween(tween.id),
                    generation: tween.generation,
                });
            } else {
                self.tweens.push(tween);
            }
        }

        for timer in self.timers.pop_due(now) {
            if timer.generation != self.generation {
                self.discard_stale(timer.generation, &timer.id.to_string());
                continue;
            }
            if let TimerAction::RemoveNode(node) = timer.action
                && self.tree.contains(node)
                && let Err(e) = self.tree.remove(node)
            {
                log::warn!("{}: {e}", timer.id);
            }
            done.push(Completion {
                signal: Signal::Timer(timer.id),
                generation: timer.generation,
            });
        }

        done
    }

    fn discard_stale(&mut self, generation: u64, what: &str) {
        log::debug!(
            "dropping {what} from generation {generation} (current {})",
            self.generation
        );
        self.record(StageEventKind::StaleDiscarded { generation });
    }

    // -----------------------------------------------------------------------
    // Scene tree and models
    // -----------------------------------------------------------------------

    /// The scene tree.
    pub fn tree(&self) -> &SceneTree {
        &self.tree
    }

    /// Mutable access to the scene tree.
    pub fn tree_mut(&mut self) -> &mut SceneTree {
        &mut self.tree
    }

    /// Remove everything under one of the content containers.
    pub fn clear_container(&mut self, kind: ContainerKind) -> StageResult<usize> {
        let id = self.tree.container(kind);
        Ok(self.tree.clear_children(id)?)
    }

    /// The model provider.
    pub fn models(&self) -> &dyn ModelProvider {
        self.models.as_ref()
    }

    /// Place a model under `parent`.
    pub fn spawn_model(
        &mut self,
        parent: NodeId,
        asset: &str,
        transform: Transform,
    ) -> StageResult<NodeId> {
        self.models
            .create_model_entity(&mut self.tree, parent, asset, transform)
    }

    /// Place a button under `parent` and record that it is showing.
    pub fn spawn_button(&mut self, parent: NodeId, label: &str, position: Vec3) -> StageResult<NodeId> {
        let id = self
            .models
            .create_button_entity(&mut self.tree, parent, label, position)?;
        self.record(StageEventKind::ButtonShown {
            label: label.to_string(),
        });
        Ok(id)
    }

    /// The live node for a loaded entity, reporting it when absent.
    pub fn entity(&mut self, name: &str) -> Option<NodeId> {
        let found = self.models.loaded_model(&self.tree, name);
        if found.is_none() {
            self.report_missing(name);
        }
        found
    }

    /// Play a clip on a loaded entity.
    ///
    /// Missing entities follow the configured policy; unknown clips are
    /// logged. Neither interrupts the scene.
    pub fn animate(&mut self, entity: &str, clip: &str) {
        match self.models.play_animation(&self.tree, entity, clip) {
            Ok(()) => self.record(StageEventKind::Animation {
                entity: entity.to_string(),
                clip: clip.to_string(),
            }),
            Err(StageError::MissingModel(name)) => self.report_missing(&name),
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Report a reference to an entity that is not on stage.
    pub fn report_missing(&mut self, name: &str) {
        match self.config.missing_nodes {
            MissingNodePolicy::Warn => {
                log::warn!("scene referenced missing node '{name}'");
                self.record(StageEventKind::MissingNode {
                    name: name.to_string(),
                });
            }
            MissingNodePolicy::Ignore => log::debug!("ignoring missing node '{name}'"),
        }
    }

    // -----------------------------------------------------------------------
    // Audio
    // -----------------------------------------------------------------------

    /// Request a sound. Failures are logged and recorded, never raised.
    pub fn play_sound(&mut self, asset: &str, volume: f32) {
        match self.audio.play(asset, volume) {
            Ok(()) => self.record(StageEventKind::Sound {
                asset: asset.to_string(),
                volume,
            }),
            Err(e) => {
                log::warn!("sound '{asset}' failed: {e}");
                self.record(StageEventKind::SoundFailed {
                    asset: asset.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    /// The audio sink.
    pub fn audio(&self) -> &dyn AudioSink {
        self.audio.as_ref()
    }

    // -----------------------------------------------------------------------
    // Readouts
    // -----------------------------------------------------------------------

    /// Record an event at the current time and generation.
    pub fn record(&mut self, kind: StageEventKind) {
        self.events.push(StageEvent {
            at_ms: self.clock.now(),
            generation: self.generation,
            kind,
        });
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The status board.
    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Mutable access to the status board.
    pub fn status_mut(&mut self) -> &mut StatusBoard {
        &mut self.status
    }

    /// The camera used for picking and projection.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The configuration this stage was built with.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }
}

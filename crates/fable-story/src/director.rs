//! Runs scene scripts as concurrently suspended tracks.

use std::collections::VecDeque;

use fable_stage::{Completion, Signal, StageEventKind, TimerAction};

use crate::error::StoryResult;
use crate::interaction::{show_dialogue, show_narration};
use crate::scenes::SceneContext;
use crate::script::{Cue, Script, Step};

#[derive(Debug)]
struct Track {
    id: u64,
    generation: u64,
    steps: VecDeque<Step>,
    waiting: Option<Signal>,
}

enum Outcome {
    Next,
    Await(Signal),
    Cue(Cue),
}

/// Executes scripts step by step on the stage.
///
/// Each script becomes a track. A track runs until it reaches a step that has
/// to wait (overlay, wait, awaited move) or a cue, and resumes once the
/// awaited completion shows up in [`Director::pump`]. Tracks started under an
/// older generation are dropped without running.
#[derive(Debug, Default)]
pub struct Director {
    tracks: Vec<Track>,
    next_id: u64,
}

impl Director {
    /// A director with no tracks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `script` as a new track. It runs on the next pump.
    pub fn start(&mut self, script: Script, generation: u64) {
        if script.is_empty() {
            return;
        }
        self.next_id += 1;
        self.tracks.push(Track {
            id: self.next_id,
            generation,
            steps: script.into_steps(),
            waiting: None,
        });
    }

    /// Drop every track. Returns how many were running.
    pub fn reset(&mut self) -> usize {
        let dropped = self.tracks.len();
        self.tracks.clear();
        dropped
    }

    /// No track is running or suspended.
    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of live tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Resume tracks whose wait completed, then run every ready track.
    ///
    /// Returns the cues reached, in track order. A track that hits a cue
    /// stops there and continues on the following pump.
    pub fn pump(
        &mut self,
        ctx: &mut SceneContext<'_>,
        completed: &[Completion],
    ) -> StoryResult<Vec<Cue>> {
        let generation = ctx.stage.generation();
        self.tracks.retain(|track| {
            let current = track.generation == generation;
            if !current {
                log::debug!(
                    "dropping track {} from generation {}",
                    track.id,
                    track.generation
                );
            }
            current
        });

        for track in &mut self.tracks {
            if let Some(signal) = track.waiting
                && completed.iter().any(|c| c.signal == signal)
            {
                track.waiting = None;
            }
        }

        let mut cues = Vec::new();
        for track in &mut self.tracks {
            if track.waiting.is_some() {
                continue;
            }
            while let Some(step) = track.steps.pop_front() {
                match execute(step, ctx)? {
                    Outcome::Next => {}
                    Outcome::Await(signal) => {
                        track.waiting = Some(signal);
                        break;
                    }
                    Outcome::Cue(cue) => {
                        cues.push(cue);
                        break;
                    }
                }
            }
        }

        self.tracks
            .retain(|track| track.waiting.is_some() || !track.steps.is_empty());
        Ok(cues)
    }
}

fn execute(step: Step, ctx: &mut SceneContext<'_>) -> StoryResult<Outcome> {
    let outcome = match step {
        Step::Narrate {
            text,
            position,
            duration_ms,
        } => {
            let handle = show_narration(ctx.stage, ctx.container, &text, position, duration_ms)?;
            Outcome::Await(handle.signal())
        }
        Step::Say {
            speaker,
            text,
            position,
            duration_ms,
        } => {
            let handle =
                show_dialogue(ctx.stage, ctx.container, &speaker, &text, position, duration_ms)?;
            Outcome::Await(handle.signal())
        }
        Step::Move {
            entity,
            from,
            to,
            duration_ms,
            curve,
            detach,
        } => match ctx.stage.entity(&entity) {
            Some(node) => {
                let id = ctx.stage.start_tween(node, from, to, duration_ms, curve)?;
                ctx.stage.record(StageEventKind::MoveStarted { entity });
                if detach {
                    Outcome::Next
                } else {
                    Outcome::Await(Signal::Tween(id))
                }
            }
            None => Outcome::Next,
        },
        Step::Wait(ms) => Outcome::Await(Signal::Timer(ctx.stage.schedule(ms, TimerAction::Notify))),
        Step::Animate { entity, clip } => {
            ctx.animate(&entity, &clip);
            Outcome::Next
        }
        Step::Sound { asset, volume } => {
            ctx.stage.play_sound(&asset, volume);
            Outcome::Next
        }
        Step::Cue(cue) => Outcome::Cue(cue),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::testing;
    use fable_core::Transform;
    use fable_stage::{RateCurve, Stage};
    use glam::Vec3;

    fn pump(director: &mut Director, stage: &mut Stage, done: &[Completion]) -> Vec<Cue> {
        let ar = stage.tree().container(fable_core::ContainerKind::Ar);
        let mut ctx = SceneContext::new(stage, ar);
        director.pump(&mut ctx, done).unwrap()
    }

    fn run(director: &mut Director, stage: &mut Stage, ms: u64) -> Vec<Cue> {
        let mut cues = Vec::new();
        for _ in 0..ms / 10 {
            let done = stage.step(10);
            cues.extend(pump(director, stage, &done));
        }
        cues
    }

    #[test]
    fn narration_suspends_until_removed() {
        let (mut stage, _) = testing::stage();
        let mut director = Director::new();
        director.start(
            Script::new()
                .narrate("first", Vec3::Y, 100)
                .narrate("second", Vec3::Y, 100)
                .cue(Cue("done")),
            stage.generation(),
        );

        assert!(pump(&mut director, &mut stage, &[]).is_empty());
        assert_eq!(testing::lines(&stage), vec!["first"]);

        assert!(run(&mut director, &mut stage, 100).is_empty());
        assert_eq!(testing::lines(&stage), vec!["first", "second"]);

        assert_eq!(run(&mut director, &mut stage, 100), vec![Cue("done")]);
        assert!(director.is_idle());
    }

    #[test]
    fn tracks_run_side_by_side() {
        let (mut stage, _) = testing::stage();
        let mut director = Director::new();
        director.start(Script::new().wait(200).cue(Cue("slow")), 0);
        director.start(Script::new().wait(50).cue(Cue("fast")), 0);
        pump(&mut director, &mut stage, &[]);
        assert_eq!(director.track_count(), 2);

        assert_eq!(run(&mut director, &mut stage, 50), vec![Cue("fast")]);
        assert_eq!(run(&mut director, &mut stage, 150), vec![Cue("slow")]);
    }

    #[test]
    fn awaited_move_blocks_detached_does_not() {
        let (mut stage, ar) = testing::stage();
        stage.spawn_model(ar, "hare", Transform::default()).unwrap();
        stage.spawn_model(ar, "tortoise", Transform::default()).unwrap();
        let mut director = Director::new();
        director.start(
            Script::new()
                .dash("hare", Vec3::ZERO, Vec3::X, 1000, RateCurve::HARE)
                .walk("tortoise", Vec3::ZERO, Vec3::X, 500)
                .cue(Cue("arrived")),
            0,
        );
        pump(&mut director, &mut stage, &[]);
        assert_eq!(stage.active_tweens().len(), 2);
        assert!(run(&mut director, &mut stage, 490).is_empty());
        assert_eq!(run(&mut director, &mut stage, 10), vec![Cue("arrived")]);
    }

    #[test]
    fn move_of_missing_entity_is_skipped() {
        let (mut stage, _) = testing::stage();
        let mut director = Director::new();
        director.start(
            Script::new()
                .walk("tortoise", Vec3::ZERO, Vec3::X, 500)
                .cue(Cue("next")),
            0,
        );
        assert_eq!(pump(&mut director, &mut stage, &[]), vec![Cue("next")]);
        assert_eq!(
            stage
                .events()
                .matching(|k| matches!(k, StageEventKind::MissingNode { .. }))
                .len(),
            1
        );
    }

    #[test]
    fn cue_pauses_track_until_next_pump() {
        let (mut stage, _) = testing::stage();
        let mut director = Director::new();
        director.start(Script::new().cue(Cue("a")).cue(Cue("b")), 0);
        assert_eq!(pump(&mut director, &mut stage, &[]), vec![Cue("a")]);
        assert_eq!(pump(&mut director, &mut stage, &[]), vec![Cue("b")]);
        assert!(director.is_idle());
    }

    #[test]
    fn stale_tracks_are_dropped() {
        let (mut stage, _) = testing::stage();
        let mut director = Director::new();
        director.start(Script::new().cue(Cue("late")), stage.generation());
        stage.next_generation();
        assert!(pump(&mut director, &mut stage, &[]).is_empty());
        assert!(director.is_idle());
    }

    #[test]
    fn sound_step_does_not_wait() {
        let (mut stage, _) = testing::stage();
        let mut director = Director::new();
        director.start(Script::new().sound("snore", 0.5).cue(Cue("after")), 0);
        assert_eq!(pump(&mut director, &mut stage, &[]), vec![Cue("after")]);
        assert_eq!(
            stage
                .events()
                .matching(|k| matches!(k, StageEventKind::Sound { .. }))
                .len(),
            1
        );
    }
}

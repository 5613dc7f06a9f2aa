//! Time-driven position interpolation.
//!
//! Every tween samples `progress = clamp((now - start) / duration, 0, 1)`,
//! maps it through a [`RateCurve`], and places the node at
//! `start + (end - start) * curve(progress)`. A tween is finished once raw
//! progress reaches 1; what the curve returns at that point is where the node
//! stays.

use std::fmt;

use fable_core::NodeId;
use glam::Vec3;

/// Identifier of a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

impl fmt::Display for TweenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tween#{}", self.0)
    }
}

/// Maps raw progress to effective progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RateCurve {
    /// Effective progress equals raw progress.
    #[default]
    Linear,
    /// Full rate up to `breakpoint`, then `rate` times slower from there on.
    TwoPhase {
        /// Raw progress at which the slowdown begins.
        breakpoint: f32,
        /// Rate multiplier after the breakpoint.
        rate: f32,
    },
}

impl RateCurve {
    /// The hare's overconfident pacing: full speed to 60%, then quarter speed.
    pub const HARE: RateCurve = RateCurve::TwoPhase {
        breakpoint: 0.6,
        rate: 0.25,
    };

    /// Effective progress for a raw progress in `[0, 1]`.
    pub fn apply(self, progress: f32) -> f32 {
        match self {
            Self::Linear => progress,
            Self::TwoPhase { breakpoint, rate } => {
                if progress < breakpoint {
                    progress
                } else {
                    (breakpoint + (progress - breakpoint) * rate).min(1.0)
                }
            }
        }
    }
}

/// Raw progress at `now_ms` for a tween started at `started_ms`.
pub fn progress_at(started_ms: u64, duration_ms: u64, now_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    let elapsed = now_ms.saturating_sub(started_ms) as f64;
    (elapsed / duration_ms as f64).clamp(0.0, 1.0) as f32
}

/// A running position tween.
#[derive(Debug, Clone)]
pub struct PositionTween {
    /// Identifier.
    pub id: TweenId,
    /// Node being moved.
    pub node: NodeId,
    /// Start position.
    pub start: Vec3,
    /// Declared end position.
    pub end: Vec3,
    /// Virtual time the tween began.
    pub started_ms: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Pacing curve.
    pub curve: RateCurve,
    /// Scene generation it belongs to.
    pub generation: u64,
}

impl PositionTween {
    /// Raw progress at `now_ms`.
    pub fn progress(&self, now_ms: u64) -> f32 {
        progress_at(self.started_ms, self.duration_ms, now_ms)
    }

    /// Position at `now_ms`.
    pub fn sample(&self, now_ms: u64) -> Vec3 {
        let effective = self.curve.apply(self.progress(now_ms));
        self.start + (self.end - self.start) * effective
    }

    /// Whether the tween has reached raw progress 1.
    pub fn is_finished(&self, now_ms: u64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

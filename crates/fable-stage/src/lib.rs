//! Stage runtime for Fable.
//!
//! The stage is everything a scene script touches besides its own state: the
//! scene tree, a virtual millisecond clock, generation-tagged timers and
//! position tweens, the model/asset provider, an audio sink, the status
//! board, and an event log. All of it runs on one thread; time only moves
//! when [`Stage::step`] is called.

/// Audio cue requests and the sink trait.
pub mod audio;
/// Perspective camera, rays, and screen/NDC conversion.
pub mod camera;
/// Virtual clock.
pub mod clock;
/// Configuration for a stage run.
pub mod config;
/// Error types for the stage crate.
pub mod error;
/// Stage event types and the event log.
pub mod event;
/// Model/asset provider and the built-in asset catalog.
pub mod models;
/// The stage orchestrator.
pub mod stage;
/// Scene title/instructions readout.
pub mod status;
/// Generation-tagged timers.
pub mod timer;
/// Position tweens and rate curves.
pub mod tween;

/// Re-exports of the audio types.
pub use audio::{AudioError, AudioSink, RecordingSink};
/// Re-exports of the camera types.
pub use camera::{Camera, Ray};
/// Re-export of [`clock::StageClock`].
pub use clock::StageClock;
/// Re-exports of the configuration types.
pub use config::{CameraConfig, MissingNodePolicy, StageConfig, Viewport};
/// Re-exports of [`error::StageError`] and [`error::StageResult`].
pub use error::{StageError, StageResult};
/// Re-exports of the event types.
pub use event::{EventLog, StageEvent, StageEventKind};
/// Re-exports of the model provider types.
pub use models::{AssetCatalog, AssetSpec, ModelManager, ModelProvider};
/// Re-exports of the stage orchestrator types.
pub use stage::{Completion, Signal, Stage};
/// Re-export of [`status::StatusBoard`].
pub use status::StatusBoard;
/// Re-exports of the timer types.
pub use timer::{TimerAction, TimerId};
/// Re-exports of the tween types.
pub use tween::{PositionTween, RateCurve, TweenId};

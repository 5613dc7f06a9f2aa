//! AR readiness and the desktop fallback.
//!
//! Runs on the sequencer's virtual clock. A detected surface starts the story
//! after a short delay. If nothing is detected within the readiness timeout,
//! fallback mode is offered, and desktops switch to it on their own.

use fable_stage::{Completion, Signal, TimerAction, TimerId};

use crate::error::StoryResult;
use crate::sequencer::Sequencer;

/// Delay between surface detection and the first scene.
pub const SURFACE_START_DELAY_MS: u64 = 1000;
/// How long to wait for AR before offering the fallback.
pub const AR_READY_TIMEOUT_MS: u64 = 5000;
/// Delay before a desktop switches to the fallback by itself.
pub const DESKTOP_FALLBACK_DELAY_MS: u64 = 2000;

/// What kind of device the story runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Phone or tablet with a camera.
    Mobile,
    /// Desktop browser; AR is not expected to work.
    Desktop,
}

/// Where startup stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// Waiting for AR.
    Loading,
    /// AR did not come up; the viewer may pick fallback mode.
    FallbackOffered,
    /// The first scene has been loaded.
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootTimer {
    StartStory,
    ReadinessTimeout,
    DesktopFallback,
}

/// Startup state machine.
#[derive(Debug)]
pub struct Bootstrap {
    platform: Platform,
    phase: BootPhase,
    ar_initialized: bool,
    ar_error: bool,
    message: Option<String>,
    pending: Vec<(TimerId, BootTimer)>,
}

impl Bootstrap {
    /// Begin waiting for AR.
    pub fn start(platform: Platform, seq: &mut Sequencer) -> Self {
        let mut boot = Self {
            platform,
            phase: BootPhase::Loading,
            ar_initialized: false,
            ar_error: false,
            message: None,
            pending: Vec::new(),
        };
        if platform == Platform::Desktop {
            log::info!("desktop environment detected, expecting non-AR mode");
            boot.message =
                Some("Desktop environment detected. Using non-AR mode for development.".into());
        }
        boot.schedule(seq, AR_READY_TIMEOUT_MS, BootTimer::ReadinessTimeout);
        boot
    }

    fn schedule(&mut self, seq: &mut Sequencer, delay_ms: u64, timer: BootTimer) {
        let id = seq.stage_mut().schedule(delay_ms, TimerAction::Notify);
        self.pending.push((id, timer));
    }

    /// AR found a surface to anchor to.
    pub fn surface_detected(&mut self, seq: &mut Sequencer) {
        log::info!("surface detected");
        self.ar_initialized = true;
        self.schedule(seq, SURFACE_START_DELAY_MS, BootTimer::StartStory);
    }

    /// The camera could not be opened.
    pub fn camera_error(&mut self) {
        log::error!("camera error");
        self.ar_error = true;
        self.message = Some("Camera permission denied or error accessing camera".into());
    }

    /// Surface detection gave up.
    pub fn hit_test_failed(&mut self) {
        log::error!("surface detection failed");
        self.ar_error = true;
        self.message = Some(
            "Surface detection failed. Try pointing your camera at a different flat surface."
                .into(),
        );
    }

    /// Viewer picked fallback mode from the offer.
    pub fn choose_fallback(&mut self, seq: &mut Sequencer) -> StoryResult<()> {
        self.enter_fallback(seq)
    }

    fn enter_fallback(&mut self, seq: &mut Sequencer) -> StoryResult<()> {
        seq.set_non_ar_mode(true);
        seq.load_scene(0)?;
        self.phase = BootPhase::Running;
        Ok(())
    }

    /// Feed a frame's completions. Loads the first scene when it is time.
    pub fn on_frame(&mut self, seq: &mut Sequencer, completions: &[Completion]) -> StoryResult<()> {
        let fired: Vec<BootTimer> = self
            .pending
            .iter()
            .filter(|(id, _)| completions.iter().any(|c| c.signal == Signal::Timer(*id)))
            .map(|(_, timer)| *timer)
            .collect();
        self.pending
            .retain(|(id, _)| !completions.iter().any(|c| c.signal == Signal::Timer(*id)));

        for timer in fired {
            if self.phase == BootPhase::Running {
                break;
            }
            match timer {
                BootTimer::StartStory => {
                    seq.load_scene(0)?;
                    self.phase = BootPhase::Running;
                }
                BootTimer::ReadinessTimeout if !self.ar_initialized => {
                    log::info!("AR initialization timed out, offering fallback mode");
                    self.phase = BootPhase::FallbackOffered;
                    if !self.ar_error {
                        self.message = Some(
                            "AR initialization timed out. Your device may not support AR \
                             features or requires additional permissions."
                                .into(),
                        );
                    }
                    if self.platform == Platform::Desktop {
                        self.schedule(seq, DESKTOP_FALLBACK_DELAY_MS, BootTimer::DesktopFallback);
                    }
                }
                BootTimer::ReadinessTimeout => {}
                BootTimer::DesktopFallback => {
                    log::info!("auto-starting non-AR mode for desktop");
                    self.enter_fallback(seq)?;
                }
            }
        }
        Ok(())
    }

    /// Run frames until the story starts or `limit_ms` of virtual time passes.
    pub fn run(&mut self, seq: &mut Sequencer, limit_ms: u64) -> StoryResult<BootPhase> {
        let until = seq.stage().now() + limit_ms;
        while self.phase != BootPhase::Running && seq.stage().now() < until {
            let completions = seq.frame()?;
            self.on_frame(seq, &completions)?;
        }
        Ok(self.phase)
    }

    /// Current phase.
    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// The message on the error banner, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_stage::StageConfig;

    fn sequencer() -> Sequencer {
        Sequencer::new(StageConfig::default().with_frame_ms(10))
    }

    #[test]
    fn surface_starts_story_after_a_second() {
        let mut seq = sequencer();
        let mut boot = Bootstrap::start(Platform::Mobile, &mut seq);
        boot.surface_detected(&mut seq);

        assert_eq!(boot.run(&mut seq, 990).unwrap(), BootPhase::Loading);
        assert_eq!(boot.run(&mut seq, 10).unwrap(), BootPhase::Running);
        assert_eq!(seq.stage().now(), 1000);
        assert!(!seq.non_ar_mode());
        assert!(seq.stage().status().visible);
    }

    #[test]
    fn desktop_falls_back_after_timeout() {
        let mut seq = sequencer();
        let mut boot = Bootstrap::start(Platform::Desktop, &mut seq);

        assert_eq!(boot.run(&mut seq, 5000).unwrap(), BootPhase::FallbackOffered);
        assert!(boot.message().unwrap().starts_with("AR initialization timed out"));
        assert_eq!(boot.run(&mut seq, 2000).unwrap(), BootPhase::Running);
        assert_eq!(seq.stage().now(), 7000);
        assert!(seq.non_ar_mode());
    }

    #[test]
    fn mobile_waits_for_a_choice() {
        let mut seq = sequencer();
        let mut boot = Bootstrap::start(Platform::Mobile, &mut seq);
        boot.camera_error();

        assert_eq!(boot.run(&mut seq, 10_000).unwrap(), BootPhase::FallbackOffered);
        assert_eq!(
            boot.message(),
            Some("Camera permission denied or error accessing camera")
        );
        boot.choose_fallback(&mut seq).unwrap();
        assert_eq!(boot.phase(), BootPhase::Running);
        assert!(seq.non_ar_mode());
    }
}

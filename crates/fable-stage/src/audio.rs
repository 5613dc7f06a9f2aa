use std::collections::HashSet;
use std::fmt;

/// Why an audio cue could not play.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// The sound asset does not exist.
    #[error("sound asset not found: {0}")]
    NotFound(String),
    /// The platform refused playback (e.g. autoplay blocked).
    #[error("audio playback not permitted")]
    PermissionDenied,
}

/// Fire-and-forget audio output.
pub trait AudioSink: fmt::Debug {
    /// Start playing `asset` at `volume` in `[0, 1]`.
    fn play(&mut self, asset: &str, volume: f32) -> Result<(), AudioError>;

    /// Support downcasting to the concrete sink.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// An audio sink that records every request instead of making sound.
#[derive(Debug, Default)]
pub struct RecordingSink {
    played: Vec<(String, f32)>,
    missing: HashSet<String>,
    muted: bool,
}

impl RecordingSink {
    /// A sink where every asset exists and playback is allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `asset` as absent.
    pub fn without(mut self, asset: impl Into<String>) -> Self {
        self.missing.insert(asset.into());
        self
    }

    /// Deny every playback request.
    pub fn denied(mut self) -> Self {
        self.muted = true;
        self
    }

    /// Successfully played requests.
    pub fn played(&self) -> &[(String, f32)] {
        &self.played
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, asset: &str, volume: f32) -> Result<(), AudioError> {
        if self.muted {
            return Err(AudioError::PermissionDenied);
        }
        if self.missing.contains(asset) {
            return Err(AudioError::NotFound(asset.to_string()));
        }
        self.played.push((asset.to_string(), volume));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_successful_plays() {
        let mut sink = RecordingSink::new();
        sink.play("snore", 0.5).unwrap();
        assert_eq!(sink.played(), &[("snore".to_string(), 0.5)]);
    }

    #[test]
    fn missing_and_denied() {
        let mut sink = RecordingSink::new().without("snore");
        assert_eq!(
            sink.play("snore", 0.5),
            Err(AudioError::NotFound("snore".into()))
        );
        let mut sink = RecordingSink::new().denied();
        assert_eq!(sink.play("snore", 0.5), Err(AudioError::PermissionDenied));
        assert!(sink.played().is_empty());
    }
}

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};

/// What to do when a scene references a model that was never created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNodePolicy {
    /// Log a warning and record a `MissingNode` event.
    #[default]
    Warn,
    /// Skip silently.
    Ignore,
}

/// Pixel size of the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Perspective camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.2, 3.5),
            target: Vec3::new(0.0, 0.6, 0.0),
            fov_deg: 60.0,
            near: 0.05,
            far: 100.0,
        }
    }
}

/// Configuration for a stage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Virtual milliseconds per frame.
    pub frame_ms: u64,
    /// Overlay duration used when a step does not give one.
    pub default_overlay_ms: u64,
    /// Display surface size.
    pub viewport: Viewport,
    /// Camera placement.
    pub camera: CameraConfig,
    /// Reporting for missing model references.
    pub missing_nodes: MissingNodePolicy,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            default_overlay_ms: 5000,
            viewport: Viewport::default(),
            camera: CameraConfig::default(),
            missing_nodes: MissingNodePolicy::Warn,
            max_events: 0,
        }
    }
}

impl StageConfig {
    /// Set the frame duration (at least 1 ms).
    pub fn with_frame_ms(mut self, frame_ms: u64) -> Self {
        self.frame_ms = frame_ms.max(1);
        self
    }

    /// Set the default overlay duration.
    pub fn with_default_overlay_ms(mut self, ms: u64) -> Self {
        self.default_overlay_ms = ms;
        self
    }

    /// Set the viewport size.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    /// Set the camera placement.
    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Set the missing-node policy.
    pub fn with_missing_nodes(mut self, policy: MissingNodePolicy) -> Self {
        self.missing_nodes = policy;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> StageResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        let frame_ms = config.frame_ms;
        Ok(config.with_frame_ms(frame_ms))
    }

    /// Load a JSON config file.
    pub fn from_file(path: &Path) -> StageResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| StageError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = StageConfig::default();
        assert_eq!(config.frame_ms, 16);
        assert_eq!(config.default_overlay_ms, 5000);
        assert_eq!(config.missing_nodes, MissingNodePolicy::Warn);
        assert_eq!(config.max_events, 0);
        assert_eq!(config.viewport.width, 1280.0);
    }

    #[test]
    fn config_builder_chain() {
        let config = StageConfig::default()
            .with_frame_ms(0)
            .with_default_overlay_ms(100)
            .with_viewport(100.0, 50.0)
            .with_missing_nodes(MissingNodePolicy::Ignore)
            .with_max_events(10);
        assert_eq!(config.frame_ms, 1);
        assert_eq!(config.default_overlay_ms, 100);
        assert_eq!(config.viewport.height, 50.0);
        assert_eq!(config.missing_nodes, MissingNodePolicy::Ignore);
        assert_eq!(config.max_events, 10);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            StageConfig::from_json_str(r#"{ "frame_ms": 33, "missing_nodes": "ignore" }"#).unwrap();
        assert_eq!(config.frame_ms, 33);
        assert_eq!(config.missing_nodes, MissingNodePolicy::Ignore);
        assert_eq!(config.default_overlay_ms, 5000);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn zero_frame_time_in_json_is_clamped() {
        let config = StageConfig::from_json_str(r#"{ "frame_ms": 0 }"#).unwrap();
        assert_eq!(config.frame_ms, 1);
    }

    #[test]
    fn camera_section_parses_vectors() {
        let config =
            StageConfig::from_json_str(r#"{ "camera": { "eye": [0.0, 2.0, 4.0] } }"#).unwrap();
        assert_eq!(config.camera.eye, Vec3::new(0.0, 2.0, 4.0));
        assert_eq!(config.camera.fov_deg, 60.0);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = StageConfig::from_json_str("{ frame_ms: }").unwrap_err();
        assert!(matches!(err, StageError::ConfigParse(_)));
    }

    #[test]
    fn from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stage.json");
        std::fs::write(&path, r#"{ "default_overlay_ms": 250 }"#).unwrap();
        let config = StageConfig::from_file(&path).unwrap();
        assert_eq!(config.default_overlay_ms, 250);
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let err = StageConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, StageError::ConfigIo { .. }));
    }
}

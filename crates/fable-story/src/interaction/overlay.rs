//! Timed dialogue and narration panels.
//!
//! Each call mounts a camera-facing panel under the given container and
//! schedules its removal. The returned handle resolves when the removal timer
//! fires. Overlays never cancel one another.

use fable_core::{Align, NodeId, NodeKind, SceneNode};
use fable_stage::{Signal, Stage, StageEventKind, TimerAction, TimerId};
use glam::Vec3;

use crate::error::StoryResult;

/// A mounted overlay and the timer that takes it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHandle {
    /// Removal timer.
    pub timer: TimerId,
    /// The panel node.
    pub node: NodeId,
}

impl OverlayHandle {
    /// The completion that resolves this overlay.
    pub fn signal(&self) -> Signal {
        Signal::Timer(self.timer)
    }
}

fn plane(width: f32, height: f32, color: &str, opacity: f32) -> SceneNode {
    SceneNode::new(
        NodeKind::Plane {
            width,
            height,
            color: color.to_string(),
            opacity,
        },
        "background",
    )
}

fn text(name: &str, value: &str, color: &str, width: f32, align: Align) -> SceneNode {
    SceneNode::new(
        NodeKind::Text {
            value: value.to_string(),
            color: color.to_string(),
            width,
            align,
        },
        name,
    )
}

fn mount(
    stage: &mut Stage,
    container: NodeId,
    name: &str,
    position: Vec3,
    parts: Vec<SceneNode>,
    duration_ms: Option<u64>,
) -> StoryResult<OverlayHandle> {
    let panel = SceneNode::new(
        NodeKind::Panel {
            look_at_camera: true,
        },
        name,
    )
    .at(position);
    let tree = stage.tree_mut();
    let node = tree.append_child(container, panel)?;
    for part in parts {
        tree.append_child(node, part)?;
    }
    let duration = duration_ms.unwrap_or(stage.config().default_overlay_ms);
    let timer = stage.schedule(duration, TimerAction::RemoveNode(node));
    log::debug!("{name} overlay up for {duration} ms ({timer})");
    Ok(OverlayHandle { timer, node })
}

/// Show a speaker's line in a white dialogue box.
pub fn show_dialogue(
    stage: &mut Stage,
    container: NodeId,
    speaker: &str,
    line: &str,
    position: Vec3,
    duration_ms: Option<u64>,
) -> StoryResult<OverlayHandle> {
    let parts = vec![
        plane(1.5, 0.5, "#FFFFFF", 0.8),
        text("speaker", speaker, "#4CAF50", 1.4, Align::Left).at(Vec3::new(-0.65, 0.15, 0.01)),
        text("line", line, "#000000", 1.4, Align::Left).at(Vec3::new(-0.65, 0.0, 0.01)),
    ];
    let handle = mount(stage, container, "dialogue", position, parts, duration_ms)?;
    stage.record(StageEventKind::Dialogue {
        speaker: speaker.to_string(),
        text: line.to_string(),
    });
    Ok(handle)
}

/// Show narrator text in a translucent black box.
pub fn show_narration(
    stage: &mut Stage,
    container: NodeId,
    narration: &str,
    position: Vec3,
    duration_ms: Option<u64>,
) -> StoryResult<OverlayHandle> {
    let parts = vec![
        plane(2.0, 0.6, "#000000", 0.6),
        text("narration", narration, "#FFFFFF", 1.8, Align::Center).at(Vec3::new(0.0, 0.0, 0.01)),
    ];
    let handle = mount(stage, container, "narration", position, parts, duration_ms)?;
    stage.record(StageEventKind::Narration {
        text: narration.to_string(),
    });
    Ok(handle)
}

use std::fmt;

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for every node in the scene tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Generate a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Horizontal alignment of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Flush left.
    Left,
    /// Centred.
    Center,
}

/// What a node represents. Only the kinds the story needs are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NodeKind {
    /// The tree root; exactly one per tree.
    Root,
    /// A content container that scenes populate.
    Container,
    /// A placed 3D model, named after its asset.
    Model {
        /// Asset name from the catalog.
        asset: String,
    },
    /// Pickable geometry under a model.
    Mesh,
    /// A clickable button.
    Button {
        /// Text shown on the button.
        label: String,
    },
    /// A floating overlay panel (dialogue or narration).
    Panel {
        /// Whether the panel billboards toward the camera.
        look_at_camera: bool,
    },
    /// A flat colored quad.
    Plane {
        /// Width in world units.
        width: f32,
        /// Height in world units.
        height: f32,
        /// Hex color, e.g. `#FFFFFF`.
        color: String,
        /// Opacity in `[0, 1]`.
        opacity: f32,
    },
    /// A line of text.
    Text {
        /// The text itself.
        value: String,
        /// Hex color.
        color: String,
        /// Wrap width in world units.
        width: f32,
        /// Alignment.
        align: Align,
    },
}

impl NodeKind {
    /// Short lowercase tag used in tree dumps.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Container => "container",
            Self::Model { .. } => "model",
            Self::Mesh => "mesh",
            Self::Button { .. } => "button",
            Self::Panel { .. } => "panel",
            Self::Plane { .. } => "plane",
            Self::Text { .. } => "text",
        }
    }
}

/// Local position, rotation (Euler degrees), and scale of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position relative to the parent.
    pub position: Vec3,
    /// Rotation in degrees around X, Y, Z (applied Y, then X, then Z).
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// A transform at `position` with no rotation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, degrees: Vec3) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation * (std::f32::consts::PI / 180.0);
        let rotation = Quat::from_euler(EulerRot::YXZ, r.y, r.x, r.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// A pick sphere in the node's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Sphere centre relative to the node origin.
    pub center: Vec3,
    /// Sphere radius before scaling.
    pub radius: f32,
}

impl Bounds {
    /// A sphere of `radius` centred at `center`.
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// A node in the retained scene tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    /// Stable identifier.
    pub id: NodeId,
    /// Human-readable name (asset, label, or role).
    pub name: String,
    /// What the node is.
    pub kind: NodeKind,
    /// Local transform.
    pub transform: Transform,
    /// Participates in pointer selection.
    pub interactive: bool,
    /// A registered scene entity that may receive selection events.
    pub entity: bool,
    /// Pick geometry, if any.
    pub bounds: Option<Bounds>,
    /// Parent node; `None` only for the root and detached nodes.
    pub parent: Option<NodeId>,
    /// Children in insertion order.
    pub children: Vec<NodeId>,
}

impl SceneNode {
    /// Create a detached node with a default transform.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            kind,
            transform: Transform::default(),
            interactive: false,
            entity: false,
            bounds: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the local transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set only the local position.
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Mark the node as interactive.
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Mark the node as a registered scene entity.
    pub fn entity(mut self) -> Self {
        self.entity = true;
        self
    }

    /// Attach pick bounds.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// The label if this node is a button.
    pub fn button_label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Button { label } => Some(label),
            _ => None,
        }
    }
}

//! Core types for Fable: the retained scene tree every story scene renders into.
//!
//! The tree is an arena of [`SceneNode`]s addressed by [`NodeId`]. It owns a
//! root with two content containers (the AR anchor and the non-AR fallback);
//! scenes populate exactly one of them and clear it on every transition.

/// Error types used throughout the crate.
pub mod error;
/// Node identifiers, kinds, transforms, and pick bounds.
pub mod node;
/// The arena that owns all scene nodes.
pub mod tree;

/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export node types.
pub use node::{Align, Bounds, NodeId, NodeKind, SceneNode, Transform};
/// Re-export the scene tree.
pub use tree::{ContainerKind, SceneTree};

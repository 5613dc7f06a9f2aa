//! Model/asset provider.
//!
//! Scenes never touch asset internals. They ask the provider for a placed
//! model or a button, request animation clips by entity name, and resolve
//! live node handles through the loaded-models table.

use std::collections::HashMap;
use std::fmt;

use fable_core::{Align, Bounds, NodeId, NodeKind, SceneNode, SceneTree, Transform};
use glam::Vec3;

use crate::error::{StageError, StageResult};

/// Static description of one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    /// Centre of the pick sphere in model space.
    pub pick_center: Vec3,
    /// Radius of the pick sphere in model space.
    pub pick_radius: f32,
    /// Animation clips the model understands. Empty for static scenery.
    pub clips: Vec<&'static str>,
}

impl AssetSpec {
    fn scenery(pick_center: Vec3, pick_radius: f32) -> Self {
        Self {
            pick_center,
            pick_radius,
            clips: Vec::new(),
        }
    }

    fn actor(pick_radius: f32, clips: &[&'static str]) -> Self {
        Self {
            pick_center: Vec3::ZERO,
            pick_radius,
            clips: clips.to_vec(),
        }
    }
}

/// The set of assets a provider can instantiate.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: HashMap<String, AssetSpec>,
}

impl AssetCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an asset.
    pub fn with_asset(mut self, name: impl Into<String>, spec: AssetSpec) -> Self {
        self.assets.insert(name.into(), spec);
        self
    }

    /// Drop an asset, if registered.
    pub fn without_asset(mut self, name: &str) -> Self {
        self.assets.remove(name);
        self
    }

    /// Every asset the fable uses.
    pub fn story() -> Self {
        Self::new()
            .with_asset("grassPatch", AssetSpec::scenery(Vec3::ZERO, 1.0))
            .with_asset("dirtPath", AssetSpec::scenery(Vec3::ZERO, 0.8))
            .with_asset("tree", AssetSpec::scenery(Vec3::new(0.0, 0.6, 0.0), 0.5))
            .with_asset("finishFlag", AssetSpec::scenery(Vec3::new(0.0, 0.4, 0.0), 0.25))
            .with_asset(
                "tortoise",
                AssetSpec::actor(0.25, &["idle", "walk", "blink", "celebrate"]),
            )
            .with_asset(
                "hare",
                AssetSpec::actor(0.3, &["idle", "smug", "run", "sleep", "wake", "sulk"]),
            )
    }

    /// Look up an asset.
    pub fn get(&self, name: &str) -> Option<&AssetSpec> {
        self.assets.get(name)
    }

    /// Whether the asset exists.
    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }
}

/// Interface the scene scripts use to populate the stage.
pub trait ModelProvider: fmt::Debug {
    /// Place a model under `parent` and register it under its asset name.
    fn create_model_entity(
        &mut self,
        tree: &mut SceneTree,
        parent: NodeId,
        asset: &str,
        transform: Transform,
    ) -> StageResult<NodeId>;

    /// Place an interactive button under `parent`.
    fn create_button_entity(
        &mut self,
        tree: &mut SceneTree,
        parent: NodeId,
        label: &str,
        position: Vec3,
    ) -> StageResult<NodeId>;

    /// Switch the named entity to `clip`. Fire-and-forget.
    fn play_animation(&mut self, tree: &SceneTree, entity: &str, clip: &str) -> StageResult<()>;

    /// The live node registered under `entity`, if it still exists.
    fn loaded_model(&self, tree: &SceneTree, entity: &str) -> Option<NodeId>;

    /// The clip the named entity is currently playing.
    fn current_clip(&self, tree: &SceneTree, entity: &str) -> Option<&str>;
}

/// Default [`ModelProvider`] backed by an [`AssetCatalog`].
#[derive(Debug, Default)]
pub struct ModelManager {
    catalog: AssetCatalog,
    loaded: HashMap<String, NodeId>,
    clips: HashMap<NodeId, String>,
}

impl ModelManager {
    /// A provider for the given catalog.
    pub fn new(catalog: AssetCatalog) -> Self {
        Self {
            catalog,
            loaded: HashMap::new(),
            clips: HashMap::new(),
        }
    }

    /// The catalog in use.
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }
}

impl ModelProvider for ModelManager {
    fn create_model_entity(
        &mut self,
        tree: &mut SceneTree,
        parent: NodeId,
        asset: &str,
        transform: Transform,
    ) -> StageResult<NodeId> {
        let spec = self
            .catalog
            .get(asset)
            .ok_or_else(|| StageError::UnknownAsset(asset.to_string()))?;
        let bounds = Bounds::sphere(spec.pick_center, spec.pick_radius);

        let model = SceneNode::new(
            NodeKind::Model {
                asset: asset.to_string(),
            },
            asset,
        )
        .with_transform(transform)
        .entity();
        let id = tree.append_child(parent, model)?;
        tree.append_child(
            id,
            SceneNode::new(NodeKind::Mesh, format!("{asset}-mesh")).with_bounds(bounds),
        )?;

        // Later registrations shadow earlier ones.
        self.loaded.insert(asset.to_string(), id);
        self.clips.retain(|node, _| tree.contains(*node));
        Ok(id)
    }

    fn create_button_entity(
        &mut self,
        tree: &mut SceneTree,
        parent: NodeId,
        label: &str,
        position: Vec3,
    ) -> StageResult<NodeId> {
        let button = SceneNode::new(
            NodeKind::Button {
                label: label.to_string(),
            },
            label,
        )
        .at(position)
        .interactive()
        .entity();
        let id = tree.append_child(parent, button)?;
        tree.append_child(
            id,
            SceneNode::new(
                NodeKind::Plane {
                    width: 0.8,
                    height: 0.25,
                    color: "#4CAF50".into(),
                    opacity: 0.9,
                },
                "button-bg",
            )
            .with_bounds(Bounds::sphere(Vec3::ZERO, 0.2)),
        )?;
        tree.append_child(
            id,
            SceneNode::new(
                NodeKind::Text {
                    value: label.to_string(),
                    color: "#FFFFFF".into(),
                    width: 0.75,
                    align: Align::Center,
                },
                "button-label",
            )
            .at(Vec3::new(0.0, 0.0, 0.01)),
        )?;
        Ok(id)
    }

    fn play_animation(&mut self, tree: &SceneTree, entity: &str, clip: &str) -> StageResult<()> {
        let id = self
            .loaded_model(tree, entity)
            .ok_or_else(|| StageError::MissingModel(entity.to_string()))?;
        let known = self
            .catalog
            .get(entity)
            .is_some_and(|spec| spec.clips.contains(&clip));
        if !known {
            return Err(StageError::UnknownClip {
                entity: entity.to_string(),
                clip: clip.to_string(),
            });
        }
        self.clips.insert(id, clip.to_string());
        Ok(())
    }

    fn loaded_model(&self, tree: &SceneTree, entity: &str) -> Option<NodeId> {
        self.loaded
            .get(entity)
            .copied()
            .filter(|id| tree.contains(*id))
    }

    fn current_clip(&self, tree: &SceneTree, entity: &str) -> Option<&str> {
        let id = self.loaded_model(tree, entity)?;
        self.clips.get(&id).map(String::as_str)
    }
}

use fable_core::{NodeId, SceneTree};
use fable_stage::Camera;

/// A pointer or touch release in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRelease {
    /// Horizontal pixel, 0 at the left edge.
    pub x: f32,
    /// Vertical pixel, 0 at the top edge.
    pub y: f32,
    /// Touches still down after this release.
    pub active_touches: u32,
}

impl PointerRelease {
    /// A mouse release (no touches remain).
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            active_touches: 0,
        }
    }
}

/// The entity a release landed on.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The registered entity that owns the hit geometry.
    pub entity: NodeId,
    /// Its name.
    pub name: String,
    /// Ray distance to the hit.
    pub distance: f32,
}

/// Resolve a pointer release against the interactive nodes under `within`.
///
/// Releases with touches still down are ignored. Only the nearest hit counts;
/// if its ancestor chain holds no registered entity nothing is selected.
pub fn pick(
    tree: &SceneTree,
    camera: &Camera,
    within: NodeId,
    release: PointerRelease,
) -> Option<Selection> {
    if release.active_touches > 0 {
        return None;
    }
    let ray = camera.ray_through(camera.screen_to_ndc(release.x, release.y));

    let mut nearest: Option<(NodeId, f32)> = None;
    for target in tree.find_all(within, |n| n.interactive) {
        let candidates = std::iter::once(target).chain(tree.descendants(target));
        for id in candidates {
            let Some(bounds) = tree.get(id).and_then(|n| n.bounds) else {
                continue;
            };
            let Some(world) = tree.world_matrix(id) else {
                continue;
            };
            let (scale, _, _) = world.to_scale_rotation_translation();
            let center = world.transform_point3(bounds.center);
            let radius = bounds.radius * scale.abs().max_element();
            if let Some(distance) = ray.intersect_sphere(center, radius)
                && nearest.is_none_or(|(_, best)| distance < best)
            {
                nearest = Some((id, distance));
            }
        }
    }

    let (hit, distance) = nearest?;
    let entity = std::iter::once(hit)
        .chain(tree.ancestors(hit))
        .find(|id| tree.get(*id).is_some_and(|n| n.entity))?;
    let name = tree.get(entity)?.name.clone();
    log::debug!("pointer at ({}, {}) selected {name}", release.x, release.y);
    Some(Selection {
        entity,
        name,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fable_core::{Bounds, ContainerKind, NodeKind, SceneNode};
    use fable_stage::{CameraConfig, Viewport};
    use glam::Vec3;

    fn camera() -> Camera {
        Camera::new(
            CameraConfig {
                eye: Vec3::new(0.0, 0.0, 5.0),
                target: Vec3::ZERO,
                ..CameraConfig::default()
            },
            Viewport {
                width: 200.0,
                height: 100.0,
            },
        )
    }

    fn center() -> PointerRelease {
        PointerRelease::at(100.0, 50.0)
    }

    fn pickable(tree: &mut SceneTree, parent: NodeId, name: &str, at: Vec3) -> NodeId {
        let entity = tree
            .append_child(
                parent,
                SceneNode::new(NodeKind::Container, name).at(at).interactive().entity(),
            )
            .unwrap();
        tree.append_child(
            entity,
            SceneNode::new(NodeKind::Mesh, format!("{name}-mesh"))
                .with_bounds(Bounds::sphere(Vec3::ZERO, 0.5)),
        )
        .unwrap();
        entity
    }

    #[test]
    fn selects_entity_owning_the_mesh() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let tortoise = pickable(&mut tree, ar, "tortoise", Vec3::ZERO);

        let selection = pick(&tree, &camera(), ar, center()).unwrap();
        assert_eq!(selection.entity, tortoise);
        assert_eq!(selection.name, "tortoise");
        assert!((selection.distance - 4.5).abs() < 1e-3);
    }

    #[test]
    fn nearest_hit_wins() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        pickable(&mut tree, ar, "far", Vec3::new(0.0, 0.0, -2.0));
        let near = pickable(&mut tree, ar, "near", Vec3::new(0.0, 0.0, 2.0));

        assert_eq!(pick(&tree, &camera(), ar, center()).unwrap().entity, near);
    }

    #[test]
    fn release_with_touches_down_is_ignored() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        pickable(&mut tree, ar, "tortoise", Vec3::ZERO);
        let release = PointerRelease {
            active_touches: 1,
            ..center()
        };
        assert!(pick(&tree, &camera(), ar, release).is_none());
    }

    #[test]
    fn miss_selects_nothing() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        pickable(&mut tree, ar, "tortoise", Vec3::ZERO);
        assert!(pick(&tree, &camera(), ar, PointerRelease::at(5.0, 5.0)).is_none());
    }

    #[test]
    fn non_interactive_geometry_is_not_pickable() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let tree_model = tree
            .append_child(ar, SceneNode::new(NodeKind::Container, "tree").entity())
            .unwrap();
        tree.append_child(
            tree_model,
            SceneNode::new(NodeKind::Mesh, "tree-mesh").with_bounds(Bounds::sphere(Vec3::ZERO, 1.0)),
        )
        .unwrap();
        assert!(pick(&tree, &camera(), ar, center()).is_none());
    }

    #[test]
    fn decorative_hit_without_entity_fires_nothing() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        tree.append_child(
            ar,
            SceneNode::new(NodeKind::Mesh, "rock")
                .interactive()
                .with_bounds(Bounds::sphere(Vec3::ZERO, 0.5)),
        )
        .unwrap();
        assert!(pick(&tree, &camera(), ar, center()).is_none());
    }

    #[test]
    fn entity_scale_grows_the_pick_sphere() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let hare = pickable(&mut tree, ar, "hare", Vec3::new(0.8, 0.0, 0.0));
        assert!(pick(&tree, &camera(), ar, center()).is_none());

        tree.get_mut(hare).unwrap().transform.scale = Vec3::splat(2.0);
        assert_eq!(pick(&tree, &camera(), ar, center()).unwrap().entity, hare);
    }

    #[test]
    fn other_container_is_out_of_reach() {
        let mut tree = SceneTree::new();
        let ar = tree.container(ContainerKind::Ar);
        let fallback = tree.container(ContainerKind::Fallback);
        pickable(&mut tree, ar, "tortoise", Vec3::ZERO);
        assert!(pick(&tree, &camera(), fallback, center()).is_none());
    }
}

use glam::{Mat4, Vec2, Vec3};

use crate::config::{CameraConfig, Viewport};

/// A half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Distance along the ray to the first hit on a sphere, if any.
    ///
    /// A ray starting inside the sphere hits at distance zero.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }
}

/// A perspective camera bound to a viewport.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    config: CameraConfig,
    viewport: Viewport,
}

impl Camera {
    /// Build a camera from its placement and the display size.
    pub fn new(config: CameraConfig, viewport: Viewport) -> Self {
        Self { config, viewport }
    }

    /// Eye position.
    pub fn eye(&self) -> Vec3 {
        self.config.eye
    }

    /// The display size.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Combined projection * view matrix (depth range 0..1).
    pub fn view_projection(&self) -> Mat4 {
        let aspect = if self.viewport.height > 0.0 {
            self.viewport.width / self.viewport.height
        } else {
            1.0
        };
        let proj = Mat4::perspective_rh(
            self.config.fov_deg.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        );
        let view = Mat4::look_at_rh(self.config.eye, self.config.target, Vec3::Y);
        proj * view
    }

    /// Convert a screen coordinate to normalized device coordinates.
    ///
    /// X maps `[0, width]` to `[-1, 1]`; Y is inverted so the top edge is `+1`.
    pub fn screen_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(
            (x / self.viewport.width) * 2.0 - 1.0,
            -(y / self.viewport.height) * 2.0 + 1.0,
        )
    }

    /// Inverse of [`Camera::screen_to_ndc`].
    pub fn ndc_to_screen(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - ndc.y) * 0.5 * self.viewport.height,
        )
    }

    /// A ray from the eye through an NDC point.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let direction = (far - self.config.eye).normalize_or_zero();
        Ray {
            origin: self.config.eye,
            direction,
        }
    }

    /// Screen coordinate of a world point, or `None` if it is behind the eye.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(self.ndc_to_screen(Vec2::new(ndc.x, ndc.y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(
            CameraConfig {
                eye: Vec3::new(0.0, 0.0, 5.0),
                target: Vec3::ZERO,
                ..CameraConfig::default()
            },
            Viewport {
                width: 100.0,
                height: 100.0,
            },
        )
    }

    #[test]
    fn ndc_corners() {
        let cam = camera();
        assert_eq!(cam.screen_to_ndc(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_eq!(cam.screen_to_ndc(100.0, 100.0), Vec2::new(1.0, -1.0));
        assert_eq!(cam.screen_to_ndc(50.0, 50.0), Vec2::ZERO);
    }

    #[test]
    fn ndc_round_trips_through_screen() {
        let cam = camera();
        let screen = cam.ndc_to_screen(cam.screen_to_ndc(25.0, 80.0));
        assert!((screen - Vec2::new(25.0, 80.0)).length() < 1e-4);
    }

    #[test]
    fn centre_ray_points_at_target() {
        let ray = camera().ray_through(Vec2::ZERO);
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-4);
    }

    #[test]
    fn project_target_lands_mid_screen() {
        let screen = camera().project(Vec3::ZERO).unwrap();
        assert!((screen - Vec2::new(50.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn project_behind_eye_is_none() {
        assert!(camera().project(Vec3::new(0.0, 0.0, 10.0)).is_none());
    }

    #[test]
    fn sphere_hit_and_miss() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
        };
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
        // Sphere behind the origin
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 9.0), 1.0).is_none());
    }
}

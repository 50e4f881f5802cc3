use std::f32::consts::{PI, TAU};
use crate::math::{Mat4, Vec3};

/// Orbit camera around a fixed target, parameterized by spherical angles.
///
/// `polar` is measured from +Y; `azimuth` is measured around Y from +Z.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    /// Vertical field of view in radians
    pub fov: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 25.0,
            azimuth: 0.0,
            polar: PI / 2.0,
            fov: 45f32.to_radians(),
        }
    }
}

impl OrbitCamera {
    pub const MIN_DISTANCE: f32 = 10.0;
    pub const MAX_DISTANCE: f32 = 40.0;
    pub const MIN_POLAR: f32 = PI / 4.0;
    pub const MAX_POLAR: f32 = PI / 1.8;
    /// Radians per second while auto-rotating (one turn every two minutes)
    pub const AUTO_ROTATE_SPEED: f32 = 0.5 * TAU / 60.0;
    const ORBIT_SENSITIVITY: f32 = 0.01;
    const ZOOM_SENSITIVITY: f32 = 0.5;
    const NEAR: f32 = 0.1;
    const FAR: f32 = 200.0;

    /// Drag by a pixel delta
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.azimuth = (self.azimuth - delta_x * Self::ORBIT_SENSITIVITY).rem_euclid(TAU);
        self.polar = (self.polar - delta_y * Self::ORBIT_SENSITIVITY)
            .clamp(Self::MIN_POLAR, Self::MAX_POLAR);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance + delta * Self::ZOOM_SENSITIVITY)
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    /// Advance auto-rotation; a no-op unless `auto_rotate` is set
    pub fn update(&mut self, dt: f32, auto_rotate: bool) {
        if auto_rotate && dt.is_finite() && dt > 0.0 {
            self.azimuth = (self.azimuth - Self::AUTO_ROTATE_SPEED * dt).rem_euclid(TAU);
        }
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position(), self.target, Vec3::UP)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fov, aspect, Self::NEAR, Self::FAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_z() {
        let camera = OrbitCamera::default();
        let p = camera.position();
        assert!(p.x.abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
        assert!((p.z - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut camera = OrbitCamera::default();
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, OrbitCamera::MIN_DISTANCE);
        camera.zoom(1000.0);
        assert_eq!(camera.distance, OrbitCamera::MAX_DISTANCE);
    }

    #[test]
    fn test_polar_clamps() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 1000.0);
        assert_eq!(camera.polar, OrbitCamera::MIN_POLAR);
        camera.orbit(0.0, -1000.0);
        assert_eq!(camera.polar, OrbitCamera::MAX_POLAR);
        // Never drops far enough below the horizon to see under the scene
        assert!(camera.position().y > -0.2 * camera.distance);
    }

    #[test]
    fn test_auto_rotate_only_when_enabled() {
        let mut camera = OrbitCamera::default();
        camera.update(1.0, false);
        assert_eq!(camera.azimuth, 0.0);

        camera.update(2.0, true);
        let expected = (-2.0 * OrbitCamera::AUTO_ROTATE_SPEED).rem_euclid(TAU);
        assert!((camera.azimuth - expected).abs() < 1e-5);

        camera.update(f32::NAN, true);
        assert!((camera.azimuth - expected).abs() < 1e-5);
    }

    #[test]
    fn test_position_keeps_distance() {
        let mut camera = OrbitCamera { target: Vec3::new(1.0, 2.0, 3.0), ..OrbitCamera::default() };
        camera.orbit(123.0, 45.0);
        camera.zoom(-4.0);
        assert!((camera.position().distance(&camera.target) - camera.distance).abs() < 1e-4);
    }
}

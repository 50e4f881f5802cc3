//! Shared chase-the-target strategy for individually animated elements

use rand::Rng;
use crate::data::{Element, SceneMode};
use crate::math::{Euler, Mat4, Vec3};

/// Per-frame inputs shared by every element of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub mode: SceneMode,
    /// Seconds since the scene started
    pub time: f32,
    /// Seconds since the previous tick
    pub dt: f32,
}

/// Pose written to the render buffers for one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Euler,
    pub scale: f32,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::compose(self.position, self.rotation, self.scale)
    }
}

/// Move `current` toward `target` by the fraction `rate * dt`, capped at the target
pub fn chase(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    let t = (rate * dt).clamp(0.0, 1.0);
    current.lerp(&target, t)
}

/// Secondary-motion policy for one element kind.
///
/// Implementors decide how fast elements converge, how they hover around
/// their target and how they are oriented; [`MotionProfile::blend`] does the
/// chase itself.
pub trait MotionProfile {
    /// Per-element state carried between frames (e.g. accumulated tumble)
    type State;

    fn init_state<R: Rng + ?Sized>(&self, element: &Element, rng: &mut R) -> Self::State;

    /// Convergence rate before the element's own speed factor
    fn base_speed(&self, mode: SceneMode) -> f32;

    /// Vertical offset added to the target this frame
    fn hover(&self, element: &Element, frame: &FrameContext) -> f32;

    /// Orientation once the element has moved this frame
    fn orient(&self, element: &Element, state: &mut Self::State, frame: &FrameContext) -> Euler;

    fn blend(&self, element: &mut Element, state: &mut Self::State, frame: &FrameContext) -> Transform {
        let target = element.target(frame.mode);
        let target = target.with_y(target.y + self.hover(element, frame));
        let rate = self.base_speed(frame.mode) * element.speed_factor();

        let position = chase(element.current_position(), target, rate, frame.dt);
        element.set_current_position(position);

        Transform {
            position,
            rotation: self.orient(element, state, frame),
            scale: element.scale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Color, DualPosition, ElementKind};

    /// Chase only: no hover, no rotation
    struct Still;

    impl MotionProfile for Still {
        type State = ();

        fn init_state<R: Rng + ?Sized>(&self, _: &Element, _: &mut R) {}

        fn base_speed(&self, mode: SceneMode) -> f32 {
            if mode.is_assembled() { 2.0 } else { 0.8 }
        }

        fn hover(&self, _: &Element, _: &FrameContext) -> f32 {
            0.0
        }

        fn orient(&self, _: &Element, _: &mut (), _: &FrameContext) -> Euler {
            Euler::default()
        }
    }

    fn element(speed_factor: f32) -> Element {
        Element::new(
            0,
            ElementKind::SphereOrnament,
            DualPosition {
                assembled: Vec3::new(1.0, 4.0, -2.0),
                scattered: Vec3::new(15.0, -10.0, 12.0),
            },
            0.5,
            Color::WHITE,
            0.0,
            speed_factor,
        )
    }

    #[test]
    fn test_converges_within_five_seconds() {
        let mut e = element(1.0);
        let dt = 1.0 / 60.0;
        for frame in 0..300 {
            let ctx = FrameContext { mode: SceneMode::Assembled, time: frame as f32 * dt, dt };
            Still.blend(&mut e, &mut (), &ctx);
        }
        let error = e.current_position().distance(&e.assembled_position());
        assert!(error < 0.01, "still {} away after 300 frames", error);
    }

    #[test]
    fn test_chase_never_passes_target() {
        let target = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(chase(Vec3::ZERO, target, 2.0, 5.0), target);
        assert_eq!(chase(Vec3::ZERO, target, 2.0, -1.0), Vec3::ZERO);
    }

    #[test]
    fn test_blend_reports_scale_and_position() {
        let mut e = element(1.0);
        let ctx = FrameContext { mode: SceneMode::Assembled, time: 0.0, dt: 0.1 };
        let transform = Still.blend(&mut e, &mut (), &ctx);
        assert_eq!(transform.position, e.current_position());
        assert_eq!(transform.scale, 0.5);
        assert_ne!(e.current_position(), e.scattered_position());
    }

    #[test]
    fn test_transform_matrix_places_element() {
        let transform = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Euler::default(),
            scale: 2.0,
        };
        let p = transform.matrix().transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.distance(&Vec3::new(3.0, 2.0, 3.0)) < 1e-5);
    }
}

//! Random point samplers used to seed both target layouts of every element.
//!
//! Samplers draw from an injected [`Rng`] so populations are reproducible
//! from a seed.

use std::f32::consts::TAU;
use rand::Rng;
use super::Vec3;

/// Negative, NaN, and infinite extents collapse to a single point
fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Point distributed uniformly by volume inside a sphere centred at the origin.
///
/// The radius is scaled by the cube root of a uniform draw; a linear draw
/// would crowd points around the centre.
pub fn sample_sphere_volume<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let radius = sanitize_extent(radius);

    let u: f32 = rng.gen();
    let v: f32 = rng.gen();
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    let r = rng.gen::<f32>().cbrt() * radius;

    let sin_phi = phi.sin();
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

/// Point inside an upright cone: base of `base_radius` at the bottom, apex at
/// the top, centred vertically on `y_offset`.
///
/// Height is uniform and the radial draw is square-rooted within each height
/// band, so this is not a uniform-volume sample: points crowd toward the apex.
pub fn sample_cone_volume<R: Rng + ?Sized>(
    rng: &mut R,
    height: f32,
    base_radius: f32,
    y_offset: f32,
) -> Vec3 {
    let height = sanitize_extent(height);
    let base_radius = sanitize_extent(base_radius);
    let y_offset = if y_offset.is_finite() { y_offset } else { 0.0 };

    let y_norm: f32 = rng.gen();
    let radius_at_height = (1.0 - y_norm) * base_radius;

    let angle = rng.gen::<f32>() * TAU;
    let r = rng.gen::<f32>().sqrt() * radius_at_height;

    Vec3::new(
        angle.cos() * r,
        y_norm * height - height / 2.0 + y_offset,
        angle.sin() * r,
    )
}

/// Radius of the cone described by [`sample_cone_volume`] at world height `y`
#[cfg(test)]
pub(crate) fn cone_radius_at(y: f32, height: f32, base_radius: f32, y_offset: f32) -> f32 {
    if height <= 0.0 {
        return 0.0;
    }
    let y_norm = ((y - y_offset + height / 2.0) / height).clamp(0.0, 1.0);
    (1.0 - y_norm) * base_radius
}

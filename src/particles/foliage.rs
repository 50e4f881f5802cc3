//! Fine particle cloud that forms the body of the tree.
//!
//! All particles blend in lockstep on one eased assembly factor. The blend
//! normally runs in the foliage vertex shader; [`blend_particle`] is the same
//! math on the CPU, used when the config selects host blending.

use std::f32::consts::TAU;
use rand::Rng;
use crate::animation::{ease, mix, smoothstep, Easing};
use crate::data::config::FoliageConfig;
use crate::data::{Color, DualPosition, Element, ElementKind, FoliageBlend, IdAllocator};
use crate::math::{sample_cone_volume, sample_sphere_volume, Vec3};

/// Static attribute layout: assembled(3) + scattered(3) + seed(1)
pub const FOLIAGE_STRIDE: usize = 7;
/// Host-blended layout: position(3) + size(1) + alpha(1) + color(3)
pub const PARTICLE_STRIDE: usize = 8;

const EMERALD: Color = Color::new(0.0, 0.8, 0.4);
const GOLD: Color = Color::new(1.0, 0.9, 0.4);

/// Shaded particle for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub position: Vec3,
    /// Point size before perspective attenuation
    pub size: f32,
    pub alpha: f32,
    pub color: Color,
}

/// Evaluate the foliage morph for one particle
pub fn blend_particle(
    assembled: Vec3,
    scattered: Vec3,
    seed: f32,
    time: f32,
    factor: f32,
    easing: Easing,
) -> ParticleSample {
    let t = ease(factor, easing);

    let mut position = scattered.lerp(&assembled, t);

    // Breathing, only visible once assembled
    let breath = (time * 2.0 + seed * 10.0).sin() * 0.05;
    position += assembled.outward() * (breath * t);

    // Floating drift, only while scattered
    position.y += (time * 0.5 + seed * 20.0).sin() * 0.5 * (1.0 - t);

    let hue = time + seed * 6.28;
    let rainbow = Color::new(
        0.6 + 0.4 * hue.cos(),
        0.6 + 0.4 * (hue + 2.0).cos(),
        0.6 + 0.4 * (hue + 4.0).cos(),
    );
    let highlight = GOLD.mix(&rainbow, seed * 0.6);

    let sparkle = (time * 3.0 + seed * 50.0).sin();
    let color = EMERALD.mix(&highlight, smoothstep(0.9, 1.0, sparkle));

    ParticleSample {
        position,
        size: 4.0 + seed * 3.0,
        alpha: mix(0.8, 1.0, t),
        color,
    }
}

pub struct FoliageSystem {
    elements: Vec<Element>,
    blend: FoliageBlend,
    easing: Easing,
    factor: f32,
    time: f32,
    host_data: Vec<f32>,
}

impl FoliageSystem {
    /// Seed every particle with a cone and a sphere position
    pub fn generate<R: Rng + ?Sized>(config: &FoliageConfig, ids: &mut IdAllocator, rng: &mut R) -> Self {
        let cone = config.cone;
        let elements = (0..config.count)
            .map(|_| {
                let assembled = sample_cone_volume(rng, cone.height, cone.base_radius, cone.y_offset);
                let scattered = sample_sphere_volume(rng, config.scatter_radius);
                let seed: f32 = rng.gen();

                Element::new(
                    ids.next_id(),
                    ElementKind::Particle,
                    DualPosition { assembled, scattered },
                    4.0 + seed * 3.0,
                    EMERALD,
                    seed * TAU,
                    1.0,
                )
            })
            .collect();

        Self::from_elements(elements, config.blend)
    }

    pub fn from_elements(elements: Vec<Element>, blend: FoliageBlend) -> Self {
        let host_data = match blend {
            FoliageBlend::Host => Vec::with_capacity(elements.len() * PARTICLE_STRIDE),
            FoliageBlend::Shader => Vec::new(),
        };

        Self {
            elements,
            blend,
            easing: Easing::CubicInOut,
            factor: 0.0,
            time: 0.0,
            host_data,
        }
    }

    /// Record this frame's drive values; in host mode also blend every particle.
    ///
    /// In shader mode `current_position` is left at its seeded value: the
    /// blended position only exists on the GPU.
    pub fn update(&mut self, time: f32, factor: f32) {
        self.time = time;
        self.factor = factor;

        if self.blend != FoliageBlend::Host {
            return;
        }

        self.host_data.clear();
        for element in &mut self.elements {
            let sample = blend_particle(
                element.assembled_position(),
                element.scattered_position(),
                element.seed(),
                time,
                factor,
                self.easing,
            );
            element.set_current_position(sample.position);

            self.host_data.extend_from_slice(&sample.position.to_array());
            self.host_data.push(sample.size);
            self.host_data.push(sample.alpha);
            self.host_data.extend_from_slice(&sample.color.to_array());
        }
    }

    /// Static attributes for the shader path
    /// Format: assembled(3) + scattered(3) + seed(1) = 7 floats per particle
    pub fn vertex_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.elements.len() * FOLIAGE_STRIDE);

        for e in &self.elements {
            data.extend_from_slice(&e.assembled_position().to_array());
            data.extend_from_slice(&e.scattered_position().to_array());
            data.push(e.seed());
        }

        data
    }

    /// Per-frame buffer for the host path, empty in shader mode
    /// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per particle
    pub fn host_data(&self) -> &[f32] {
        &self.host_data
    }

    pub fn blend(&self) -> FoliageBlend {
        self.blend
    }

    /// Raw assembly factor fed to the shader
    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn system(count: usize, blend: FoliageBlend) -> FoliageSystem {
        let config = FoliageConfig { count, blend, ..FoliageConfig::default() };
        let mut rng = StdRng::seed_from_u64(11);
        FoliageSystem::generate(&config, &mut IdAllocator::new(), &mut rng)
    }

    #[test]
    fn test_scattered_particle_floats_around_sphere_point() {
        let a = Vec3::new(2.0, 3.0, 1.0);
        let s = Vec3::new(-10.0, 4.0, 8.0);
        let sample = blend_particle(a, s, 0.3, 1.7, 0.0, Easing::CubicInOut);

        assert!((sample.position.x - s.x).abs() < 1e-5);
        assert!((sample.position.z - s.z).abs() < 1e-5);
        let drift = (1.7f32 * 0.5 + 0.3 * 20.0).sin() * 0.5;
        assert!((sample.position.y - (s.y + drift)).abs() < 1e-5);
        assert!((sample.alpha - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_assembled_particle_breathes_outward() {
        let a = Vec3::new(3.0, 2.0, 4.0);
        let s = Vec3::new(-10.0, 4.0, 8.0);
        for i in 0..50 {
            let time = i as f32 * 0.13;
            let sample = blend_particle(a, s, 0.42, time, 1.0, Easing::CubicInOut);
            let offset = sample.position - a;
            assert!(offset.length() <= 0.05 + 1e-4);
            assert!(offset.y.abs() < 1e-4);
            // Displacement stays on the outward axis (3/5, 0, 4/5)
            assert!((offset.x * 4.0 - offset.z * 3.0).abs() < 1e-4);
            assert!((sample.alpha - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_half_factor_is_eased_midpoint() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let s = Vec3::new(10.0, 0.0, 0.0);
        let quarter = blend_particle(a, s, 0.0, 0.0, 0.25, Easing::CubicInOut);
        // ease(0.25) = 0.0625, so the particle has barely left the sphere
        assert!((quarter.position.x - 9.375).abs() < 1e-4);
        let half = blend_particle(a, s, 0.0, 0.0, 0.5, Easing::CubicInOut);
        assert!((half.alpha - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_sparkle_flashes_gold() {
        let p = Vec3::ZERO;
        let calm = blend_particle(p, p, 0.0, 0.0, 1.0, Easing::CubicInOut);
        assert_eq!(calm.color, EMERALD);

        // sin(3t) peaks at t = π/6; with seed 0 the highlight is pure gold
        let flash = blend_particle(p, p, 0.0, std::f32::consts::PI / 6.0, 1.0, Easing::CubicInOut);
        assert!((flash.color.r - GOLD.r).abs() < 1e-3);
        assert!((flash.color.g - GOLD.g).abs() < 1e-3);
        assert!((flash.color.b - GOLD.b).abs() < 1e-3);
    }

    #[test]
    fn test_vertex_data_layout() {
        let foliage = system(100, FoliageBlend::Shader);
        let data = foliage.vertex_data();
        assert_eq!(data.len(), 100 * FOLIAGE_STRIDE);

        let e = &foliage.elements()[3];
        let chunk = &data[3 * FOLIAGE_STRIDE..4 * FOLIAGE_STRIDE];
        assert_eq!(chunk[0], e.assembled_position().x);
        assert_eq!(chunk[4], e.scattered_position().y);
        assert!(chunk[6] >= 0.0 && chunk[6] < 1.0);
    }

    #[test]
    fn test_shader_mode_only_records_uniforms() {
        let mut foliage = system(50, FoliageBlend::Shader);
        foliage.update(2.0, 0.4);
        assert!(foliage.host_data().is_empty());
        assert_eq!(foliage.factor(), 0.4);
        assert_eq!(foliage.time(), 2.0);
        for e in foliage.elements() {
            assert_eq!(e.current_position(), e.scattered_position());
        }
    }

    #[test]
    fn test_host_mode_writes_blended_buffer() {
        let mut foliage = system(50, FoliageBlend::Host);
        foliage.update(1.0, 1.0);
        let data = foliage.host_data();
        assert_eq!(data.len(), 50 * PARTICLE_STRIDE);

        for (chunk, e) in data.chunks(PARTICLE_STRIDE).zip(foliage.elements()) {
            let p = e.current_position();
            assert_eq!(&chunk[0..3], &[p.x, p.y, p.z]);
            assert!(p.distance(&e.assembled_position()) <= 0.05 + 1e-4);
            assert!((chunk[4] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_cloud() {
        let mut foliage = system(0, FoliageBlend::Host);
        foliage.update(1.0, 0.5);
        assert!(foliage.is_empty());
        assert!(foliage.vertex_data().is_empty());
        assert!(foliage.host_data().is_empty());
    }
}

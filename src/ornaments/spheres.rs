//! Large labelled spheres, each posed individually.
//!
//! Assembled spheres hover gently and turn to face away from the trunk;
//! scattered spheres drift widely and keep tumbling from wherever they were.

use std::f32::consts::TAU;
use rand::Rng;
use crate::animation::{FrameContext, MotionProfile};
use crate::data::config::SphereConfig;
use crate::data::{DualPosition, Element, ElementKind, IdAllocator, SceneMode, ValueRange};
use crate::math::{sample_cone_volume, sample_sphere_volume, Euler};
use super::OrnamentPopulation;

pub type SpherePopulation = OrnamentPopulation<SphereMotion>;

/// Accumulated orientation of one sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSpin {
    pub rotation: Euler,
    /// Tumble rates about X and Y (rad/s) while scattered
    pub rate_x: f32,
    pub rate_y: f32,
}

#[derive(Debug, Clone)]
pub struct SphereMotion {
    pub assemble_speed: f32,
    pub scatter_speed: f32,
    pub tumble_rate: ValueRange,
}

impl SphereMotion {
    pub fn from_config(config: &SphereConfig) -> Self {
        Self {
            assemble_speed: config.assemble_speed,
            scatter_speed: config.scatter_speed,
            tumble_rate: config.tumble_rate,
        }
    }
}

impl MotionProfile for SphereMotion {
    type State = SphereSpin;

    fn init_state<R: Rng + ?Sized>(&self, _element: &Element, rng: &mut R) -> SphereSpin {
        SphereSpin {
            rotation: Euler::default(),
            rate_x: self.tumble_rate.at(rng.gen()),
            rate_y: self.tumble_rate.at(rng.gen()),
        }
    }

    fn base_speed(&self, mode: SceneMode) -> f32 {
        match mode {
            SceneMode::Assembled => self.assemble_speed,
            SceneMode::Scattered => self.scatter_speed,
        }
    }

    fn hover(&self, element: &Element, frame: &FrameContext) -> f32 {
        match frame.mode {
            SceneMode::Assembled => (frame.time * 2.0 + element.phase()).sin() * 0.05,
            SceneMode::Scattered => (frame.time * 0.5 + element.phase()).sin() * 0.5,
        }
    }

    fn orient(&self, element: &Element, spin: &mut SphereSpin, frame: &FrameContext) -> Euler {
        match frame.mode {
            SceneMode::Assembled => {
                let p = element.current_position();
                spin.rotation = Euler::new(
                    frame.time.sin() * 0.1,
                    p.x.atan2(p.z) + frame.time * 0.5,
                    0.0,
                );
            }
            SceneMode::Scattered => {
                spin.rotation.x += spin.rate_x * frame.dt;
                spin.rotation.y += spin.rate_y * frame.dt;
            }
        }
        spin.rotation
    }
}

/// Build `copies_per_label` spheres for every label
pub fn generate_spheres<R: Rng + ?Sized>(
    config: &SphereConfig,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> SpherePopulation {
    let mut elements = Vec::with_capacity(config.labels.len() * config.copies_per_label);

    for label in &config.labels {
        for _ in 0..config.copies_per_label {
            let cone = config.cone;
            let mut assembled = sample_cone_volume(rng, cone.height, cone.base_radius, cone.y_offset);
            if assembled.horizontal_length() > 0.1 {
                assembled.x *= config.surface_push;
                assembled.z *= config.surface_push;
            }
            let scattered = sample_sphere_volume(rng, config.scatter_radius);
            let speed_factor = config.speed.at(rng.gen());
            let phase = rng.gen::<f32>() * TAU;

            let element = Element::new(
                ids.next_id(),
                ElementKind::SphereOrnament,
                DualPosition { assembled, scattered },
                config.scale,
                label.color,
                phase,
                speed_factor,
            )
            .with_label(label.name.clone());
            elements.push(element);
        }
    }

    OrnamentPopulation::new(SphereMotion::from_config(config), elements, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::sampling::cone_radius_at;
    use crate::ornaments::INSTANCE_STRIDE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn population(seed: u64) -> SpherePopulation {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_spheres(&SphereConfig::default(), &mut IdAllocator::new(), &mut rng)
    }

    fn run(pop: &mut SpherePopulation, mode: SceneMode, frames: usize, start: usize) {
        for frame in start..start + frames {
            let ctx = FrameContext { mode, time: frame as f32 * DT, dt: DT };
            pop.update(&ctx);
        }
    }

    #[test]
    fn test_two_spheres_per_label() {
        let pop = population(1);
        assert_eq!(pop.len(), 24);
        let labels: Vec<_> = pop.elements().iter().filter_map(|e| e.label()).collect();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], "Goldman\nSachs");
    }

    #[test]
    fn test_generated_parameters() {
        let config = SphereConfig::default();
        for e in population(2).elements() {
            assert_eq!(e.kind(), ElementKind::SphereOrnament);
            assert_eq!(e.scale(), 0.7);
            assert!(e.speed_factor() >= 0.8 && e.speed_factor() <= 1.3);
            assert!(e.phase() >= 0.0 && e.phase() < TAU);
            assert!(e.scattered_position().length() <= 22.0 + 1e-4);

            // Pushed toward the surface, never further than the pushed cone
            let a = e.assembled_position();
            let limit = cone_radius_at(a.y, config.cone.height, config.cone.base_radius, 0.0);
            assert!(a.horizontal_length() <= limit * config.surface_push + 1e-3);
        }
    }

    #[test]
    fn test_assembles_and_faces_outward() {
        let mut pop = population(3);
        run(&mut pop, SceneMode::Assembled, 600, 0);

        let time = 599.0 * DT;
        for (e, spin) in pop.elements().iter().zip(pop.states()) {
            let p = e.current_position();
            let a = e.assembled_position();
            assert!((p.x - a.x).abs() < 0.01 && (p.z - a.z).abs() < 0.01);
            // Hover keeps y within its amplitude (plus tracking lag)
            assert!((p.y - a.y).abs() < 0.06);

            let expected = p.x.atan2(p.z) + time * 0.5;
            assert!((spin.rotation.y - expected).abs() < 1e-4);
            assert_eq!(spin.rotation.z, 0.0);
        }
    }

    #[test]
    fn test_tumble_accumulates_from_current_pose() {
        let mut pop = population(4);
        run(&mut pop, SceneMode::Assembled, 30, 0);
        let assembled_pose: Vec<Euler> = pop.states().iter().map(|s| s.rotation).collect();

        run(&mut pop, SceneMode::Scattered, 60, 30);
        for (spin, start) in pop.states().iter().zip(&assembled_pose) {
            let expected_x = start.x + spin.rate_x * DT * 60.0;
            let expected_y = start.y + spin.rate_y * DT * 60.0;
            assert!((spin.rotation.x - expected_x).abs() < 1e-4);
            assert!((spin.rotation.y - expected_y).abs() < 1e-4);
        }

        // A paused clock keeps the tumble where it is
        let before: Vec<Euler> = pop.states().iter().map(|s| s.rotation).collect();
        pop.update(&FrameContext { mode: SceneMode::Scattered, time: 2.0, dt: 0.0 });
        let after: Vec<Euler> = pop.states().iter().map(|s| s.rotation).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_immutable_fields_survive_ticks() {
        let mut pop = population(5);
        let before = pop.elements().to_vec();
        run(&mut pop, SceneMode::Assembled, 90, 0);
        run(&mut pop, SceneMode::Scattered, 90, 90);

        for (old, new) in before.iter().zip(pop.elements()) {
            assert_eq!(old.id(), new.id());
            assert_eq!(old.positions(), new.positions());
            assert_eq!(old.phase(), new.phase());
            assert_eq!(old.speed_factor(), new.speed_factor());
            assert_eq!(old.scale(), new.scale());
            assert_eq!(old.color(), new.color());
            assert_ne!(old.current_position(), new.current_position());
        }
    }

    #[test]
    fn test_toggle_mid_flight_moves_continuously() {
        let mut pop = population(6);
        let motion = pop.profile().clone();
        let mut mode = SceneMode::Assembled;

        for frame in 0..240 {
            if frame == 40 || frame == 120 {
                mode = mode.toggled();
            }
            let ctx = FrameContext { mode, time: frame as f32 * DT, dt: DT };
            let bounds: Vec<f32> = pop
                .elements()
                .iter()
                .map(|e| {
                    let target = e.target(mode);
                    let target = target.with_y(target.y + motion.hover(e, &ctx));
                    let fraction = (DT * motion.base_speed(mode) * e.speed_factor()).min(1.0);
                    fraction * e.current_position().distance(&target)
                })
                .collect();
            let previous: Vec<_> = pop.elements().iter().map(|e| e.current_position()).collect();

            pop.update(&ctx);

            for ((e, prev), bound) in pop.elements().iter().zip(&previous).zip(&bounds) {
                let step = e.current_position().distance(prev);
                assert!(step <= bound + 1e-4, "frame {}: step {} > {}", frame, step, bound);
                // 2.0 * 1.3 * dt of at most ~45 units
                assert!(step < 2.0);
            }
        }
    }

    #[test]
    fn test_instance_buffer_layout() {
        let mut pop = population(7);
        assert!(pop.instance_data().is_empty());
        run(&mut pop, SceneMode::Scattered, 1, 0);

        let data = pop.instance_data();
        assert_eq!(data.len(), pop.len() * INSTANCE_STRIDE);

        let first = &pop.elements()[0];
        let p = first.current_position();
        assert!((data[12] - p.x).abs() < 1e-5);
        assert!((data[13] - p.y).abs() < 1e-5);
        assert!((data[14] - p.z).abs() < 1e-5);
        assert_eq!(&data[16..19], &first.color().to_array());
    }

    #[test]
    fn test_no_labels_no_spheres() {
        let config = SphereConfig { labels: Vec::new(), ..SphereConfig::default() };
        let mut rng = StdRng::seed_from_u64(8);
        let mut pop = generate_spheres(&config, &mut IdAllocator::new(), &mut rng);
        pop.update(&FrameContext { mode: SceneMode::Assembled, time: 0.0, dt: DT });
        assert!(pop.is_empty());
        assert!(pop.instance_data().is_empty());
    }
}

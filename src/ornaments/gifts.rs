//! Small instanced gift boxes.
//!
//! Unlike spheres, a gift's rotation is a pure function of time and phase:
//! nothing is accumulated between frames.

use std::f32::consts::TAU;
use rand::Rng;
use crate::animation::{FrameContext, MotionProfile};
use crate::data::config::GiftConfig;
use crate::data::{DualPosition, Element, ElementKind, IdAllocator, SceneMode};
use crate::math::{sample_cone_volume, sample_sphere_volume, Euler};
use super::OrnamentPopulation;

pub type GiftPopulation = OrnamentPopulation<GiftMotion>;

#[derive(Debug, Clone)]
pub struct GiftMotion {
    pub assemble_speed: f32,
    pub scatter_speed: f32,
}

impl GiftMotion {
    pub fn from_config(config: &GiftConfig) -> Self {
        Self {
            assemble_speed: config.assemble_speed,
            scatter_speed: config.scatter_speed,
        }
    }
}

impl MotionProfile for GiftMotion {
    type State = ();

    fn init_state<R: Rng + ?Sized>(&self, _element: &Element, _rng: &mut R) {}

    fn base_speed(&self, mode: SceneMode) -> f32 {
        match mode {
            SceneMode::Assembled => self.assemble_speed,
            SceneMode::Scattered => self.scatter_speed,
        }
    }

    fn hover(&self, element: &Element, frame: &FrameContext) -> f32 {
        match frame.mode {
            SceneMode::Assembled => (frame.time * 3.0 + element.phase()).sin() * 0.02,
            SceneMode::Scattered => 0.0,
        }
    }

    fn orient(&self, element: &Element, _state: &mut (), frame: &FrameContext) -> Euler {
        let phase = element.phase();
        match frame.mode {
            SceneMode::Assembled => Euler::new(0.0, phase + frame.time * 0.2, 0.0),
            SceneMode::Scattered => Euler::new(frame.time + phase, frame.time * 0.5, phase),
        }
    }
}

/// Build the gift population with colors drawn from the palette
pub fn generate_gifts<R: Rng + ?Sized>(
    config: &GiftConfig,
    ids: &mut IdAllocator,
    rng: &mut R,
) -> GiftPopulation {
    let mut elements = Vec::with_capacity(config.count);

    if !config.palette.is_empty() {
        for _ in 0..config.count {
            let scale = config.scale.at(rng.gen());
            let cone = config.cone;
            let assembled = sample_cone_volume(rng, cone.height, cone.base_radius, cone.y_offset);
            let color = config.palette[rng.gen_range(0..config.palette.len())];
            let scattered = sample_sphere_volume(rng, config.scatter_radius);
            let speed_factor = config.speed.at(rng.gen());
            let phase = rng.gen::<f32>() * TAU;

            elements.push(Element::new(
                ids.next_id(),
                ElementKind::CubeOrnament,
                DualPosition { assembled, scattered },
                scale,
                color,
                phase,
                speed_factor,
            ));
        }
    }

    OrnamentPopulation::new(GiftMotion::from_config(config), elements, rng)
}

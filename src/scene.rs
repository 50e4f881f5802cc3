//! Owns every population and drives them from one clock.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::animation::{FrameContext, MorphController};
use crate::data::{ConfigError, IdAllocator, SceneConfig, SceneMode};
use crate::math::Vec3;
use crate::ornaments::{generate_gifts, generate_spheres, GiftPopulation, SpherePopulation};
use crate::particles::FoliageSystem;

pub struct Scene {
    mode: SceneMode,
    morph: MorphController,
    foliage: FoliageSystem,
    spheres: SpherePopulation,
    gifts: GiftPopulation,
    time: f32,
    group_offset: Vec3,
}

impl Scene {
    /// Validate the description and generate all populations.
    ///
    /// Uses `config.seed` when present, otherwise draws one from entropy.
    pub fn new(config: &SceneConfig) -> Result<Self, ConfigError> {
        match config.seed {
            Some(seed) => Self::with_rng(config, &mut StdRng::seed_from_u64(seed)),
            None => Self::with_rng(config, &mut StdRng::from_entropy()),
        }
    }

    pub fn with_rng<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            log::error!("Rejected scene description: {}", e);
            return Err(e);
        }

        let mut ids = IdAllocator::new();
        let foliage = FoliageSystem::generate(&config.foliage, &mut ids, rng);
        let spheres = generate_spheres(&config.spheres, &mut ids, rng);
        let gifts = generate_gifts(&config.gifts, &mut ids, rng);

        log::info!(
            "Scene generated: {} particles, {} spheres, {} gifts",
            foliage.len(),
            spheres.len(),
            gifts.len()
        );

        Ok(Self {
            mode: SceneMode::default(),
            morph: MorphController::new(config.morph.smoothing_rate),
            foliage,
            spheres,
            gifts,
            time: 0.0,
            group_offset: config.group_offset,
        })
    }

    pub fn set_mode(&mut self, mode: SceneMode) {
        if mode != self.mode {
            log::info!("Scene mode: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Flip the mode and return the new one
    pub fn toggle_mode(&mut self) -> SceneMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    pub fn assembly_factor(&self) -> f32 {
        self.morph.factor()
    }

    /// Seconds of animation time accumulated by `tick`
    pub fn elapsed(&self) -> f32 {
        self.time
    }

    pub fn group_offset(&self) -> Vec3 {
        self.group_offset
    }

    /// Advance every population by one frame.
    ///
    /// Negative or non-finite `dt` is treated as a paused frame.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt;

        let factor = self.morph.advance(dt, self.mode);
        self.foliage.update(self.time, factor);

        let frame = FrameContext { mode: self.mode, time: self.time, dt };
        self.spheres.update(&frame);
        self.gifts.update(&frame);
    }

    pub fn foliage(&self) -> &FoliageSystem {
        &self.foliage
    }

    pub fn spheres(&self) -> &SpherePopulation {
        &self.spheres
    }

    pub fn gifts(&self) -> &GiftPopulation {
        &self.gifts
    }

    pub fn element_count(&self) -> usize {
        self.foliage.len() + self.spheres.len() + self.gifts.len()
    }
}

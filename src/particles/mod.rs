pub mod foliage;

pub use foliage::{blend_particle, FoliageSystem, ParticleSample, FOLIAGE_STRIDE, PARTICLE_STRIDE};

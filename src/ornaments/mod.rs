//! Individually animated ornaments: labelled spheres and instanced gifts

pub mod gifts;
pub mod population;
pub mod spheres;

pub use gifts::{generate_gifts, GiftMotion, GiftPopulation};
pub use population::{OrnamentPopulation, INSTANCE_STRIDE};
pub use spheres::{generate_spheres, SphereMotion, SpherePopulation, SphereSpin};

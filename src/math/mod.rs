pub mod vec3;
pub mod matrix;
pub mod sampling;

pub use vec3::Vec3;
pub use matrix::{Euler, Mat4};
pub use sampling::{sample_cone_volume, sample_sphere_volume};

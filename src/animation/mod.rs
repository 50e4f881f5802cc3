//! Animation module for the scatter/assemble morph
//!
//! Holds the shared assembly factor, the easing curves applied to it, and
//! the per-element motion strategies used by the ornament populations.

mod easing;
mod morph;
mod motion;

pub use easing::{Easing, ease, mix, smoothstep};
pub use morph::MorphController;
pub use motion::{FrameContext, MotionProfile, Transform, chase};

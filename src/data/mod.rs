pub mod color;
pub mod config;
pub mod element;
pub mod mode;

pub use color::Color;
pub use config::{ConeShape, ConfigError, FoliageBlend, SceneConfig, ValueRange};
pub use element::{DualPosition, Element, ElementKind, IdAllocator};
pub use mode::SceneMode;

//! YAML scene description.
//!
//! Every field is optional; omitted fields take the reference values the
//! scene was designed around.

use serde::Deserialize;
use thiserror::Error;
use crate::math::Vec3;
use super::Color;

/// Errors raised while loading or validating a scene description
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{field} must be a positive number, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} range {min}..{max} is inverted or negative")]
    InvalidRange { field: &'static str, min: f32, max: f32 },
    #[error("{0} is empty but its population is not")]
    EmptyList(&'static str),
}

/// Cone volume that holds an assembled population
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConeShape {
    pub height: f32,
    pub base_radius: f32,
    pub y_offset: f32,
}

impl Default for ConeShape {
    fn default() -> Self {
        Self {
            height: 14.0,
            base_radius: 5.0,
            y_offset: 0.0,
        }
    }
}

/// Half-open range `[min, max)` for per-element random parameters.
///
/// `min == max` is allowed and pins the parameter to that constant.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a uniform draw in [0, 1) into the range
    pub fn at(&self, unit: f32) -> f32 {
        self.min + unit * (self.max - self.min)
    }
}

/// Where the foliage blend is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoliageBlend {
    /// Vertex stage mixes both targets from uniforms
    #[default]
    Shader,
    /// Blend computed per particle on the CPU and uploaded each frame
    Host,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Exponential smoothing rate of the assembly factor, per second
    pub smoothing_rate: f32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self { smoothing_rate: 1.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FoliageConfig {
    pub count: usize,
    pub cone: ConeShape,
    pub scatter_radius: f32,
    pub blend: FoliageBlend,
}

impl Default for FoliageConfig {
    fn default() -> Self {
        Self {
            count: 15_000,
            cone: ConeShape::default(),
            scatter_radius: 25.0,
            blend: FoliageBlend::Shader,
        }
    }
}

/// Text and base color for one family of labelled spheres
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelSpec {
    /// May contain `\n` to break the label over several lines
    pub name: String,
    pub color: Color,
}

impl LabelSpec {
    fn new(name: &str, hex: &str) -> Self {
        Self {
            name: name.to_string(),
            color: Color::from_hex(hex).unwrap_or(Color::WHITE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub copies_per_label: usize,
    pub scale: f32,
    pub cone: ConeShape,
    /// Horizontal multiplier that pushes assembled spheres toward the cone surface
    pub surface_push: f32,
    pub scatter_radius: f32,
    pub speed: ValueRange,
    /// Angular rate range (rad/s) of the scattered tumble
    pub tumble_rate: ValueRange,
    pub assemble_speed: f32,
    pub scatter_speed: f32,
    pub labels: Vec<LabelSpec>,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            copies_per_label: 2,
            scale: 0.7,
            cone: ConeShape {
                height: 13.0,
                base_radius: 4.2,
                y_offset: 0.0,
            },
            surface_push: 1.2,
            scatter_radius: 22.0,
            speed: ValueRange::new(0.8, 1.3),
            tumble_rate: ValueRange::new(0.0, 0.5),
            assemble_speed: 2.0,
            scatter_speed: 0.8,
            labels: vec![
                LabelSpec::new("Goldman\nSachs", "#7399C6"),
                LabelSpec::new("Morgan\nStanley", "#333333"),
                LabelSpec::new("Citadel", "#003399"),
                LabelSpec::new("Millennium", "#228B22"),
                LabelSpec::new("J.P.\nMorgan", "#554035"),
                LabelSpec::new("BlackRock", "#222222"),
                LabelSpec::new("Bridgewater", "#800020"),
                LabelSpec::new("Two Sigma", "#FF7F50"),
                LabelSpec::new("D.E. Shaw", "#C71585"),
                LabelSpec::new("Point72", "#008B8B"),
                LabelSpec::new("Jane\nStreet", "#32CD32"),
                LabelSpec::new("Susquehanna", "#FFD700"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GiftConfig {
    pub count: usize,
    pub scale: ValueRange,
    pub cone: ConeShape,
    pub scatter_radius: f32,
    pub speed: ValueRange,
    pub assemble_speed: f32,
    pub scatter_speed: f32,
    pub palette: Vec<Color>,
}

impl Default for GiftConfig {
    fn default() -> Self {
        Self {
            count: 80,
            scale: ValueRange::new(0.3, 0.6),
            cone: ConeShape {
                height: 12.0,
                base_radius: 3.5,
                y_offset: -1.0,
            },
            scatter_radius: 18.0,
            speed: ValueRange::new(0.3, 0.8),
            assemble_speed: 1.5,
            scatter_speed: 0.5,
            palette: [
                "#FF0055", "#00FFCC", "#9D00FF", "#FF5500", "#FFFF00", "#00FF00", "#0099FF",
            ]
            .iter()
            .filter_map(|hex| Color::from_hex(hex).ok())
            .collect(),
        }
    }
}

/// Complete scene description
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for population generation; a fresh one is drawn when absent
    pub seed: Option<u64>,
    /// Translation applied to the whole scene at draw time
    pub group_offset: Vec3,
    pub morph: MorphConfig,
    pub foliage: FoliageConfig,
    pub spheres: SphereConfig,
    pub gifts: GiftConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            group_offset: Vec3::new(0.0, -2.0, 0.0),
            morph: MorphConfig::default(),
            foliage: FoliageConfig::default(),
            spheres: SphereConfig::default(),
            gifts: GiftConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a YAML scene description
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject descriptions that would generate degenerate geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        let offset = self.group_offset;
        for value in [offset.x, offset.y, offset.z] {
            finite("group_offset", value)?;
        }

        positive("morph.smoothing_rate", self.morph.smoothing_rate)?;

        check_cone("foliage.cone", &self.foliage.cone)?;
        positive("foliage.scatter_radius", self.foliage.scatter_radius)?;

        let spheres = &self.spheres;
        positive("spheres.scale", spheres.scale)?;
        check_cone("spheres.cone", &spheres.cone)?;
        positive("spheres.surface_push", spheres.surface_push)?;
        positive("spheres.scatter_radius", spheres.scatter_radius)?;
        check_range("spheres.speed", spheres.speed, false)?;
        check_range("spheres.tumble_rate", spheres.tumble_rate, true)?;
        positive("spheres.assemble_speed", spheres.assemble_speed)?;
        positive("spheres.scatter_speed", spheres.scatter_speed)?;

        let gifts = &self.gifts;
        check_range("gifts.scale", gifts.scale, false)?;
        check_cone("gifts.cone", &gifts.cone)?;
        positive("gifts.scatter_radius", gifts.scatter_radius)?;
        check_range("gifts.speed", gifts.speed, false)?;
        positive("gifts.assemble_speed", gifts.assemble_speed)?;
        positive("gifts.scatter_speed", gifts.scatter_speed)?;
        if gifts.count > 0 && gifts.palette.is_empty() {
            return Err(ConfigError::EmptyList("gifts.palette"));
        }

        Ok(())
    }

    /// Number of labelled spheres the description generates
    #[cfg(test)]
    pub fn sphere_count(&self) -> usize {
        self.spheres.labels.len() * self.spheres.copies_per_label
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn check_cone(field: &'static str, cone: &ConeShape) -> Result<(), ConfigError> {
    positive(field, cone.height)?;
    positive(field, cone.base_radius)?;
    finite(field, cone.y_offset)
}

fn check_range(field: &'static str, range: ValueRange, allow_zero: bool) -> Result<(), ConfigError> {
    let invalid = ConfigError::InvalidRange { field, min: range.min, max: range.max };
    if !range.min.is_finite() || !range.max.is_finite() || range.max < range.min {
        return Err(invalid);
    }
    if range.min < 0.0 || (!allow_zero && range.min == 0.0) {
        return Err(invalid);
    }
    Ok(())
}

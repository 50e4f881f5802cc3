use std::f32::consts::TAU;
use crate::math::Vec3;
use super::{Color, SceneMode};

/// Rendering primitive and secondary-motion profile of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Point in the fine foliage cloud
    Particle,
    /// Individually posed, labelled sphere
    SphereOrnament,
    /// Instanced small cube
    CubeOrnament,
}

/// The two layouts an element moves between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualPosition {
    /// Position inside the cone
    pub assembled: Vec3,
    /// Position inside the scatter sphere
    pub scattered: Vec3,
}

impl DualPosition {
    pub fn target(&self, mode: SceneMode) -> Vec3 {
        match mode {
            SceneMode::Assembled => self.assembled,
            SceneMode::Scattered => self.scattered,
        }
    }
}

/// One visual instance with two fixed targets.
///
/// Everything except `current_position` is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: u32,
    kind: ElementKind,
    positions: DualPosition,
    scale: f32,
    color: Color,
    label: Option<String>,
    phase: f32,
    speed_factor: f32,
    current_position: Vec3,
}

impl Element {
    /// Create an element resting at its scattered position.
    ///
    /// `phase` is wrapped into [0, 2π); `scale` and `speed_factor` are
    /// validated by the scene configuration before generation.
    pub fn new(
        id: u32,
        kind: ElementKind,
        positions: DualPosition,
        scale: f32,
        color: Color,
        phase: f32,
        speed_factor: f32,
    ) -> Self {
        Self {
            id,
            kind,
            positions,
            scale,
            color,
            label: None,
            phase: phase.rem_euclid(TAU),
            speed_factor,
            current_position: positions.scattered,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn positions(&self) -> &DualPosition {
        &self.positions
    }

    pub fn assembled_position(&self) -> Vec3 {
        self.positions.assembled
    }

    pub fn scattered_position(&self) -> Vec3 {
        self.positions.scattered
    }

    pub fn target(&self, mode: SceneMode) -> Vec3 {
        self.positions.target(mode)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Per-element random value in [0, 1), derived from the phase
    pub fn seed(&self) -> f32 {
        self.phase / TAU
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    pub fn current_position(&self) -> Vec3 {
        self.current_position
    }

    pub(crate) fn set_current_position(&mut self, position: Vec3) {
        self.current_position = position;
    }
}

/// Hands out ids that stay unique across every population of a scene
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new(
            7,
            ElementKind::SphereOrnament,
            DualPosition {
                assembled: Vec3::new(1.0, 2.0, 3.0),
                scattered: Vec3::new(-4.0, 5.0, -6.0),
            },
            0.7,
            Color::WHITE,
            TAU + 1.0,
            1.1,
        )
    }

    #[test]
    fn test_starts_scattered() {
        let e = sample();
        assert_eq!(e.current_position(), e.scattered_position());
        assert_eq!(e.target(SceneMode::Assembled), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_phase_wrapped() {
        let e = sample();
        assert!((e.phase() - 1.0).abs() < 1e-5);
        assert!(e.seed() >= 0.0 && e.seed() < 1.0);
    }

    #[test]
    fn test_label() {
        let e = sample().with_label("Jane\nStreet");
        assert_eq!(e.label(), Some("Jane\nStreet"));
        assert_eq!(sample().label(), None);
    }

    #[test]
    fn test_id_allocator_is_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
    }
}

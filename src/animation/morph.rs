//! Assembly factor: the shared, smoothed drive signal of the particle morph

use crate::data::SceneMode;

/// Eases a single scalar toward 0 (scattered) or 1 (assembled).
///
/// The mode can flip on any frame; the factor only ever moves by exponential
/// smoothing, so the visual transition stays continuous.
#[derive(Debug, Clone)]
pub struct MorphController {
    factor: f32,
    smoothing_rate: f32,
}

impl Default for MorphController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SMOOTHING_RATE)
    }
}

impl MorphController {
    pub const DEFAULT_SMOOTHING_RATE: f32 = 1.5;

    pub fn new(smoothing_rate: f32) -> Self {
        Self {
            factor: 0.0,
            smoothing_rate: smoothing_rate.max(0.0),
        }
    }

    /// Current assembly factor in [0, 1]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Move the factor toward the target of `mode` and return it.
    ///
    /// The step fraction is capped at 1 so a long frame lands on the target
    /// instead of overshooting it.
    pub fn advance(&mut self, dt: f32, mode: SceneMode) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let target = mode.target_factor();
        let step = (self.smoothing_rate * dt).min(1.0);

        self.factor += (target - self.factor) * step;
        self.factor = self.factor.clamp(0.0, 1.0);
        self.factor
    }
}

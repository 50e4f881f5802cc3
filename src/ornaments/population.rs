use rand::Rng;
use crate::animation::{FrameContext, MotionProfile};
use crate::data::Element;

/// Floats per instance: column-major model matrix (16) + RGB color (3)
pub const INSTANCE_STRIDE: usize = 19;

/// A fixed set of elements animated by one motion profile.
///
/// Each update rewrites the instance buffer in element order, ready for
/// upload.
pub struct OrnamentPopulation<P: MotionProfile> {
    profile: P,
    elements: Vec<Element>,
    states: Vec<P::State>,
    instance_data: Vec<f32>,
}

impl<P: MotionProfile> OrnamentPopulation<P> {
    pub fn new<R: Rng + ?Sized>(profile: P, elements: Vec<Element>, rng: &mut R) -> Self {
        let states = elements
            .iter()
            .map(|element| profile.init_state(element, rng))
            .collect();
        let instance_data = Vec::with_capacity(elements.len() * INSTANCE_STRIDE);

        Self {
            profile,
            elements,
            states,
            instance_data,
        }
    }

    /// Advance every element one frame and rewrite the instance buffer
    pub fn update(&mut self, frame: &FrameContext) {
        self.instance_data.clear();

        for (element, state) in self.elements.iter_mut().zip(self.states.iter_mut()) {
            let transform = self.profile.blend(element, state, frame);
            self.instance_data.extend_from_slice(transform.matrix().as_slice());
            self.instance_data.extend_from_slice(&element.color().to_array());
        }
    }

    /// Instance buffer from the latest update
    /// Format: matrix(16) + color(3) = 19 floats per element
    pub fn instance_data(&self) -> &[f32] {
        &self.instance_data
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn states(&self) -> &[P::State] {
        &self.states
    }

    pub fn profile(&self) -> &P {
        &self.profile
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

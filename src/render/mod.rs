pub mod camera;
pub mod decorator;
pub mod pipeline;
pub mod shaders;
pub mod webgl;

pub use camera::OrbitCamera;
pub use decorator::{label_layout, CanvasDecorator, LabelLayout, SurfaceDecorator};
pub use pipeline::RenderPipeline;
pub use webgl::WebGLContext;

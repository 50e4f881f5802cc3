use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod data;
pub mod math;
pub mod mesh;
pub mod ornaments;
pub mod particles;
pub mod render;
pub mod scene;

use data::{SceneConfig, SceneMode};
use mesh::primitives::SPHERE_SEGMENTS;
use mesh::Mesh;
use render::{CanvasDecorator, OrbitCamera, RenderPipeline, SurfaceDecorator};
use scene::Scene;

/// Install the panic hook and the console logger
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Engine state exposed to JavaScript
#[wasm_bindgen]
pub struct MorphingTree {
    scene: Scene,
    pipeline: RenderPipeline,
    camera: OrbitCamera,
}

#[wasm_bindgen]
impl MorphingTree {
    /// Create an engine with the reference scene
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<MorphingTree, JsValue> {
        Self::build(canvas, SceneConfig::default())
    }

    /// Create an engine from a YAML scene description
    #[wasm_bindgen]
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> Result<MorphingTree, JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(|e| {
            log::error!("Invalid scene description: {}", e);
            JsValue::from_str(&e.to_string())
        })?;
        Self::build(canvas, config)
    }

    fn build(canvas: HtmlCanvasElement, config: SceneConfig) -> Result<MorphingTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let to_js = |e: String| JsValue::from_str(&e);

        let scene = Scene::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut pipeline = RenderPipeline::new(gl, width, height).map_err(to_js)?;

        let decorator = CanvasDecorator::from_window().map_err(to_js)?;
        let labels = scene
            .spheres()
            .elements()
            .iter()
            .map(|e| decorator.decorate(e.label().unwrap_or_default(), e.color()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js)?;

        let (width_segments, height_segments) = SPHERE_SEGMENTS;
        pipeline.upload_foliage(scene.foliage()).map_err(to_js)?;
        pipeline
            .upload_spheres(&Mesh::uv_sphere(width_segments, height_segments), &labels)
            .map_err(to_js)?;
        pipeline.upload_gifts(&Mesh::cube()).map_err(to_js)?;

        log::info!("Morphing tree ready: {} elements", scene.element_count());

        Ok(Self {
            scene,
            pipeline,
            camera: OrbitCamera::default(),
        })
    }

    /// Advance the scene by `dt` seconds and draw a frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        self.scene.tick(dt);
        self.camera.update(dt, self.scene.mode().is_assembled());
        self.pipeline.render(&self.scene, &self.camera);
    }

    #[wasm_bindgen]
    pub fn set_assembled(&mut self, assembled: bool) {
        self.scene.set_mode(SceneMode::from_assembled(assembled));
    }

    /// Flip between scattered and assembled; returns true when now assembled
    #[wasm_bindgen]
    pub fn toggle_mode(&mut self) -> bool {
        self.scene.toggle_mode().is_assembled()
    }

    #[wasm_bindgen]
    pub fn is_assembled(&self) -> bool {
        self.scene.mode().is_assembled()
    }

    /// Current assembly factor (0.0 to 1.0)
    #[wasm_bindgen]
    pub fn assembly_factor(&self) -> f32 {
        self.scene.assembly_factor()
    }

    #[wasm_bindgen]
    pub fn element_count(&self) -> u32 {
        self.scene.element_count() as u32
    }

    /// Orbit camera
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.camera.orbit(delta_x, delta_y);
    }

    /// Zoom camera
    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) {
        self.pipeline.resize(width, height);
    }
}

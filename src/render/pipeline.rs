use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};
use crate::data::FoliageBlend;
use crate::math::Mat4;
use crate::mesh::{Mesh, VERTEX_STRIDE};
use crate::ornaments::INSTANCE_STRIDE;
use crate::particles::{FoliageSystem, FOLIAGE_STRIDE, PARTICLE_STRIDE};
use crate::scene::Scene;
use super::camera::OrbitCamera;
use super::shaders::*;
use super::webgl::WebGLContext;

const CLEAR_COLOR: [f32; 4] = [0.0, 0.02, 0.03, 1.0];
const LIGHT_DIR: [f32; 3] = [0.5, 1.0, 0.6];
const AMBIENT: f32 = 0.55;
const DIFFUSE: f32 = 0.65;

/// Cached uniform locations shared by the two point programs
struct PointUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    factor: Option<WebGlUniformLocation>,
}

impl PointUniforms {
    fn new(ctx: &WebGLContext, program: &WebGlProgram) -> Self {
        Self {
            model: ctx.get_uniform_location(program, "u_model"),
            view: ctx.get_uniform_location(program, "u_view"),
            projection: ctx.get_uniform_location(program, "u_projection"),
            time: ctx.get_uniform_location(program, "u_time"),
            factor: ctx.get_uniform_location(program, "u_factor"),
        }
    }
}

struct OrnamentUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    texture: Option<WebGlUniformLocation>,
    textured: Option<WebGlUniformLocation>,
    light_dir: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    diffuse: Option<WebGlUniformLocation>,
}

/// Foliage points on the GPU
struct PointBatch {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    blend: FoliageBlend,
    count: i32,
}

/// One ornament mesh plus its per-instance buffer
struct MeshBatch {
    vao: WebGlVertexArrayObject,
    instance_buffer: WebGlBuffer,
    index_count: i32,
    instance_count: i32,
}

/// Draws the scene: foliage points, labelled spheres and instanced gifts
pub struct RenderPipeline {
    ctx: WebGLContext,

    foliage_program: WebGlProgram,
    particle_program: WebGlProgram,
    ornament_program: WebGlProgram,

    foliage_uniforms: PointUniforms,
    particle_uniforms: PointUniforms,
    ornament_uniforms: OrnamentUniforms,

    foliage: Option<PointBatch>,
    spheres: Option<MeshBatch>,
    gifts: Option<MeshBatch>,
    sphere_textures: Vec<WebGlTexture>,

    width: i32,
    height: i32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        let foliage_program = ctx.create_program(FOLIAGE_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER)?;
        let particle_program = ctx.create_program(PARTICLE_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER)?;
        let ornament_program = ctx.create_program(ORNAMENT_VERTEX_SHADER, ORNAMENT_FRAGMENT_SHADER)?;
        log::debug!("Shader programs linked");

        let foliage_uniforms = PointUniforms::new(&ctx, &foliage_program);
        let particle_uniforms = PointUniforms::new(&ctx, &particle_program);
        let ornament_uniforms = OrnamentUniforms {
            model: ctx.get_uniform_location(&ornament_program, "u_model"),
            view: ctx.get_uniform_location(&ornament_program, "u_view"),
            projection: ctx.get_uniform_location(&ornament_program, "u_projection"),
            texture: ctx.get_uniform_location(&ornament_program, "u_texture"),
            textured: ctx.get_uniform_location(&ornament_program, "u_textured"),
            light_dir: ctx.get_uniform_location(&ornament_program, "u_light_dir"),
            ambient: ctx.get_uniform_location(&ornament_program, "u_ambient"),
            diffuse: ctx.get_uniform_location(&ornament_program, "u_diffuse"),
        };

        Ok(Self {
            ctx,
            foliage_program,
            particle_program,
            ornament_program,
            foliage_uniforms,
            particle_uniforms,
            ornament_uniforms,
            foliage: None,
            spheres: None,
            gifts: None,
            sphere_textures: Vec::new(),
            width,
            height,
        })
    }

    /// Upload the foliage cloud.
    ///
    /// Shader blending uploads the static attributes once; host blending
    /// allocates a buffer that `render` refills every frame.
    pub fn upload_foliage(&mut self, foliage: &FoliageSystem) -> Result<(), String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let blend = foliage.blend();
        let buffer = match blend {
            FoliageBlend::Shader => {
                let buffer = self.ctx.create_buffer_f32(&foliage.vertex_data(), WebGl2RenderingContext::STATIC_DRAW)?;
                // assembled(3) + scattered(3) + seed(1)
                self.ctx.float_attribute(0, 3, FOLIAGE_STRIDE, 0, 0);
                self.ctx.float_attribute(1, 3, FOLIAGE_STRIDE, 3, 0);
                self.ctx.float_attribute(2, 1, FOLIAGE_STRIDE, 6, 0);
                buffer
            }
            FoliageBlend::Host => {
                let buffer = self.ctx.create_buffer_f32(foliage.host_data(), WebGl2RenderingContext::DYNAMIC_DRAW)?;
                // position(3) + size(1) + alpha(1) + color(3)
                self.ctx.float_attribute(0, 3, PARTICLE_STRIDE, 0, 0);
                self.ctx.float_attribute(1, 1, PARTICLE_STRIDE, 3, 0);
                self.ctx.float_attribute(2, 1, PARTICLE_STRIDE, 4, 0);
                self.ctx.float_attribute(3, 3, PARTICLE_STRIDE, 5, 0);
                buffer
            }
        };

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        log::debug!("Foliage uploaded: {} particles, {:?} blending", foliage.len(), blend);
        self.foliage = Some(PointBatch {
            vao,
            buffer,
            blend,
            count: foliage.len() as i32,
        });
        Ok(())
    }

    /// Upload the sphere mesh and one label surface per sphere, in element order
    pub fn upload_spheres(&mut self, mesh: &Mesh, labels: &[HtmlCanvasElement]) -> Result<(), String> {
        self.sphere_textures = labels
            .iter()
            .map(|canvas| self.ctx.create_texture_from_canvas(canvas))
            .collect::<Result<_, _>>()?;
        self.spheres = Some(self.create_mesh_batch(mesh)?);
        log::debug!("Spheres uploaded: {} label textures", self.sphere_textures.len());
        Ok(())
    }

    pub fn upload_gifts(&mut self, mesh: &Mesh) -> Result<(), String> {
        self.gifts = Some(self.create_mesh_batch(mesh)?);
        log::debug!("Gift mesh uploaded");
        Ok(())
    }

    fn create_mesh_batch(&self, mesh: &Mesh) -> Result<MeshBatch, String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        // position(3) + normal(3) + uv(2)
        self.ctx.create_buffer_f32(&mesh.vertex_data(), WebGl2RenderingContext::STATIC_DRAW)?;
        self.ctx.float_attribute(0, 3, VERTEX_STRIDE, 0, 0);
        self.ctx.float_attribute(1, 3, VERTEX_STRIDE, 3, 0);
        self.ctx.float_attribute(2, 2, VERTEX_STRIDE, 6, 0);

        self.ctx.create_index_buffer(mesh.index_data())?;

        let instance_buffer = self.ctx.create_buffer_f32(&[], WebGl2RenderingContext::DYNAMIC_DRAW)?;
        self.bind_instance_attributes(0);

        gl.bind_vertex_array(None);
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

        Ok(MeshBatch {
            vao,
            instance_buffer,
            index_count: mesh.index_data().len() as i32,
            instance_count: 0,
        })
    }

    /// Point the instance attributes at `first` within the bound instance buffer
    fn bind_instance_attributes(&self, first: usize) {
        let base = first * INSTANCE_STRIDE;
        for column in 0..4 {
            self.ctx.float_attribute(3 + column as u32, 4, INSTANCE_STRIDE, base + column * 4, 1);
        }
        self.ctx.float_attribute(7, 3, INSTANCE_STRIDE, base + 16, 1);
    }

    /// Copy this frame's buffers from the scene and draw it
    pub fn render(&mut self, scene: &Scene, camera: &OrbitCamera) {
        self.sync(scene);

        let aspect = self.width as f32 / self.height.max(1) as f32;
        let projection = camera.projection_matrix(aspect);
        let view = camera.view_matrix();
        let model = Mat4::translation(scene.group_offset());

        self.ctx.viewport(0, 0, self.width, self.height);
        let [r, g, b, a] = CLEAR_COLOR;
        self.ctx.clear(r, g, b, a);

        self.draw_ornaments(&model, &view, &projection);
        self.draw_foliage(scene, &model, &view, &projection);
    }

    fn sync(&mut self, scene: &Scene) {
        if let Some(batch) = &self.foliage {
            if batch.blend == FoliageBlend::Host {
                self.ctx.update_buffer_f32(&batch.buffer, scene.foliage().host_data());
            }
        }

        let populations = [
            (&mut self.spheres, scene.spheres().instance_data()),
            (&mut self.gifts, scene.gifts().instance_data()),
        ];
        for (batch, data) in populations {
            if let Some(batch) = batch {
                self.ctx.update_buffer_f32(&batch.instance_buffer, data);
                batch.instance_count = (data.len() / INSTANCE_STRIDE) as i32;
            }
        }
    }

    fn draw_ornaments(&self, model: &Mat4, view: &Mat4, projection: &Mat4) {
        let gl = &self.ctx.gl;
        let u = &self.ornament_uniforms;

        self.ctx.opaque_state();
        gl.use_program(Some(&self.ornament_program));
        self.ctx.uniform_matrix4fv(u.model.as_ref(), model.as_slice());
        self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
        let [x, y, z] = LIGHT_DIR;
        self.ctx.uniform_3f(u.light_dir.as_ref(), x, y, z);
        self.ctx.uniform_1f(u.ambient.as_ref(), AMBIENT);
        self.ctx.uniform_1f(u.diffuse.as_ref(), DIFFUSE);
        self.ctx.uniform_1i(u.texture.as_ref(), 0);
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);

        if let Some(gifts) = self.gifts.as_ref().filter(|b| b.instance_count > 0) {
            self.ctx.uniform_1f(u.textured.as_ref(), 0.0);
            gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, None);
            gl.bind_vertex_array(Some(&gifts.vao));
            gl.draw_elements_instanced_with_i32(
                WebGl2RenderingContext::TRIANGLES,
                gifts.index_count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
                gifts.instance_count,
            );
        }

        // Each sphere carries its own label texture, so they are drawn one instance at a time
        if let Some(spheres) = self.spheres.as_ref().filter(|b| b.instance_count > 0) {
            self.ctx.uniform_1f(u.textured.as_ref(), 1.0);
            gl.bind_vertex_array(Some(&spheres.vao));
            gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&spheres.instance_buffer));

            let count = (spheres.instance_count as usize).min(self.sphere_textures.len());
            for (i, texture) in self.sphere_textures.iter().take(count).enumerate() {
                self.bind_instance_attributes(i);
                gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, Some(texture));
                gl.draw_elements_instanced_with_i32(
                    WebGl2RenderingContext::TRIANGLES,
                    spheres.index_count,
                    WebGl2RenderingContext::UNSIGNED_INT,
                    0,
                    1,
                );
            }
            gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);
        }

        gl.bind_vertex_array(None);
    }

    fn draw_foliage(&self, scene: &Scene, model: &Mat4, view: &Mat4, projection: &Mat4) {
        let batch = match &self.foliage {
            Some(batch) if batch.count > 0 => batch,
            _ => return,
        };
        let gl = &self.ctx.gl;

        let (program, u) = match batch.blend {
            FoliageBlend::Shader => (&self.foliage_program, &self.foliage_uniforms),
            FoliageBlend::Host => (&self.particle_program, &self.particle_uniforms),
        };

        self.ctx.additive_state();
        gl.use_program(Some(program));
        self.ctx.uniform_matrix4fv(u.model.as_ref(), model.as_slice());
        self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_1f(u.time.as_ref(), scene.foliage().time());
        self.ctx.uniform_1f(u.factor.as_ref(), scene.foliage().factor());

        gl.bind_vertex_array(Some(&batch.vao));
        gl.draw_arrays(WebGl2RenderingContext::POINTS, 0, batch.count);
        gl.bind_vertex_array(None);

        self.ctx.opaque_state();
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }
}

use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlVertexArrayObject,
    WebGlUniformLocation,
};
use crate::math::{Vec3, Mat4};
use super::webgl::WebGLContext;
use super::shaders::*;

const CAMERA_ORBIT_SPEED: f32 = 0.12;
const CAMERA_RADIUS: f32 = 15.0;
const CAMERA_HEIGHT: f32 = 4.0;

/// Cached uniform locations for the ribbon shader
struct RibbonUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the instanced ornament shader
struct OrnamentUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the particle shader
struct ParticleUniforms {
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
}

/// GPU state for one ribbon strip: its own VAO and dynamic vertex buffer,
/// indices are static for the strip's lifetime
struct RibbonBatch {
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    #[allow(dead_code)]
    index_buffer: WebGlBuffer,
    index_count: i32,
}

/// GPU state for a complete scene. Built as one unit by `upload_scene` so a
/// failed rebuild never leaves the pipeline with a half-replaced scene.
struct SceneGeometry {
    ribbons: Vec<RibbonBatch>,

    // Shared bauble geometry plus per-instance transforms
    ornament_vao: WebGlVertexArrayObject,
    ornament_instance_buffer: WebGlBuffer,
    ornament_index_count: i32,
    ornament_instance_count: i32,

    // The topper draws through the ornament program with a one-instance buffer
    topper_vao: WebGlVertexArrayObject,
    topper_instance_buffer: WebGlBuffer,

    particle_vao: WebGlVertexArrayObject,
    particle_buffer: WebGlBuffer,
    particle_count: i32,
}

/// Complete render pipeline for the ornament tree
pub struct RenderPipeline {
    ctx: WebGLContext,

    // Shaders
    ribbon_program: WebGlProgram,
    ornament_program: WebGlProgram,
    particle_program: WebGlProgram,

    // Uniform locations
    ribbon_uniforms: RibbonUniforms,
    ornament_uniforms: OrnamentUniforms,
    particle_uniforms: ParticleUniforms,

    geometry: Option<SceneGeometry>,

    // Dimensions
    width: i32,
    height: i32,

    // Material colors, set once from the scene config
    pub ribbon_color: Vec3,
    pub ornament_color: Vec3,
    pub topper_color: Vec3,

    pub camera_target: Vec3,
    pub fov: f32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        // Compile shaders
        let ribbon_program = ctx.create_program(RIBBON_VERTEX_SHADER, RIBBON_FRAGMENT_SHADER)?;
        let ornament_program = ctx.create_program(ORNAMENT_VERTEX_SHADER, ORNAMENT_FRAGMENT_SHADER)?;
        let particle_program = ctx.create_program(PARTICLE_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER)?;

        // Get uniform locations
        let ribbon_uniforms = RibbonUniforms {
            view: ctx.get_uniform_location(&ribbon_program, "u_view"),
            projection: ctx.get_uniform_location(&ribbon_program, "u_projection"),
            camera_pos: ctx.get_uniform_location(&ribbon_program, "u_camera_pos"),
            color: ctx.get_uniform_location(&ribbon_program, "u_color"),
        };

        let ornament_uniforms = OrnamentUniforms {
            view: ctx.get_uniform_location(&ornament_program, "u_view"),
            projection: ctx.get_uniform_location(&ornament_program, "u_projection"),
            camera_pos: ctx.get_uniform_location(&ornament_program, "u_camera_pos"),
            color: ctx.get_uniform_location(&ornament_program, "u_color"),
        };

        let particle_uniforms = ParticleUniforms {
            view: ctx.get_uniform_location(&particle_program, "u_view"),
            projection: ctx.get_uniform_location(&particle_program, "u_projection"),
            time: ctx.get_uniform_location(&particle_program, "u_time"),
        };

        Ok(Self {
            ctx,
            ribbon_program,
            ornament_program,
            particle_program,
            ribbon_uniforms,
            ornament_uniforms,
            particle_uniforms,
            geometry: None,
            width,
            height,
            ribbon_color: Vec3::new(0.85, 0.15, 0.2),
            ornament_color: Vec3::new(0.9, 0.3, 0.25),
            topper_color: Vec3::new(1.0, 0.88, 0.5),
            camera_target: Vec3::ZERO,
            fov: std::f32::consts::FRAC_PI_4,
        })
    }

    /// Upload a complete scene, replacing whatever was uploaded before. All
    /// GL objects are created first; the previous scene stays installed and
    /// renderable if any creation fails.
    ///
    /// Ribbon vertex layout: position(3) + normal(3) + uv(2). Bauble
    /// geometry layout: position(3) + normal(3). Transforms are one
    /// column-major mat4 (16 floats) per instance.
    pub fn upload_scene(
        &mut self,
        ribbons: &[(&[f32], &[u32])],
        bauble_vertices: &[f32],
        bauble_indices: &[u32],
        ornament_transforms: &[f32],
        topper_transform: &Mat4,
        particles: &[f32],
    ) -> Result<(), String> {
        let mut batches = Vec::with_capacity(ribbons.len());
        for (vertex_data, index_data) in ribbons {
            batches.push(self.create_ribbon_batch(vertex_data, index_data)?);
        }

        let gl = &self.ctx.gl;

        let geometry_buffer = self.ctx.create_buffer_f32(bauble_vertices, WebGl2RenderingContext::STATIC_DRAW)?;
        let index_buffer = self.ctx.create_index_buffer(bauble_indices, WebGl2RenderingContext::STATIC_DRAW)?;
        let instance_buffer = self.ctx.create_buffer_f32(ornament_transforms, WebGl2RenderingContext::DYNAMIC_DRAW)?;

        let ornament_vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&ornament_vao));
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        Self::bind_bauble_attribs(gl, &geometry_buffer);
        Self::bind_instance_attribs(gl, &instance_buffer);
        gl.bind_vertex_array(None);

        let topper_instance_buffer = self.ctx.create_buffer_f32(
            topper_transform.as_slice(),
            WebGl2RenderingContext::DYNAMIC_DRAW,
        )?;

        let topper_vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&topper_vao));
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));
        Self::bind_bauble_attribs(gl, &geometry_buffer);
        Self::bind_instance_attribs(gl, &topper_instance_buffer);
        gl.bind_vertex_array(None);

        let (particle_vao, particle_buffer) = self.create_particle_state(particles)?;

        self.geometry = Some(SceneGeometry {
            ribbons: batches,
            ornament_vao,
            ornament_instance_buffer: instance_buffer,
            ornament_index_count: bauble_indices.len() as i32,
            ornament_instance_count: (ornament_transforms.len() / 16) as i32,
            topper_vao,
            topper_instance_buffer,
            particle_vao,
            particle_buffer,
            particle_count: (particles.len() / 8) as i32,
        });

        Ok(())
    }

    fn create_ribbon_batch(&self, vertex_data: &[f32], index_data: &[u32]) -> Result<RibbonBatch, String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = self.ctx.create_buffer_f32(vertex_data, WebGl2RenderingContext::DYNAMIC_DRAW)?;
        let index_buffer = self.ctx.create_index_buffer(index_data, WebGl2RenderingContext::STATIC_DRAW)?;

        let stride = 8 * 4;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
        gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));

        // Position (location 0)
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, WebGl2RenderingContext::FLOAT, false, stride, 0);

        // Normal (location 1)
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, WebGl2RenderingContext::FLOAT, false, stride, 12);

        // UV (location 2)
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_with_i32(2, 2, WebGl2RenderingContext::FLOAT, false, stride, 24);

        gl.bind_vertex_array(None);

        Ok(RibbonBatch {
            vao,
            vertex_buffer,
            index_buffer,
            index_count: index_data.len() as i32,
        })
    }

    /// Point-sprite layout: position(3) + size(1) + alpha(1) + color(3)
    fn create_particle_state(&self, data: &[f32]) -> Result<(WebGlVertexArrayObject, WebGlBuffer), String> {
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = self.ctx.create_buffer_f32(data, WebGl2RenderingContext::DYNAMIC_DRAW)?;

        let stride = 8 * 4;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));

        // Position
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, WebGl2RenderingContext::FLOAT, false, stride, 0);

        // Size
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 1, WebGl2RenderingContext::FLOAT, false, stride, 12);

        // Alpha
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_with_i32(2, 1, WebGl2RenderingContext::FLOAT, false, stride, 16);

        // Color
        gl.enable_vertex_attrib_array(3);
        gl.vertex_attrib_pointer_with_i32(3, 3, WebGl2RenderingContext::FLOAT, false, stride, 20);

        gl.bind_vertex_array(None);

        Ok((vao, buffer))
    }

    fn bind_bauble_attribs(gl: &WebGl2RenderingContext, buffer: &WebGlBuffer) {
        let stride = 6 * 4;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(buffer));

        // Position (location 0)
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, WebGl2RenderingContext::FLOAT, false, stride, 0);

        // Normal (location 1)
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, WebGl2RenderingContext::FLOAT, false, stride, 12);
    }

    /// Bind a mat4 instance attribute as four vec4 columns at locations 2-5
    fn bind_instance_attribs(gl: &WebGl2RenderingContext, buffer: &WebGlBuffer) {
        let stride = 16 * 4;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(buffer));

        for column in 0..4u32 {
            let location = 2 + column;
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_with_i32(
                location,
                4,
                WebGl2RenderingContext::FLOAT,
                false,
                stride,
                (column * 16) as i32,
            );
            gl.vertex_attrib_divisor(location, 1);
        }
    }

    /// Rewrite one ribbon's vertex buffer
    pub fn update_ribbon(&mut self, batch: usize, vertex_data: &[f32]) {
        if let Some(ribbon) = self.geometry.as_ref().and_then(|g| g.ribbons.get(batch)) {
            self.ctx.update_buffer_f32(&ribbon.vertex_buffer, vertex_data);
        }
    }

    /// Rewrite the ornament instance transforms
    pub fn update_ornaments(&mut self, transforms: &[f32]) {
        if let Some(ref mut geometry) = self.geometry {
            self.ctx.update_buffer_f32(&geometry.ornament_instance_buffer, transforms);
            geometry.ornament_instance_count = (transforms.len() / 16) as i32;
        }
    }

    /// Rewrite the topper's transform
    pub fn update_topper(&mut self, transform: &Mat4) {
        if let Some(ref geometry) = self.geometry {
            self.ctx.update_buffer_f32(&geometry.topper_instance_buffer, transform.as_slice());
        }
    }

    /// Update particle buffer data
    pub fn update_particles(&mut self, data: &[f32]) {
        if let Some(ref mut geometry) = self.geometry {
            self.ctx.update_buffer_f32(&geometry.particle_buffer, data);
            geometry.particle_count = (data.len() / 8) as i32;
        }
    }

    /// Render a frame. The camera orbits the scene on its own.
    pub fn render(&self, time: f32) {
        let gl = &self.ctx.gl;

        let geometry = match self.geometry {
            Some(ref geometry) => geometry,
            None => return,
        };

        let angle = time * CAMERA_ORBIT_SPEED;
        let camera_position = Vec3::new(
            angle.cos() * CAMERA_RADIUS,
            CAMERA_HEIGHT,
            angle.sin() * CAMERA_RADIUS,
        );

        let aspect = self.width as f32 / self.height as f32;
        let projection = Mat4::perspective(self.fov, aspect, 0.1, 100.0);
        let view = Mat4::look_at(camera_position, self.camera_target, Vec3::UP);

        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(0.01, 0.02, 0.05, 1.0);
        self.ctx.enable_depth_test();
        gl.disable(WebGl2RenderingContext::BLEND);

        // Ribbons
        if !geometry.ribbons.is_empty() {
            gl.use_program(Some(&self.ribbon_program));

            self.ctx.uniform_matrix4fv(self.ribbon_uniforms.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(self.ribbon_uniforms.projection.as_ref(), projection.as_slice());
            self.ctx.uniform_3f(
                self.ribbon_uniforms.camera_pos.as_ref(),
                camera_position.x,
                camera_position.y,
                camera_position.z,
            );
            self.ctx.uniform_3f(
                self.ribbon_uniforms.color.as_ref(),
                self.ribbon_color.x,
                self.ribbon_color.y,
                self.ribbon_color.z,
            );

            for ribbon in &geometry.ribbons {
                gl.bind_vertex_array(Some(&ribbon.vao));
                gl.draw_elements_with_i32(
                    WebGl2RenderingContext::TRIANGLES,
                    ribbon.index_count,
                    WebGl2RenderingContext::UNSIGNED_INT,
                    0,
                );
            }
        }

        // Ornaments and topper share a program
        gl.use_program(Some(&self.ornament_program));

        self.ctx.uniform_matrix4fv(self.ornament_uniforms.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(self.ornament_uniforms.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_3f(
            self.ornament_uniforms.camera_pos.as_ref(),
            camera_position.x,
            camera_position.y,
            camera_position.z,
        );

        if geometry.ornament_instance_count > 0 {
            self.ctx.uniform_3f(
                self.ornament_uniforms.color.as_ref(),
                self.ornament_color.x,
                self.ornament_color.y,
                self.ornament_color.z,
            );
            gl.bind_vertex_array(Some(&geometry.ornament_vao));
            gl.draw_elements_instanced_with_i32(
                WebGl2RenderingContext::TRIANGLES,
                geometry.ornament_index_count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
                geometry.ornament_instance_count,
            );
        }

        self.ctx.uniform_3f(
            self.ornament_uniforms.color.as_ref(),
            self.topper_color.x,
            self.topper_color.y,
            self.topper_color.z,
        );
        gl.bind_vertex_array(Some(&geometry.topper_vao));
        gl.draw_elements_instanced_with_i32(
            WebGl2RenderingContext::TRIANGLES,
            geometry.ornament_index_count,
            WebGl2RenderingContext::UNSIGNED_INT,
            0,
            1,
        );

        // Particles last, glowing over everything
        if geometry.particle_count > 0 {
            gl.use_program(Some(&self.particle_program));
            gl.disable(WebGl2RenderingContext::DEPTH_TEST);
            self.ctx.enable_additive_blending();

            self.ctx.uniform_matrix4fv(self.particle_uniforms.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(self.particle_uniforms.projection.as_ref(), projection.as_slice());
            self.ctx.uniform_1f(self.particle_uniforms.time.as_ref(), time);

            gl.bind_vertex_array(Some(&geometry.particle_vao));
            gl.draw_arrays(WebGl2RenderingContext::POINTS, 0, geometry.particle_count);
        }

        gl.bind_vertex_array(None);
    }

    /// Resize the render pipeline
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }
}

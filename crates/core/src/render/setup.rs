//! The one-shot render setup: everything between "context exists" and
//! "quad is on screen".
//!
//! Runs strictly in order and stops at the first failure. Nothing here
//! loops or retries; the host calls [`render_setup`] once per mount.

use std::fmt;

use crate::config::QuadConfig;
use crate::error::SetupError;
use crate::fetch::ImageFetcher;
use crate::geometry::{quad_vertex_bytes, QUAD_LAYOUT, VERTEX_COUNT};
use crate::shaders::{FRAGMENT_SHADER, VERTEX_SHADER};

use super::gl::{QuadGl, Topology};
use super::shader::build_program;
use super::texture::{load_texture, TextureConfig};

/// Parameters of the single draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub topology: Topology,
    pub first: i32,
    pub count: i32,
}

impl DrawCall {
    /// Four vertices as a triangle fan.
    pub const QUAD: DrawCall = DrawCall {
        topology: Topology::TriangleFan,
        first: 0,
        count: VERTEX_COUNT as i32,
    };
}

/// GPU objects created by a successful setup, plus the draw it issued.
pub struct QuadScene<G: QuadGl> {
    pub program: G::Program,
    pub vertex_buffer: G::Buffer,
    pub texture: G::Texture,
    pub draw: DrawCall,
}

impl<G: QuadGl> fmt::Debug for QuadScene<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadScene")
            .field("program", &self.program)
            .field("vertex_buffer", &self.vertex_buffer)
            .field("texture", &self.texture)
            .field("draw", &self.draw)
            .finish()
    }
}

impl<G: QuadGl> QuadScene<G> {
    /// Releases the program, vertex buffer and texture.
    pub fn destroy(self, gl: &G) {
        gl.use_program(None);
        gl.delete_program(self.program);
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_texture(self.texture);
    }
}

/// Clears, builds the program, uploads the quad, loads the texture and draws.
///
/// If anything after program creation fails, the objects created so far
/// are released before the error is returned.
///
/// # Errors
///
/// Returns `SetupError::Config` before touching the context if `config`
/// fails [`QuadConfig::validate`], otherwise the first `SetupError` raised
/// by program building, buffer creation, or texture loading.
pub async fn render_setup<G, F>(
    gl: &G,
    fetcher: &F,
    config: &QuadConfig,
) -> Result<QuadScene<G>, SetupError>
where
    G: QuadGl,
    F: ImageFetcher,
{
    config.validate()?;
    let unit_index = i32::try_from(config.texture_unit).map_err(|_| {
        SetupError::Config(format!("texture unit {} out of range", config.texture_unit))
    })?;

    gl.clear_color(config.clear_color);
    gl.clear_color_buffer();

    let program = build_program(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
    log::debug!("quad program linked");

    let vertex_buffer = match gl.create_buffer() {
        Ok(buffer) => buffer,
        Err(e) => {
            gl.delete_program(program);
            return Err(SetupError::Gl(e));
        }
    };
    gl.bind_array_buffer(Some(vertex_buffer));
    gl.array_buffer_data_static(quad_vertex_bytes());

    for attr in &QUAD_LAYOUT {
        gl.vertex_attrib_pointer_f32(attr.location, attr.components, attr.stride, attr.offset);
    }
    for attr in &QUAD_LAYOUT {
        gl.enable_vertex_attrib_array(attr.location);
    }
    log::debug!("quad geometry uploaded ({} vertices)", VERTEX_COUNT);

    let texture = match load_texture(gl, fetcher, &config.image_path, &TextureConfig::default()).await
    {
        Ok(texture) => texture,
        Err(e) => {
            gl.delete_buffer(vertex_buffer);
            gl.delete_program(program);
            return Err(e);
        }
    };

    gl.active_texture(config.texture_unit);
    gl.bind_texture_2d(Some(texture));

    let sampler = gl.uniform_location(program, &config.sampler_uniform);
    if sampler.is_none() {
        log::warn!(
            "sampler uniform '{}' not found in linked program; drawing with default unit",
            config.sampler_uniform
        );
    }

    gl.use_program(Some(program));
    if let Some(location) = sampler.as_ref() {
        gl.uniform_1_i32(Some(location), unit_index);
    }

    let draw = DrawCall::QUAD;
    gl.draw_arrays(draw.topology, draw.first, draw.count);
    log::debug!("quad drawn");

    Ok(QuadScene {
        program,
        vertex_buffer,
        texture,
        draw,
    })
}

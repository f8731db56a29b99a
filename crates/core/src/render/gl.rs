//! The graphics capability surface the quad setup consumes.
//!
//! [`QuadGl`] names exactly the calls the setup sequence makes, with typed
//! enums in place of raw GL constants. `glow::Context` implements it under
//! the `render` feature; tests implement it in memory.

use std::fmt;

/// Programmable pipeline stage of a shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Primitive assembly mode for `draw_arrays`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
    /// Trilinear: linear within and between mip levels. Minification only.
    LinearMipmapLinear,
}

impl TextureFilter {
    /// Whether the filter reads from levels above 0.
    pub fn uses_mipmaps(self) -> bool {
        matches!(self, TextureFilter::LinearMipmapLinear)
    }
}

/// Operations on a single graphics context used by the quad setup.
///
/// Object creation mirrors `glow` and reports failure as a `String`.
/// Everything else is fire-and-forget, like the underlying API; errors
/// there surface through status queries, not return values.
pub trait QuadGl {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    fn clear_color(&self, rgba: [f32; 4]);
    fn clear_color_buffer(&self);

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `data` to the bound array buffer with a static-draw hint.
    fn array_buffer_data_static(&self, data: &[u8]);
    /// Describes a float attribute read from the bound array buffer.
    fn vertex_attrib_pointer_f32(&self, location: u32, components: i32, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&self, location: u32);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn create_texture(&self) -> Result<Self::Texture, String>;
    fn active_texture(&self, unit: u32);
    fn bind_texture_2d(&self, texture: Option<Self::Texture>);
    /// Whether `set_unpack_flip_y` has any effect on this context.
    fn supports_unpack_flip_y(&self) -> bool;
    fn set_unpack_flip_y(&self, flip: bool);
    fn texture_filters_2d(&self, min: TextureFilter, mag: TextureFilter);
    fn texture_wrap_clamp_2d(&self);
    /// Specifies level `level` of the bound 2D texture from RGBA8 pixels.
    fn tex_image_2d_rgba8(&self, level: i32, width: u32, height: u32, pixels: &[u8]);
    fn generate_mipmap_2d(&self);
    fn delete_texture(&self, texture: Self::Texture);

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32);

    fn draw_arrays(&self, topology: Topology, first: i32, count: i32);
}

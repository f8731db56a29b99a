//! `QuadGl` for `glow::Context`.
//!
//! Each method forwards to the matching `glow` call. Every `glow` entry
//! point is `unsafe`; the handles passed in always come from earlier calls
//! on the same context, which is the only precondition they carry.

#![allow(unsafe_code)]

use glow::HasContext;

use super::gl::{QuadGl, ShaderStage, TextureFilter, Topology};

/// `UNPACK_FLIP_Y_WEBGL` pixel-store parameter. WebGL only.
pub const UNPACK_FLIP_Y_WEBGL: u32 = 0x9240;

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn topology_enum(topology: Topology) -> u32 {
    match topology {
        Topology::Triangles => glow::TRIANGLES,
        Topology::TriangleStrip => glow::TRIANGLE_STRIP,
        Topology::TriangleFan => glow::TRIANGLE_FAN,
    }
}

fn filter_enum(filter: TextureFilter) -> i32 {
    let value = match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
        TextureFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    };
    value as i32
}

// SAFETY (all methods): arguments are handles created by this same context
// or plain enums produced by the helpers above.
impl QuadGl for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { HasContext::clear_color(self, r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        unsafe { self.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, stage_enum(stage)) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { self.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data_static(&self, data: &[u8]) {
        unsafe { self.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW) }
    }

    fn vertex_attrib_pointer_f32(&self, location: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                location,
                components,
                glow::FLOAT,
                false,
                stride,
                offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, location) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        unsafe { HasContext::create_texture(self) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn bind_texture_2d(&self, texture: Option<Self::Texture>) {
        unsafe { self.bind_texture(glow::TEXTURE_2D, texture) }
    }

    fn supports_unpack_flip_y(&self) -> bool {
        cfg!(target_arch = "wasm32")
    }

    fn set_unpack_flip_y(&self, flip: bool) {
        if self.supports_unpack_flip_y() {
            unsafe { self.pixel_store_i32(UNPACK_FLIP_Y_WEBGL, i32::from(flip)) }
        }
    }

    fn texture_filters_2d(&self, min: TextureFilter, mag: TextureFilter) {
        unsafe {
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter_enum(min));
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter_enum(mag));
        }
    }

    fn texture_wrap_clamp_2d(&self) {
        unsafe {
            self.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
        }
    }

    fn tex_image_2d_rgba8(&self, level: i32, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            self.tex_image_2d(
                glow::TEXTURE_2D,
                level,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            )
        }
    }

    fn generate_mipmap_2d(&self) {
        unsafe { self.generate_mipmap(glow::TEXTURE_2D) }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn uniform_1_i32(&self, location: Option<&Self::UniformLocation>, value: i32) {
        unsafe { HasContext::uniform_1_i32(self, location, value) }
    }

    fn draw_arrays(&self, topology: Topology, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, topology_enum(topology), first, count) }
    }
}

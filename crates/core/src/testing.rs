//! In-memory `QuadGl` and `ImageFetcher` for unit tests.
//!
//! `RecordingGl` logs every call in order and keeps enough object state to
//! answer the queries the setup makes: compile status, link status, buffer
//! contents, texture level sizes, uniform lookups.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::fetch::{FetchError, ImageFetcher};
use crate::render::gl::{QuadGl, ShaderStage, TextureFilter, Topology};

#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    ClearColor([f32; 4]),
    Clear,
    CreateShader(ShaderStage, u32),
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateBuffer(u32),
    BindArrayBuffer(Option<u32>),
    BufferData(usize),
    VertexAttribPointer {
        location: u32,
        components: i32,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    DeleteBuffer(u32),
    CreateTexture(u32),
    ActiveTexture(u32),
    BindTexture(Option<u32>),
    UnpackFlipY(bool),
    TextureFilters(TextureFilter, TextureFilter),
    TextureWrapClamp,
    TexImage2D { level: i32, width: u32, height: u32 },
    GenerateMipmap,
    DeleteTexture(u32),
    UniformLocation(String),
    Uniform1i(Option<u32>, i32),
    DrawArrays(Topology, i32, i32),
}

#[derive(Debug, Default)]
struct ShaderObject {
    stage: Option<ShaderStage>,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TextureObject {
    pub levels: BTreeMap<i32, (u32, u32)>,
    pub level0_pixels: Vec<u8>,
    pub flipped_on_upload: bool,
    pub mipmaps_generated: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    calls: Vec<GlCall>,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    buffers: HashMap<u32, Vec<u8>>,
    textures: HashMap<u32, TextureObject>,
    bound_buffer: Option<u32>,
    bound_texture: Option<u32>,
    flip_y: bool,
}

impl State {
    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct RecordingGl {
    state: RefCell<State>,
    flip_supported: bool,
    fail_texture_creation: bool,
}

impl RecordingGl {
    /// A context that behaves like WebGL: flip-on-upload is honored.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State::default()),
            flip_supported: true,
            fail_texture_creation: false,
        }
    }

    /// A context without `UNPACK_FLIP_Y_WEBGL`, like desktop GL.
    pub fn without_flip_support() -> Self {
        Self {
            flip_supported: false,
            ..Self::new()
        }
    }

    pub fn failing_texture_creation() -> Self {
        Self {
            fail_texture_creation: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&GlCall) -> bool) -> Option<usize> {
        self.state.borrow().calls.iter().position(pred)
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.state.borrow().buffers.get(&buffer).cloned()
    }

    pub fn texture_level(&self, texture: u32, level: i32) -> Option<(u32, u32)> {
        self.state
            .borrow()
            .textures
            .get(&texture)
            .and_then(|t| t.levels.get(&level).copied())
    }

    pub fn with_texture<R>(&self, texture: u32, f: impl FnOnce(&TextureObject) -> R) -> Option<R> {
        self.state.borrow().textures.get(&texture).map(f)
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn texture_count(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub fn is_linked(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Default for RecordingGl {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts a source when it has a `main` entry point and balanced braces.
fn check_syntax(source: &str) -> Result<(), String> {
    if !source.contains("void main(") {
        return Err("ERROR: 0:1: 'main' : function not found".to_string());
    }
    let open = source.matches('{').count();
    let close = source.matches('}').count();
    if open != close {
        return Err(format!(
            "ERROR: 0:1: syntax error: {open} '{{' vs {close} '}}'"
        ));
    }
    Ok(())
}

/// Names declared as `<qualifier> <type> <name>;` at the start of a line.
fn declared(source: &str, qualifier: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(qualifier)?.strip_prefix(' '))
        .filter_map(|rest| rest.split_whitespace().nth(1))
        .map(|name| name.trim_end_matches(';').to_string())
        .collect()
}

impl QuadGl for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type Texture = u32;
    type UniformLocation = u32;

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(GlCall::ClearColor(rgba));
    }

    fn clear_color_buffer(&self) {
        self.record(GlCall::Clear);
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.alloc();
        st.shaders.insert(
            id,
            ShaderObject {
                stage: Some(stage),
                ..ShaderObject::default()
            },
        );
        st.calls.push(GlCall::CreateShader(stage, id));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut st = self.state.borrow_mut();
        if let Some(s) = st.shaders.get_mut(&shader) {
            s.source = source.to_string();
        }
        st.calls.push(GlCall::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: u32) {
        let mut st = self.state.borrow_mut();
        if let Some(s) = st.shaders.get_mut(&shader) {
            match check_syntax(&s.source) {
                Ok(()) => s.compiled = true,
                Err(log) => {
                    s.compiled = false;
                    s.log = log;
                }
            }
        }
        st.calls.push(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        let mut st = self.state.borrow_mut();
        st.shaders.remove(&shader);
        st.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.alloc();
        st.programs.insert(id, ProgramObject::default());
        st.calls.push(GlCall::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut st = self.state.borrow_mut();
        if let Some(p) = st.programs.get_mut(&program) {
            p.attached.push(shader);
        }
        st.calls.push(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut st = self.state.borrow_mut();
        if let Some(p) = st.programs.get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
        st.calls.push(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        let mut st = self.state.borrow_mut();
        st.calls.push(GlCall::LinkProgram(program));

        let attached = match st.programs.get(&program) {
            Some(p) => p.attached.clone(),
            None => return,
        };
        let find = |stage: ShaderStage| {
            attached
                .iter()
                .filter_map(|id| st.shaders.get(id))
                .find(|s| s.stage == Some(stage) && s.compiled)
                .map(|s| s.source.clone())
        };
        let result = match (find(ShaderStage::Vertex), find(ShaderStage::Fragment)) {
            (Some(vs), Some(fs)) => {
                let outputs = declared(&vs, "out");
                match declared(&fs, "in").into_iter().find(|v| !outputs.contains(v)) {
                    Some(missing) => Err(format!(
                        "ERROR: fragment input '{missing}' is not written by the vertex shader"
                    )),
                    None => {
                        let mut uniforms = declared(&vs, "uniform");
                        uniforms.extend(declared(&fs, "uniform"));
                        Ok(uniforms)
                    }
                }
            }
            _ => Err("ERROR: program needs a compiled vertex and fragment shader".to_string()),
        };

        if let Some(p) = st.programs.get_mut(&program) {
            match result {
                Ok(uniforms) => {
                    p.linked = true;
                    p.uniforms = uniforms;
                }
                Err(log) => {
                    p.linked = false;
                    p.log = log;
                }
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.is_linked(program)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        let mut st = self.state.borrow_mut();
        st.programs.remove(&program);
        st.calls.push(GlCall::DeleteProgram(program));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let mut st = self.state.borrow_mut();
        let id = st.alloc();
        st.buffers.insert(id, Vec::new());
        st.calls.push(GlCall::CreateBuffer(id));
        Ok(id)
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        let mut st = self.state.borrow_mut();
        st.bound_buffer = buffer;
        st.calls.push(GlCall::BindArrayBuffer(buffer));
    }

    fn array_buffer_data_static(&self, data: &[u8]) {
        let mut st = self.state.borrow_mut();
        if let Some(id) = st.bound_buffer {
            st.buffers.insert(id, data.to_vec());
        }
        st.calls.push(GlCall::BufferData(data.len()));
    }

    fn vertex_attrib_pointer_f32(&self, location: u32, components: i32, stride: i32, offset: i32) {
        self.record(GlCall::VertexAttribPointer {
            location,
            components,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&self, location: u32) {
        self.record(GlCall::EnableVertexAttribArray(location));
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut st = self.state.borrow_mut();
        st.buffers.remove(&buffer);
        st.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn create_texture(&self) -> Result<u32, String> {
        if self.fail_texture_creation {
            return Err("texture limit reached".to_string());
        }
        let mut st = self.state.borrow_mut();
        let id = st.alloc();
        st.textures.insert(id, TextureObject::default());
        st.calls.push(GlCall::CreateTexture(id));
        Ok(id)
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture_2d(&self, texture: Option<u32>) {
        let mut st = self.state.borrow_mut();
        st.bound_texture = texture;
        st.calls.push(GlCall::BindTexture(texture));
    }

    fn supports_unpack_flip_y(&self) -> bool {
        self.flip_supported
    }

    fn set_unpack_flip_y(&self, flip: bool) {
        let mut st = self.state.borrow_mut();
        st.flip_y = flip && self.flip_supported;
        st.calls.push(GlCall::UnpackFlipY(flip));
    }

    fn texture_filters_2d(&self, min: TextureFilter, mag: TextureFilter) {
        self.record(GlCall::TextureFilters(min, mag));
    }

    fn texture_wrap_clamp_2d(&self) {
        self.record(GlCall::TextureWrapClamp);
    }

    fn tex_image_2d_rgba8(&self, level: i32, width: u32, height: u32, pixels: &[u8]) {
        let mut st = self.state.borrow_mut();
        let flip = st.flip_y;
        if let Some(id) = st.bound_texture {
            if let Some(t) = st.textures.get_mut(&id) {
                t.levels.insert(level, (width, height));
                if level == 0 {
                    t.level0_pixels = pixels.to_vec();
                    t.flipped_on_upload = flip;
                }
            }
        }
        st.calls.push(GlCall::TexImage2D {
            level,
            width,
            height,
        });
    }

    fn generate_mipmap_2d(&self) {
        let mut st = self.state.borrow_mut();
        if let Some(id) = st.bound_texture {
            if let Some(t) = st.textures.get_mut(&id) {
                if let Some(&(mut w, mut h)) = t.levels.get(&0) {
                    let mut level = 0;
                    while w > 1 || h > 1 {
                        w = (w / 2).max(1);
                        h = (h / 2).max(1);
                        level += 1;
                        t.levels.insert(level, (w, h));
                    }
                    t.mipmaps_generated = true;
                }
            }
        }
        st.calls.push(GlCall::GenerateMipmap);
    }

    fn delete_texture(&self, texture: u32) {
        let mut st = self.state.borrow_mut();
        st.textures.remove(&texture);
        st.calls.push(GlCall::DeleteTexture(texture));
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let mut st = self.state.borrow_mut();
        st.calls.push(GlCall::UniformLocation(name.to_string()));
        let p = st.programs.get(&program)?;
        if !p.linked {
            return None;
        }
        p.uniforms
            .iter()
            .position(|u| u == name)
            .map(|i| program * 100 + i as u32)
    }

    fn uniform_1_i32(&self, location: Option<&u32>, value: i32) {
        self.record(GlCall::Uniform1i(location.copied(), value));
    }

    fn draw_arrays(&self, topology: Topology, first: i32, count: i32) {
        self.record(GlCall::DrawArrays(topology, first, count));
    }
}

/// Serves fixed bodies by URL; anything else is a 404.
#[derive(Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
    offline: bool,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, url: &str, body: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), body);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl ImageFetcher for MemoryFetcher {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        if self.offline {
            return Err(FetchError::Network {
                url: url.to_string(),
                reason: "network unreachable".to_string(),
            });
        }
        self.files.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::{FRAGMENT_SHADER, VERTEX_SHADER};

    #[test]
    fn declared_finds_qualified_names() {
        assert_eq!(declared(VERTEX_SHADER, "out"), vec!["v_tex_coord"]);
        assert_eq!(declared(FRAGMENT_SHADER, "in"), vec!["v_tex_coord"]);
        assert_eq!(declared(FRAGMENT_SHADER, "uniform"), vec!["u_texture"]);
        assert!(declared(VERTEX_SHADER, "in").is_empty());
    }

    #[test]
    fn syntax_check_rejects_unbalanced_braces() {
        assert!(check_syntax("void main() {").is_err());
        assert!(check_syntax("void main() {}").is_ok());
        assert!(check_syntax("int x;").is_err());
    }

    #[test]
    fn generate_mipmap_fills_chain() {
        let gl = RecordingGl::new();
        let tex = gl.create_texture().unwrap();
        gl.bind_texture_2d(Some(tex));
        gl.tex_image_2d_rgba8(0, 8, 2, &[0; 64]);
        gl.generate_mipmap_2d();
        assert_eq!(gl.texture_level(tex, 3), Some((1, 1)));
        assert_eq!(gl.texture_level(tex, 4), None);
    }
}

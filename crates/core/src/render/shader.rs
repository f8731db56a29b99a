//! Shader compilation and program linking.
//!
//! [`build_program`] compiles a vertex and a fragment stage and links them.
//! Shader objects never outlive the call: they are detached and deleted
//! after the link attempt whether it succeeds or not, and a program that
//! fails to link is deleted before the error is returned.

use thiserror::Error;

use super::gl::{QuadGl, ShaderStage};

/// Errors that can occur during shader compilation or program linking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        stage: ShaderStage,
        /// Numbered source followed by the driver's info log.
        log: String,
    },
    /// The program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

#[cfg(test)]
impl ShaderError {
    pub(crate) fn stage(&self) -> Option<ShaderStage> {
        match self {
            ShaderError::CompileError { stage, .. } => Some(*stage),
            ShaderError::LinkError(_) => None,
        }
    }
}

/// Formats a shader compilation error for human-readable debugging.
///
/// Prepends right-aligned line numbers to each line of `source`, then
/// appends the driver's error `log`. Driver logs cite line numbers, so
/// this puts the offending GLSL next to them.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let source_lines: Vec<&str> = source.lines().collect();
    let width = source_lines.len().max(1).to_string().len();

    let numbered = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// On failure the shader object is deleted before returning.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` if the context cannot create the
/// shader or the GLSL source fails to compile.
pub fn compile_shader<G: QuadGl>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, ShaderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|log| ShaderError::CompileError { stage, log })?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if gl.shader_compile_status(shader) {
        return Ok(shader);
    }

    let info_log = gl.shader_info_log(shader);
    gl.delete_shader(shader);
    log::debug!("{stage} shader failed to compile");
    Err(ShaderError::CompileError {
        stage,
        log: format_shader_error(source, &info_log),
    })
}

/// Links a compiled vertex and fragment shader into a program.
///
/// Both shaders are detached after the link call; the caller still owns
/// and must delete them. A program that fails to link is deleted.
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if the program cannot be created or
/// linking fails.
pub fn link_program<G: QuadGl>(
    gl: &G,
    vertex: G::Shader,
    fragment: G::Shader,
) -> Result<G::Program, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::LinkError)?;

    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);

    if gl.program_link_status(program) {
        return Ok(program);
    }

    let info_log = gl.program_info_log(program);
    gl.delete_program(program);
    Err(ShaderError::LinkError(info_log))
}

/// Compiles both stages and links them into a program.
///
/// Shader handles are released after the link attempt regardless of the
/// outcome. If the fragment stage fails, the compiled vertex shader is
/// released too.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` naming the failing stage, or
/// `ShaderError::LinkError` with the driver's link log.
pub fn build_program<G: QuadGl>(
    gl: &G,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<G::Program, ShaderError> {
    let vert = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let frag = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            gl.delete_shader(vert);
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    gl.delete_shader(vert);
    gl.delete_shader(frag);

    result
}

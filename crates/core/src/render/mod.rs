//! Graphics-side setup for the textured quad.
//!
//! Everything here is written against the [`QuadGl`] capability trait, so
//! it runs unchanged on a browser WebGL2 context and in unit tests. The
//! `glow::Context` implementation is only compiled with the `render`
//! feature.
//!
//! # Module overview
//!
//! - [`gl`] -- The capability trait and its typed enums.
//! - [`shader`] -- Shader compilation, linking, and error formatting.
//! - [`texture`] -- Image texture fetch, decode and upload.
//! - [`setup`] -- The ordered one-shot setup sequence and its draw call.
//! - `context` -- `QuadGl` for `glow::Context` (`render` feature).

#[cfg(feature = "render")]
pub mod context;
pub mod gl;
pub mod setup;
pub mod shader;
pub mod texture;

pub use gl::{QuadGl, ShaderStage, TextureFilter, Topology};
pub use setup::{render_setup, DrawCall, QuadScene};
pub use shader::{build_program, compile_shader, format_shader_error, link_program, ShaderError};
pub use texture::{load_texture, upload_texture, TextureConfig};

//! GLSL ES 3.0 sources for the textured quad program.
//!
//! Attribute locations are fixed with `layout(location = N)` so they match
//! the vertex layout in [`crate::geometry`] without a post-link lookup.

/// Name of the sampler uniform in [`FRAGMENT_SHADER`].
pub const SAMPLER_UNIFORM: &str = "u_texture";

/// Passes position through and forwards the texture coordinate.
pub const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_pos;
layout(location = 1) in vec2 a_tex_coord;
out vec2 v_tex_coord;
void main() {
    gl_Position = vec4(a_pos, 1.0);
    v_tex_coord = a_tex_coord;
}
"#;

/// Samples the bound 2D texture at the interpolated coordinate.
pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
in vec2 v_tex_coord;
uniform sampler2D u_texture;
out vec4 frag_color;
void main() {
    frag_color = texture(u_texture, v_tex_coord);
}
"#;

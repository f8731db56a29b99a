//! Quad geometry and its interleaved vertex layout.
//!
//! Four vertices, each `[x, y, z, u, v]`, drawn as a triangle fan. The
//! buffer is uploaded once and never modified.

/// Floats per vertex: 3 position + 2 texture coordinate.
pub const FLOATS_PER_VERTEX: usize = 5;

/// Number of vertices in the quad.
pub const VERTEX_COUNT: usize = 4;

/// Byte distance between consecutive vertices.
pub const VERTEX_STRIDE: i32 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as i32;

/// Interleaved quad data, counter-clockwise from bottom-left.
#[rustfmt::skip]
pub const QUAD_VERTICES: [f32; FLOATS_PER_VERTEX * VERTEX_COUNT] = [
    // positions         // texture coordinates
    -0.5, -0.5, 0.0,     0.0, 0.0,
     0.5, -0.5, 0.0,     1.0, 0.0,
     0.5,  0.5, 0.0,     1.0, 1.0,
    -0.5,  0.5, 0.0,     0.0, 1.0,
];

/// One float vertex attribute inside the interleaved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute slot, matching `layout(location = N)` in the vertex shader.
    pub location: u32,
    /// Number of float components.
    pub components: i32,
    /// Byte stride between vertices.
    pub stride: i32,
    /// Byte offset of the first component inside a vertex.
    pub offset: i32,
}

pub const POSITION_ATTRIBUTE: VertexAttribute = VertexAttribute {
    location: 0,
    components: 3,
    stride: VERTEX_STRIDE,
    offset: 0,
};

pub const TEX_COORD_ATTRIBUTE: VertexAttribute = VertexAttribute {
    location: 1,
    components: 2,
    stride: VERTEX_STRIDE,
    offset: 3 * std::mem::size_of::<f32>() as i32,
};

/// Both attributes in slot order.
pub const QUAD_LAYOUT: [VertexAttribute; 2] = [POSITION_ATTRIBUTE, TEX_COORD_ATTRIBUTE];

/// The quad data as the native-endian bytes handed to the buffer upload.
pub fn quad_vertex_bytes() -> &'static [u8] {
    static DATA: [f32; FLOATS_PER_VERTEX * VERTEX_COUNT] = QUAD_VERTICES;
    bytemuck::cast_slice(&DATA)
}

/// Reads one attribute of one vertex back out of an uploaded byte buffer.
///
/// Returns `None` if the requested range falls outside `bytes`.
#[cfg(test)]
pub(crate) fn read_attribute(bytes: &[u8], attribute: &VertexAttribute, vertex: usize) -> Option<Vec<f32>> {
    let float_size = std::mem::size_of::<f32>();
    let start = vertex * attribute.stride as usize + attribute.offset as usize;
    let end = start + attribute.components as usize * float_size;
    let slice = bytes.get(start..end)?;
    Some(
        slice
            .chunks_exact(float_size)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

#![deny(unsafe_code)]
//! Core logic for drawing one textured quad.
//!
//! Builds a shader program, uploads quad geometry, fetches and decodes an
//! image into a mipmapped texture, and issues a single triangle-fan draw.
//! The graphics context and the HTTP client are reached through the
//! [`QuadGl`] and [`ImageFetcher`] traits; the browser host supplies both.

pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod mount;
pub mod render;
pub mod shaders;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{PowerPreference, QuadConfig};
pub use decode::{decode_image, DecodedImage};
pub use error::SetupError;
pub use fetch::{FetchError, ImageFetcher};
pub use mount::{MountHook, MountState};
pub use render::{render_setup, QuadGl, QuadScene, ShaderError};

//! Error types for the textured quad setup.

use thiserror::Error;

use crate::fetch::FetchError;
use crate::render::shader::ShaderError;

/// Errors produced while running the one-shot render setup.
///
/// Every variant is terminal for the current setup attempt. Nothing is
/// retried; the host decides how to surface the message.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A shader failed to compile or the program failed to link.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// The image could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched bytes were not a decodable image.
    #[error("image decode error: {reason}")]
    Decode { reason: String },

    /// The graphics context refused to create an object.
    #[error("graphics context error: {0}")]
    Gl(String),

    /// The host passed configuration that could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SetupError {
    /// Shorthand for a [`SetupError::Decode`] from any displayable reason.
    pub fn decode(reason: impl std::fmt::Display) -> Self {
        SetupError::Decode {
            reason: reason.to_string(),
        }
    }
}

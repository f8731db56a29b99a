//! Host-supplied configuration for the quad setup.
//!
//! The browser host passes an optional JSON object. Every field has a
//! default, so `{}` and the empty string both produce [`QuadConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Highest texture unit index accepted. WebGL2 guarantees at least 32
/// combined units.
pub const MAX_TEXTURE_UNIT: u32 = 31;

/// Power preference hint passed when the host creates the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    #[default]
    HighPerformance,
    LowPower,
    Default,
}

impl PowerPreference {
    /// The string WebGL context attributes expect.
    pub fn as_str(self) -> &'static str {
        match self {
            PowerPreference::HighPerformance => "high-performance",
            PowerPreference::LowPower => "low-power",
            PowerPreference::Default => "default",
        }
    }
}

/// Settings for one render setup run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadConfig {
    /// Image path relative to `/images/`.
    pub image_path: String,
    /// RGBA clear color in [0, 1].
    pub clear_color: [f32; 4],
    pub power_preference: PowerPreference,
    /// Name of the sampler uniform in the fragment shader.
    pub sampler_uniform: String,
    /// Texture unit the sampler reads from.
    pub texture_unit: u32,
    /// Minimum log level for the host logger (`error` .. `trace`).
    pub log_level: String,
}

impl Default for QuadConfig {
    fn default() -> Self {
        Self {
            image_path: "blazor.png".to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            power_preference: PowerPreference::HighPerformance,
            sampler_uniform: crate::shaders::SAMPLER_UNIFORM.to_string(),
            texture_unit: 0,
            log_level: "info".to_string(),
        }
    }
}

impl QuadConfig {
    /// Parses a JSON object, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::Config` if the text is not valid JSON for this
    /// shape, names an unknown log level, or picks a texture unit above
    /// [`MAX_TEXTURE_UNIT`].
    pub fn from_json(text: &str) -> Result<Self, SetupError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_json::from_str(text).map_err(|e| SetupError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the fields serde cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::Config` for an unknown log level or a texture
    /// unit above [`MAX_TEXTURE_UNIT`].
    pub fn validate(&self) -> Result<(), SetupError> {
        self.level_filter()?;
        if self.texture_unit > MAX_TEXTURE_UNIT {
            return Err(SetupError::Config(format!(
                "texture unit {} exceeds maximum {MAX_TEXTURE_UNIT}",
                self.texture_unit
            )));
        }
        Ok(())
    }

    /// Resolves `log_level` to a `log` filter.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::Config` for an unrecognized level name.
    pub fn level_filter(&self) -> Result<log::LevelFilter, SetupError> {
        self.log_level
            .parse()
            .map_err(|_| SetupError::Config(format!("unknown log level '{}'", self.log_level)))
    }
}

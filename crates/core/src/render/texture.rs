//! Image texture loading: fetch, decode, upload, mipmap.
//!
//! [`load_texture`] is the whole pipeline. The fetch and decode both finish
//! before any texture object exists, so a missing or corrupt image never
//! leaves a half-initialized texture behind.

use crate::decode::{decode_image, flip_rows, mip_level_count, DecodedImage};
use crate::error::SetupError;
use crate::fetch::{image_url, ImageFetcher};

use super::gl::{QuadGl, TextureFilter};

/// Sampling and upload options for an image texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    /// Flip rows so the image's top-left origin lands at GL's bottom-left.
    pub flip_y: bool,
    pub generate_mipmaps: bool,
}

impl TextureConfig {
    /// Trilinear minification, linear magnification, flipped, full mip chain.
    pub fn mipmapped() -> Self {
        Self {
            min_filter: TextureFilter::LinearMipmapLinear,
            mag_filter: TextureFilter::Linear,
            flip_y: true,
            generate_mipmaps: true,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self::mipmapped()
    }
}

/// Uploads decoded pixels into a new 2D texture at mip level 0.
///
/// The flip option is applied before the upload call: through the
/// context's unpack state when it supports that, otherwise by reordering
/// rows on the CPU. The texture is left bound on return.
///
/// # Errors
///
/// Returns `SetupError::Gl` if the context cannot create the texture, or
/// `SetupError::Config` if a mipmapped min filter is requested without
/// mipmap generation.
pub fn upload_texture<G: QuadGl>(
    gl: &G,
    image: &DecodedImage,
    config: &TextureConfig,
) -> Result<G::Texture, SetupError> {
    if config.min_filter.uses_mipmaps() && !config.generate_mipmaps {
        return Err(SetupError::Config(
            "mipmapped min filter requires generate_mipmaps".to_string(),
        ));
    }

    let texture = gl.create_texture().map_err(SetupError::Gl)?;
    gl.bind_texture_2d(Some(texture));
    gl.texture_wrap_clamp_2d();
    gl.texture_filters_2d(config.min_filter, config.mag_filter);

    let flip_on_cpu = config.flip_y && !gl.supports_unpack_flip_y();
    if flip_on_cpu {
        gl.set_unpack_flip_y(false);
        let mut pixels = image.pixels().to_vec();
        flip_rows(&mut pixels, image.row_bytes());
        gl.tex_image_2d_rgba8(0, image.width(), image.height(), &pixels);
    } else {
        gl.set_unpack_flip_y(config.flip_y);
        gl.tex_image_2d_rgba8(0, image.width(), image.height(), image.pixels());
    }

    if config.generate_mipmaps {
        gl.generate_mipmap_2d();
    }

    Ok(texture)
}

/// Fetches `/images/{path}`, decodes it and uploads it as a texture.
///
/// # Errors
///
/// Returns `SetupError::Fetch` if the image cannot be retrieved,
/// `SetupError::Decode` if the body is not a valid image, or
/// `SetupError::Gl` if the texture cannot be created.
pub async fn load_texture<G, F>(
    gl: &G,
    fetcher: &F,
    path: &str,
    config: &TextureConfig,
) -> Result<G::Texture, SetupError>
where
    G: QuadGl,
    F: ImageFetcher,
{
    let url = image_url(path);
    log::debug!("fetching {url}");
    let bytes = fetcher.get(&url).await?;

    let image = decode_image(&bytes)?;
    let texture = upload_texture(gl, &image, config)?;

    let levels = if config.generate_mipmaps {
        mip_level_count(image.width(), image.height())
    } else {
        1
    };
    log::info!(
        "uploaded {url} as {}x{} texture ({levels} mip levels)",
        image.width(),
        image.height()
    );

    Ok(texture)
}

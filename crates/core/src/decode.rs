//! Image decoding into a tightly packed RGBA8 pixel buffer.
//!
//! Pixels are row-major with the origin at the top-left, as image files
//! store them. Flipping for the GL bottom-left origin happens at upload.

use crate::error::SetupError;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A decoded image ready for texture upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wraps an existing RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::Decode` if either dimension is zero or the
    /// buffer length is not `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, SetupError> {
        if width == 0 || height == 0 {
            return Err(SetupError::decode(format!(
                "image has zero dimension ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(SetupError::decode(format!(
                "RGBA buffer is {} bytes, expected {expected} for {width}x{height}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 bytes, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes in one pixel row.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }
}

/// Decodes an encoded image (PNG or JPEG) into RGBA8.
///
/// The format is guessed from the byte signature, not from a file name.
///
/// # Errors
///
/// Returns `SetupError::Decode` if the bytes are not a supported image or
/// the image has a zero dimension.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, SetupError> {
    let img = image::load_from_memory(bytes).map_err(SetupError::decode)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba(width, height, rgba.into_raw())
}

/// Reverses the row order of a packed pixel buffer in place.
///
/// Used when the context cannot flip on upload itself. A buffer whose
/// length is not a multiple of `row_bytes` is left untouched.
pub fn flip_rows(pixels: &mut [u8], row_bytes: usize) {
    if row_bytes == 0 || pixels.len() % row_bytes != 0 {
        return;
    }
    let rows = pixels.len() / row_bytes;
    for top in 0..rows / 2 {
        let bottom = rows - 1 - top;
        let (upper, lower) = pixels.split_at_mut(bottom * row_bytes);
        upper[top * row_bytes..(top + 1) * row_bytes].swap_with_slice(&mut lower[..row_bytes]);
    }
}

/// Number of levels in a full mipmap chain for the given size.
///
/// `floor(log2(max(width, height))) + 1`; a zero-sized texture has none.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height);
    if largest == 0 {
        0
    } else {
        u32::BITS - largest.leading_zeros()
    }
}

#[cfg(test)]
pub(crate) fn encode_png(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| image::Rgba(pixel(x, y)));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

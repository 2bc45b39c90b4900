//! Final resampling to the requested output size
//!
//! Uses a triangle (linear) filter, which averages over the source footprint
//! when shrinking. Color is weighted by opacity while filtering: a stroke next
//! to transparent pixels keeps its color and only loses alpha, and fully
//! transparent regions stay fully transparent.

use super::canvas::{Canvas, TRANSPARENT};
use crate::{Result, WaveformError};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba, RgbaImage};

/// Filter used for the final pass
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// Normalized RGBA with color multiplied by alpha
type PremultipliedImage = ImageBuffer<Rgba<f32>, Vec<f32>>;

fn premultiply(image: &RgbaImage) -> PremultipliedImage {
    PremultipliedImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0.map(|c| c as f32 / 255.0);
        Rgba([r * a, g * a, b * a, a])
    })
}

fn unpremultiply(image: &PremultipliedImage) -> RgbaImage {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = to_u8(a);
        if alpha == 0 {
            return TRANSPARENT;
        }
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), alpha])
    })
}

/// Consume the logical canvas and produce an independent `width x height` buffer
pub fn resample(canvas: Canvas, width: u32, height: u32) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(WaveformError::InvalidConfig(format!(
            "output size must be non-zero, got {width}x{height}"
        )));
    }

    let source = canvas.into_image();
    if source.dimensions() == (width, height) {
        return Ok(source);
    }

    let resized = imageops::resize(&premultiply(&source), width, height, RESAMPLE_FILTER);
    Ok(unpremultiply(&resized))
}

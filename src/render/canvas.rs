//! Logical canvas
//!
//! One column per retained point and one band of `channel_height` rows per
//! channel. Drawing outside the buffer is clipped silently.

use super::config::Rgb;
use crate::{Result, WaveformError};
use image::{Rgba, RgbaImage};

/// Fully transparent pixel
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Full-detail drawing surface shared by all channel passes
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    channel_height: u32,
    channels: u32,
}

impl Canvas {
    /// Allocate and fill the background
    ///
    /// `background = None` leaves every pixel fully transparent.
    pub fn new(width: u32, channel_height: u32, channels: u32, background: Option<Rgb>) -> Result<Self> {
        if width == 0 || channel_height == 0 || channels == 0 {
            return Err(WaveformError::InvalidConfig(format!(
                "canvas dimensions must be non-zero: {width} x {channel_height} x {channels} channels"
            )));
        }
        let height = channel_height.checked_mul(channels).ok_or_else(|| {
            WaveformError::InvalidConfig(format!(
                "canvas height overflows: {channel_height} x {channels}"
            ))
        })?;

        let fill = background.map(|c| Rgba(c.to_rgba())).unwrap_or(TRANSPARENT);
        Ok(Canvas {
            image: RgbaImage::from_pixel(width, height, fill),
            channel_height,
            channels,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels (all channel bands)
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Height of one channel band
    pub fn channel_height(&self) -> u32 {
        self.channel_height
    }

    /// Number of channel bands
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Pixel at (x, y), `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Draw an opaque vertical line between `y1` and `y2` (inclusive, any order)
    pub fn vertical_line(&mut self, x: i64, y1: i64, y2: i64, color: Rgb) {
        if x < 0 || x >= self.width() as i64 {
            return;
        }
        let top = y1.min(y2).max(0);
        let bottom = y1.max(y2).min(self.height() as i64 - 1);
        if top > bottom {
            return;
        }

        let pixel = Rgba(color.to_rgba());
        for y in top..=bottom {
            self.image.put_pixel(x as u32, y as u32, pixel);
        }
    }

    /// Borrow the underlying buffer
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Give up the canvas, keeping its buffer
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_height_is_band_times_channels() {
        let mono = Canvas::new(10, 50, 1, None).unwrap();
        assert_eq!(mono.height(), 50);
        let stereo = Canvas::new(10, 50, 2, None).unwrap();
        assert_eq!(stereo.height(), 100);
        assert_eq!(stereo.channel_height(), 50);
        assert_eq!(stereo.channels(), 2);
    }

    #[test]
    fn test_background_fill() {
        let clear = Canvas::new(3, 3, 1, None).unwrap();
        assert!(clear.as_image().pixels().all(|p| *p == TRANSPARENT));

        let solid = Canvas::new(3, 3, 1, Some(Rgb::new(1, 2, 3))).unwrap();
        assert!(solid.as_image().pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(Canvas::new(0, 10, 1, None).is_err());
        assert!(Canvas::new(10, 0, 1, None).is_err());
        assert!(Canvas::new(10, 10, 0, None).is_err());
    }

    #[test]
    fn test_vertical_line_inclusive_and_unordered() {
        let mut canvas = Canvas::new(4, 10, 1, None).unwrap();
        canvas.vertical_line(1, 7, 3, RED);
        for y in 0..10 {
            let expected = (3..=7).contains(&y);
            assert_eq!(canvas.pixel(1, y) == Some(Rgba([255, 0, 0, 255])), expected, "y {y}");
        }
        assert_eq!(canvas.pixel(0, 5), Some(TRANSPARENT));
    }

    #[test]
    fn test_vertical_line_clipping() {
        let mut canvas = Canvas::new(4, 10, 1, None).unwrap();
        canvas.vertical_line(-1, 0, 9, RED);
        canvas.vertical_line(4, 0, 9, RED);
        assert!(canvas.as_image().pixels().all(|p| *p == TRANSPARENT));

        canvas.vertical_line(2, -20, 40, RED);
        assert!((0..10).all(|y| canvas.pixel(2, y) == Some(Rgba([255, 0, 0, 255]))));

        canvas.vertical_line(3, 15, 30, RED);
        assert!((0..10).all(|y| canvas.pixel(3, y) == Some(TRANSPARENT)));
    }
}

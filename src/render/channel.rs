//! Channel stroke geometry
//!
//! Maps one retained point to a vertical stroke inside its channel band.
//! Channels are numbered from 1; channel `n` owns rows
//! `[(n - 1) * h, n * h)` where `h` is the band height.
//!
//! Columns come from the point counters as they stand after the point is
//! read: `(index + 1) / detail` for waveforms, plus `retained + 1` for bars.
//! Bars start on row `h` whatever the channel and end at `band_top + v`, so
//! the second channel's bars hang into the top of its band.

use super::canvas::Canvas;
use super::color::resolve_color;
use super::config::{DrawStyle, RenderConfig};
use crate::pcm::SamplePoint;

/// Bars never end above this row
pub const MIN_BAR_END: i64 = 5;

/// Vertical stroke in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    /// Column
    pub x: i64,
    /// First row
    pub y1: i64,
    /// Last row
    pub y2: i64,
}

/// Amplitude scaled to the band height: `floor(amplitude / 255 * h)`
pub fn scaled_amplitude(amplitude: u8, channel_height: u32) -> i64 {
    (amplitude as i64 * channel_height as i64) / u8::MAX as i64
}

/// Stroke for `point` in channel `channel` (1-based)
pub fn stroke_for(
    style: DrawStyle,
    point: &SamplePoint,
    detail: u32,
    channel_height: u32,
    channel: u32,
) -> Stroke {
    let h = channel_height as i64;
    let v = scaled_amplitude(point.amplitude, channel_height);
    // both counters have already moved past the point when it is drawn
    let column = ((point.index + 1) / detail.max(1) as u64) as i64;

    match style {
        DrawStyle::Bars => {
            let band_top = h * (channel as i64 - 1);
            Stroke {
                x: column + point.retained as i64 + 1,
                y1: h,
                y2: (band_top + v).max(MIN_BAR_END),
            }
        }
        DrawStyle::Waveform => {
            let band_bottom = h * channel as i64;
            Stroke {
                x: column,
                y1: band_bottom - v,
                y2: band_bottom - (h - v),
            }
        }
    }
}

/// Draws the points of one channel into the shared canvas
pub struct ChannelRenderer<'a> {
    canvas: &'a mut Canvas,
    config: &'a RenderConfig,
    channel: u32,
    drawn: u64,
}

impl<'a> ChannelRenderer<'a> {
    /// Renderer for channel `channel` (1-based)
    pub fn new(canvas: &'a mut Canvas, config: &'a RenderConfig, channel: u32) -> Self {
        ChannelRenderer {
            canvas,
            config,
            channel,
            drawn: 0,
        }
    }

    /// Draw one retained point
    pub fn draw_point(&mut self, point: &SamplePoint) {
        let stroke = stroke_for(
            self.config.style,
            point,
            self.config.detail,
            self.canvas.channel_height(),
            self.channel,
        );
        let color = resolve_color(point.time_seconds, self.config.foreground, &self.config.zones);
        self.canvas.vertical_line(stroke.x, stroke.y1, stroke.y2, color);
        self.drawn += 1;
    }

    /// Draw every point of a sequence, returning how many were drawn
    pub fn draw_all<I: IntoIterator<Item = SamplePoint>>(&mut self, points: I) -> u64 {
        for point in points {
            self.draw_point(&point);
        }
        self.drawn
    }

    /// Points drawn so far
    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

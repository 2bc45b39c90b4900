//! Waveform Rendering
//!
//! Turns decoded sample points into an image:
//! - Render configuration (size, colors, detail, style, color zones)
//! - Per-point color resolution
//! - Logical canvas with one band per channel
//! - Stroke geometry for waveform and bar styles
//! - Final resampling to the requested size

pub mod canvas;
pub mod channel;
pub mod color;
pub mod config;
pub mod pipeline;
pub mod resample;

pub use canvas::Canvas;
pub use channel::{stroke_for, ChannelRenderer, Stroke};
pub use color::resolve_color;
pub use config::{ColorZone, DrawStyle, RenderConfig, Rgb};
pub use pipeline::{CanvasCompositor, RenderStage, WaveformRenderer};
pub use resample::resample;

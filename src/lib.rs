//! Waveform image renderer for PCM WAV audio
//!
//! Reads one canonical PCM WAV stream per channel, down-samples the amplitude
//! data according to a detail factor and draws it as a waveform or as bars on
//! a logical canvas, which is finally resampled to the requested image size.
//!
//! # Features
//! - 8-bit and 16-bit PCM input
//! - Waveform (centered strokes) and bar styles
//! - Mono or stacked two-channel rendering
//! - Time-based color zones layered over a foreground color
//! - Transparent or opaque backgrounds
//! - PNG output
//!
//! # Crate feature flags
//! - `cli` (default): the `wavepng` command-line tool (`clap`, `env_logger`)
//! - `lame` (default): MP3 to PCM WAV through an external `lame` binary (`transcode`)
//!
//! # Quick start
//! ```no_run
//! use std::fs::File;
//! use wavepng::render::{DrawStyle, RenderConfig, WaveformRenderer};
//!
//! # fn main() -> wavepng::Result<()> {
//! let config = RenderConfig::default()
//!     .size(1200, 200)
//!     .detail(20)
//!     .style(DrawStyle::Waveform);
//! let mut streams = vec![File::open("song.wav")?];
//! let image = WaveformRenderer::new(config)?.render(&mut streams)?;
//! wavepng::export::save_png(&image, "song.png")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod export; // PNG Output
pub mod pcm; // PCM Container & Sample Decoding
pub mod render; // Canvas, Strokes & Resampling
#[cfg(feature = "lame")]
pub mod transcode; // External Encoder

/// Error types for waveform rendering
#[derive(thiserror::Error, Debug)]
pub enum WaveformError {
    /// PCM header is too short or declares an unsupported bit depth
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Render configuration rejected before any stream is read
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error from filesystem or stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error encoding the output image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed JSON configuration file
    #[error("Config file error: {0}")]
    Config(#[from] serde_json::Error),

    /// External encoder failure
    #[error("Transcode error: {0}")]
    Transcode(String),

    /// A renderer is single-shot
    #[error("Renderer has already been used")]
    AlreadyRendered,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for WaveformError {
    /// Converts a String into `WaveformError::Other`.
    ///
    /// Prefer the specific variants (`MalformedHeader`, `InvalidConfig`, ...)
    /// where the caller needs to tell failures apart.
    fn from(msg: String) -> Self {
        WaveformError::Other(msg)
    }
}

impl From<&str> for WaveformError {
    fn from(msg: &str) -> Self {
        WaveformError::Other(msg.to_string())
    }
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, WaveformError>;

// Public API exports
pub use export::{save_png, write_png};
pub use pcm::{BitDepth, Downsampler, PcmHeader, SamplePoint};
pub use render::{
    ColorZone, DrawStyle, RenderConfig, RenderStage, Rgb, WaveformRenderer,
};
#[cfg(feature = "lame")]
pub use transcode::{LameTranscoder, TranscodedStreams};

//! PCM Container Support
//!
//! Reading of canonical PCM WAV streams:
//! - Fixed-layout format header (channels, rate, bit depth)
//! - 8-bit and 16-bit sample decoding to an unsigned amplitude
//! - Detail-driven down-sampling of the sample stream

pub mod downsampler;
pub mod header;
pub mod sample;

pub use downsampler::{Downsampler, SamplePoint, StreamLayout};
pub use header::PcmHeader;
pub use sample::{combine_bytes, decode_sample, BitDepth};

/// Offset of the format-tag field inside the container
pub const HEADER_OFFSET: u64 = 20;

/// Size of the structured format block read by [`PcmHeader::read_from`]
pub const HEADER_LEN: usize = 16;

/// Offset of the first sample byte (canonical 44-byte header)
pub const DATA_OFFSET: u64 = 44;

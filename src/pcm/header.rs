//! PCM format header parser
//!
//! The canonical WAV layout places a 16-byte format block at offset 20:
//!
//! | offset | size | field            |
//! |--------|------|------------------|
//! | 0      | 2    | format tag       |
//! | 2      | 2    | channel count    |
//! | 4      | 4    | sample rate (Hz) |
//! | 8      | 4    | bytes per second |
//! | 12     | 2    | block align      |
//! | 14     | 2    | bits per sample  |
//!
//! All fields are little-endian. Sample data follows at byte 44.

use super::sample::BitDepth;
use super::{DATA_OFFSET, HEADER_LEN, HEADER_OFFSET};
use crate::{Result, WaveformError};
use nom::number::complete::{le_u16, le_u32};
use nom::sequence::tuple;
use nom::IResult;
use std::io::{Read, Seek, SeekFrom};

/// Format tag written by [`PcmHeader::to_bytes`] (uncompressed PCM)
const WAVE_FORMAT_PCM: u16 = 1;

/// Parsed PCM format header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmHeader {
    /// Number of interleaved channels
    pub channel_count: u16,
    /// Sample rate in Hz
    pub sample_rate_hz: u32,
    /// Average byte rate
    pub bytes_per_second: u32,
    /// Bytes per sample frame
    pub block_align: u16,
    /// Sample bit depth (8 or 16)
    pub bits_per_sample: u16,
}

type FormatBlock = (u16, u16, u32, u32, u16, u16);

fn format_block(input: &[u8]) -> IResult<&[u8], FormatBlock> {
    tuple((le_u16, le_u16, le_u32, le_u32, le_u16, le_u16))(input)
}

impl PcmHeader {
    /// Parse the 16-byte format block
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(WaveformError::MalformedHeader(format!(
                "format block needs {} bytes, got {}",
                HEADER_LEN,
                data.len()
            )));
        }

        let (_, (_format_tag, channel_count, sample_rate_hz, bytes_per_second, block_align, bits)) =
            format_block(data).map_err(|e| {
                WaveformError::MalformedHeader(format!("unreadable format block: {e}"))
            })?;

        if BitDepth::from_bits(bits).is_none() {
            return Err(WaveformError::MalformedHeader(format!(
                "unsupported bit depth {bits} (expected 8 or 16)"
            )));
        }

        Ok(PcmHeader {
            channel_count,
            sample_rate_hz,
            bytes_per_second,
            block_align,
            bits_per_sample: bits,
        })
    }

    /// Seek to the format block, parse it and leave the reader at the first sample byte
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        reader.seek(SeekFrom::Start(HEADER_OFFSET))?;

        let mut raw = Vec::with_capacity(HEADER_LEN);
        reader.by_ref().take(HEADER_LEN as u64).read_to_end(&mut raw)?;
        let header = Self::parse(&raw)?;

        reader.seek(SeekFrom::Start(DATA_OFFSET))?;
        Ok(header)
    }

    /// Serialize back into the 16-byte format block
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..2].copy_from_slice(&WAVE_FORMAT_PCM.to_le_bytes());
        out[2..4].copy_from_slice(&self.channel_count.to_le_bytes());
        out[4..8].copy_from_slice(&self.sample_rate_hz.to_le_bytes());
        out[8..12].copy_from_slice(&self.bytes_per_second.to_le_bytes());
        out[12..14].copy_from_slice(&self.block_align.to_le_bytes());
        out[14..16].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out
    }

    /// Validated bit depth
    pub fn bit_depth(&self) -> BitDepth {
        // parse() rejects anything else
        BitDepth::from_bits(self.bits_per_sample).unwrap_or(BitDepth::Sixteen)
    }

    /// Bytes occupied by one sample
    pub fn bytes_per_sample(&self) -> u64 {
        self.bit_depth().bytes() as u64
    }

    /// Whether the stream declares two channels
    pub fn is_stereo(&self) -> bool {
        self.channel_count == 2
    }
}

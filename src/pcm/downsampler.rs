//! Detail-driven down-sampling
//!
//! Walks a PCM stream point by point. Every point spans `skip_stride +
//! bytes_per_sample` bytes; only points whose index is a multiple of the
//! detail factor are decoded, the rest are skipped with a relative seek.
//!
//! The iterator is finite and single-pass: it stops when the stream is
//! exhausted, when the point budget derived from the stream length is spent,
//! or when a retained sample is cut short by end of file.

use super::header::PcmHeader;
use super::sample::{decode_sample, BitDepth};
use super::DATA_OFFSET;
use crate::{Result, WaveformError};
use std::io::{self, Read, Seek, SeekFrom};

/// Bytes skipped after each sample when the stream declares two channels
pub const STEREO_SKIP_STRIDE: u64 = 40;

/// Bytes skipped after each sample for any other channel count
pub const MONO_SKIP_STRIDE: u64 = 80;

/// One retained (decoded) point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Point index in the stream, counting skipped points
    pub index: u64,
    /// Number of points retained before this one
    pub retained: u64,
    /// Unsigned amplitude, 128 is silence for 16-bit input
    pub amplitude: u8,
    /// Playback time of the point in seconds
    pub time_seconds: f64,
}

/// Byte geometry of one channel stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamLayout {
    /// Sample bit depth
    pub depth: BitDepth,
    /// Bytes skipped after a sample
    pub skip_stride: u64,
    /// Point budget for the stream
    pub points: u64,
}

impl StreamLayout {
    /// Derive the layout from a header and the total stream length in bytes
    pub fn new(header: &PcmHeader, stream_len: u64) -> Self {
        let depth = header.bit_depth();
        let skip_stride = if header.is_stereo() {
            STEREO_SKIP_STRIDE
        } else {
            MONO_SKIP_STRIDE
        };
        let point_stride = skip_stride + depth.bytes() as u64;
        let points = stream_len.saturating_sub(DATA_OFFSET) / point_stride + 1;

        StreamLayout {
            depth,
            skip_stride,
            points,
        }
    }

    /// Bytes covered by one point (sample plus skip)
    pub fn point_stride(&self) -> u64 {
        self.skip_stride + self.depth.bytes() as u64
    }
}

/// Seconds elapsed after `bytes_read` bytes of the stream (header included)
///
/// Returns 0 when any of bit depth, channel count or sample rate is zero.
pub fn timestamp(bytes_read: u64, header: &PcmHeader) -> f64 {
    if header.bits_per_sample == 0 || header.channel_count == 0 || header.sample_rate_hz == 0 {
        return 0.0;
    }

    let data_bytes = bytes_read.saturating_sub(DATA_OFFSET) as f64;
    data_bytes
        / (header.bits_per_sample as f64 / 8.0)
        / header.channel_count as f64
        / header.sample_rate_hz as f64
}

/// Lazy producer of [`SamplePoint`]s over one channel stream
pub struct Downsampler<'a, R> {
    reader: &'a mut R,
    header: PcmHeader,
    layout: StreamLayout,
    stream_len: u64,
    detail: u64,
    point: u64,
    retained: u64,
    position: u64,
    truncated: bool,
    finished: bool,
    error: Option<io::Error>,
}

impl<'a, R: Read + Seek> Downsampler<'a, R> {
    /// Parse the stream header and position the reader at the first sample
    ///
    /// `detail` must be at least 1; zero is rejected before the stream is touched.
    pub fn new(reader: &'a mut R, detail: u32) -> Result<Self> {
        if detail == 0 {
            return Err(WaveformError::InvalidConfig(
                "detail must be at least 1".to_string(),
            ));
        }

        let stream_len = reader.seek(SeekFrom::End(0))?;
        let header = PcmHeader::read_from(reader)?;
        let layout = StreamLayout::new(&header, stream_len);

        Ok(Downsampler {
            reader,
            header,
            layout,
            stream_len,
            detail: detail as u64,
            point: 0,
            retained: 0,
            position: DATA_OFFSET,
            truncated: false,
            finished: false,
            error: None,
        })
    }

    /// Parsed stream header
    pub fn header(&self) -> &PcmHeader {
        &self.header
    }

    /// Stream geometry
    pub fn layout(&self) -> &StreamLayout {
        &self.layout
    }

    /// Whether a retained sample was cut short by end of file
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Points retained so far
    pub fn retained(&self) -> u64 {
        self.retained
    }

    /// Take an I/O error (other than end of file) that ended the iteration
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn advance(&mut self, bytes: u64) -> io::Result<()> {
        self.reader.seek(SeekFrom::Current(bytes as i64))?;
        self.position += bytes;
        Ok(())
    }

    fn stop_with(&mut self, err: io::Error) -> Option<SamplePoint> {
        self.finished = true;
        self.error = Some(err);
        None
    }
}

impl<R: Read + Seek> Iterator for Downsampler<'_, R> {
    type Item = SamplePoint;

    fn next(&mut self) -> Option<SamplePoint> {
        loop {
            if self.finished || self.point >= self.layout.points || self.position >= self.stream_len {
                self.finished = true;
                return None;
            }

            let index = self.point;
            self.point += 1;

            if index % self.detail != 0 {
                if let Err(e) = self.advance(self.layout.point_stride()) {
                    return self.stop_with(e);
                }
                continue;
            }

            let width = self.layout.depth.bytes();
            let mut raw = [0u8; 2];
            if let Err(e) = self.reader.read_exact(&mut raw[..width]) {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    log::warn!(
                        "stream truncated inside sample at byte {} after {} retained points",
                        self.position,
                        self.retained
                    );
                    self.truncated = true;
                    self.finished = true;
                    return None;
                }
                return self.stop_with(e);
            }
            self.position += width as u64;

            if let Err(e) = self.advance(self.layout.skip_stride) {
                return self.stop_with(e);
            }

            let point = SamplePoint {
                index,
                retained: self.retained,
                amplitude: decode_sample(self.layout.depth, &raw[..width]),
                time_seconds: timestamp(self.position, &self.header),
            };
            self.retained += 1;
            return Some(point);
        }
    }
}

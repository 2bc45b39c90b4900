//! Shared WAV fixtures for integration tests

#![allow(dead_code)]

use std::f64::consts::PI;
use std::io::Cursor;

/// Samples covered by one point of a mono 16-bit stream (82 bytes)
pub const MONO16_SAMPLES_PER_POINT: usize = 41;

/// Encode 16-bit samples (interleaved when `channels == 2`) as a WAV file
pub fn wav16(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Encode 8-bit samples as a mono WAV file
pub fn wav8(sample_rate: u32, samples: &[i8]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Sine wave of `len` samples with the given peak
pub fn sine(len: usize, period: usize, peak: f64) -> Vec<i16> {
    (0..len)
        .map(|i| (peak * (2.0 * PI * i as f64 / period as f64).sin()) as i16)
        .collect()
}

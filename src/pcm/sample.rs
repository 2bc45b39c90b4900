//! Sample decoding
//!
//! Converts raw PCM sample bytes into an unsigned amplitude in `0..=255`.

/// Supported PCM bit depths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// Unsigned 8-bit samples
    Eight,
    /// Signed little-endian 16-bit samples
    Sixteen,
}

impl BitDepth {
    /// Map a header `bits_per_sample` value
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(BitDepth::Eight),
            16 => Some(BitDepth::Sixteen),
            _ => None,
        }
    }

    /// Bytes per sample
    pub fn bytes(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }

    /// Bits per sample
    pub fn bits(self) -> u16 {
        self.bytes() as u16 * 8
    }
}

/// Two-byte little-endian composite: `lo + hi * 256`
#[inline]
pub fn combine_bytes(lo: u8, hi: u8) -> u32 {
    lo as u32 + hi as u32 * 256
}

/// Decode one sample into an amplitude
///
/// 8-bit samples carry a single byte; the high half of the composite is absent
/// and counts as zero, so the amplitude is the raw byte. 16-bit samples have
/// the sign bit of the high byte flipped to move signed PCM onto an unsigned
/// scale centered at 128, and the composite is divided by 256.
///
/// Missing bytes in `bytes` are treated as zero.
pub fn decode_sample(depth: BitDepth, bytes: &[u8]) -> u8 {
    let lo = bytes.first().copied().unwrap_or(0);
    match depth {
        BitDepth::Eight => {
            let hi = bytes.get(1).copied().unwrap_or(0);
            // Only ever called with one byte from the stream; hi is zero there
            combine_bytes(lo, hi).min(u8::MAX as u32) as u8
        }
        BitDepth::Sixteen => {
            let hi = bytes.get(1).copied().unwrap_or(0);
            let flipped = if hi & 0x80 != 0 { hi & 0x7F } else { (hi & 0x7F) + 128 };
            (combine_bytes(lo, flipped) / 256) as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth_mapping() {
        assert_eq!(BitDepth::from_bits(8), Some(BitDepth::Eight));
        assert_eq!(BitDepth::from_bits(16), Some(BitDepth::Sixteen));
        assert_eq!(BitDepth::from_bits(24), None);
        assert_eq!(BitDepth::Sixteen.bytes(), 2);
        assert_eq!(BitDepth::Eight.bits(), 8);
    }

    #[test]
    fn test_eight_bit_is_raw_byte() {
        assert_eq!(decode_sample(BitDepth::Eight, &[0]), 0);
        assert_eq!(decode_sample(BitDepth::Eight, &[128]), 128);
        assert_eq!(decode_sample(BitDepth::Eight, &[255]), 255);
    }

    #[test]
    fn test_sixteen_bit_centering() {
        // silence
        assert_eq!(decode_sample(BitDepth::Sixteen, &[0x00, 0x00]), 128);
        // i16::MAX
        assert_eq!(decode_sample(BitDepth::Sixteen, &[0xFF, 0x7F]), 255);
        // i16::MIN
        assert_eq!(decode_sample(BitDepth::Sixteen, &[0x00, 0x80]), 0);
        // -1
        assert_eq!(decode_sample(BitDepth::Sixteen, &[0xFF, 0xFF]), 127);
    }

    #[test]
    fn test_sixteen_bit_matches_offset_binary() {
        for value in (i16::MIN..=i16::MAX).step_by(97) {
            let bytes = value.to_le_bytes();
            let expected = ((value as i32 + 32_768) / 256) as u8;
            assert_eq!(decode_sample(BitDepth::Sixteen, &bytes), expected, "value {value}");
        }
    }

    #[test]
    fn test_combine_bytes() {
        assert_eq!(combine_bytes(0x34, 0x12), 0x1234);
        assert_eq!(combine_bytes(0xFF, 0xFF), 65_535);
    }
}

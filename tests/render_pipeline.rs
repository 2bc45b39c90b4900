//! End-to-end rendering tests over synthesized WAV streams

mod common;

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use common::{sine, wav16, wav8, MONO16_SAMPLES_PER_POINT};
use image::Rgba;
use wavepng::pcm::{Downsampler, PcmHeader, DATA_OFFSET};
use wavepng::render::{
    resolve_color, CanvasCompositor, DrawStyle, RenderConfig, RenderStage, Rgb, WaveformRenderer,
};
use wavepng::WaveformError;

const WHITE: Rgb = Rgb::new(255, 255, 255);
const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Reader that records every read and seek
struct CountingReader {
    inner: Cursor<Vec<u8>>,
    reads: usize,
    seeks: usize,
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;
        self.inner.read(buf)
    }
}

impl Seek for CountingReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.seeks += 1;
        self.inner.seek(pos)
    }
}

#[test]
fn fixture_has_canonical_header() {
    let data = wav16(1, 44_100, &[0; 100]);
    let mut cursor = Cursor::new(data);
    let header = PcmHeader::read_from(&mut cursor).unwrap();
    assert_eq!(header.channel_count, 1);
    assert_eq!(header.sample_rate_hz, 44_100);
    assert_eq!(header.bits_per_sample, 16);
    assert_eq!(cursor.position(), DATA_OFFSET);
}

#[test]
fn retained_points_follow_detail() {
    let n = 60;
    let data = wav16(1, 8_000, &vec![0; n * MONO16_SAMPLES_PER_POINT]);
    for detail in [1u32, 2, 7, 59, 60, 61] {
        let mut cursor = Cursor::new(data.clone());
        let count = Downsampler::new(&mut cursor, detail).unwrap().count();
        assert_eq!(count, (n as u32).div_ceil(detail) as usize, "detail {detail}");
    }
}

#[test]
fn eight_bit_amplitude_is_raw_byte() {
    // hound stores 8-bit samples unsigned: -28 becomes 100
    let data = wav8(8_000, &vec![-28; 81 * 10]);
    let mut cursor = Cursor::new(data);
    let amplitudes: Vec<u8> = Downsampler::new(&mut cursor, 1)
        .unwrap()
        .map(|p| p.amplitude)
        .collect();
    assert_eq!(amplitudes.len(), 10);
    assert!(amplitudes.iter().all(|&a| a == 100));
}

#[test]
fn zero_detail_rejected_before_any_read() {
    assert!(matches!(
        WaveformRenderer::new(RenderConfig::default().detail(0)),
        Err(WaveformError::InvalidConfig(_))
    ));

    let mut reader = CountingReader {
        inner: Cursor::new(wav16(1, 8_000, &[0; 500])),
        reads: 0,
        seeks: 0,
    };
    let result = Downsampler::new(&mut reader, 0);
    assert!(matches!(result, Err(WaveformError::InvalidConfig(_))));
    assert_eq!(reader.reads, 0);
    assert_eq!(reader.seeks, 0);
}

#[test]
fn mono_waveform_transparent_background() {
    let samples = sine(MONO16_SAMPLES_PER_POINT * 2_000, 400, 1_000.0);
    let config = RenderConfig::default()
        .size(200, 40)
        .detail(100)
        .style(DrawStyle::Waveform)
        .background(None);

    let mut renderer = WaveformRenderer::new(config).unwrap();
    let mut streams = vec![Cursor::new(wav16(1, 44_100, &samples))];
    let image = renderer.render(&mut streams).unwrap();

    assert_eq!(image.dimensions(), (200, 40));
    assert_eq!(renderer.stage(), &RenderStage::Done);

    // quiet signal: strokes hug the middle line, the edges stay untouched
    for y in (0..10).chain(30..40) {
        for x in 0..200 {
            assert_eq!(image.get_pixel(x, y).0[3], 0, "pixel ({x}, {y})");
        }
    }
    assert!((0..200).any(|x| image.get_pixel(x, 20).0[3] > 0));
}

#[test]
fn stereo_channels_stack_vertically() {
    let config = RenderConfig::stereo()
        .size(30, 20)
        .detail(1)
        .background(Some(BLACK))
        .foreground(WHITE);
    let loud = wav16(1, 8_000, &vec![i16::MAX; MONO16_SAMPLES_PER_POINT * 30]);
    let silent = wav16(1, 8_000, &vec![0; MONO16_SAMPLES_PER_POINT * 30]);

    let mut left = Cursor::new(loud.clone());
    let mut right = Cursor::new(silent.clone());
    let mut compositor = CanvasCompositor::new(&config, 2);
    compositor
        .composite_channel(1, &mut Downsampler::new(&mut left, 1).unwrap())
        .unwrap();
    compositor
        .composite_channel(2, &mut Downsampler::new(&mut right, 1).unwrap())
        .unwrap();
    let canvas = compositor.finish().unwrap();

    assert_eq!(canvas.height(), 2 * 20);
    let white = Some(Rgba([255, 255, 255, 255]));
    let black = Some(Rgba([0, 0, 0, 255]));
    // channel 1 fills its band, channel 2 is a single row at its middle
    assert_eq!(canvas.pixel(3, 5), white);
    assert_eq!(canvas.pixel(3, 15), white);
    assert_eq!(canvas.pixel(3, 25), black);
    assert_eq!(canvas.pixel(3, 30), white);
    assert_eq!(canvas.pixel(3, 35), black);

    let mut renderer = WaveformRenderer::new(config).unwrap();
    let mut streams = vec![Cursor::new(loud), Cursor::new(silent)];
    let image = renderer.render(&mut streams).unwrap();
    assert_eq!(image.dimensions(), (30, 20));
}

#[test]
fn stereo_bars_share_the_first_band_edge() {
    let config = RenderConfig::stereo()
        .size(40, 20)
        .detail(1)
        .style(DrawStyle::Bars)
        .background(Some(BLACK))
        .foreground(WHITE);
    let mut left = Cursor::new(wav16(1, 8_000, &vec![i16::MAX; MONO16_SAMPLES_PER_POINT * 10]));
    let mut right = Cursor::new(wav16(1, 8_000, &vec![0; MONO16_SAMPLES_PER_POINT * 10]));

    let mut compositor = CanvasCompositor::new(&config, 2);
    compositor
        .composite_channel(1, &mut Downsampler::new(&mut left, 1).unwrap())
        .unwrap();
    compositor
        .composite_channel(2, &mut Downsampler::new(&mut right, 1).unwrap())
        .unwrap();
    let canvas = compositor.finish().unwrap();

    let white = Some(Rgba([255, 255, 255, 255]));
    let black = Some(Rgba([0, 0, 0, 255]));
    // first point: column (0 + 1) / 1 + (0 + 1) = 2
    // channel 2 silence: rows 20..=30, hanging from the top of the lower band
    for y in 20..=30 {
        assert_eq!(canvas.pixel(2, y), white, "row {y}");
    }
    assert_eq!(canvas.pixel(2, 31), black);
    assert_eq!(canvas.pixel(2, 39), black);
    // channel 1 full scale collapses onto row 20
    assert_eq!(canvas.pixel(2, 10), black);
    assert_eq!(canvas.pixel(0, 25), black);
}

#[test]
fn stereo_stream_uses_short_stride() {
    let data = wav16(2, 8_000, &vec![0; 2 * 200]);
    let mut cursor = Cursor::new(data);
    let sampler = Downsampler::new(&mut cursor, 1).unwrap();
    assert_eq!(sampler.layout().skip_stride, 40);
    assert_eq!(sampler.header().channel_count, 2);
}

#[test]
fn color_zone_paints_closed_interval() {
    let red = Rgb::new(255, 0, 0);
    let blue = Rgb::new(0, 0, 255);
    let config = RenderConfig::default()
        .size(100, 10)
        .detail(1)
        .foreground(blue)
        .zone(5.0, 10.0, red);

    // 12 seconds at 8 kHz
    let data = wav16(1, 8_000, &vec![i16::MAX; 8_000 * 12]);

    let mut stream = Cursor::new(data.clone());
    let mut compositor = CanvasCompositor::new(&config, 1);
    compositor
        .composite_channel(1, &mut Downsampler::new(&mut stream, 1).unwrap())
        .unwrap();
    let canvas = compositor.finish().unwrap();

    let mut again = Cursor::new(data);
    let (mut inside, mut outside) = (0, 0);
    for point in Downsampler::new(&mut again, 1).unwrap() {
        let expected = if (5.0..=10.0).contains(&point.time_seconds) {
            inside += 1;
            red
        } else {
            outside += 1;
            blue
        };
        assert_eq!(resolve_color(point.time_seconds, blue, &config.zones), expected);
        let column = point.index as u32 + 1;
        if column >= canvas.width() {
            continue;
        }
        assert_eq!(
            canvas.pixel(column, 5),
            Some(Rgba(expected.to_rgba())),
            "point {} at {:.4}s",
            point.index,
            point.time_seconds
        );
    }
    assert!(inside > 0 && outside > 0);
}

#[test]
fn bars_render_to_requested_size() {
    let samples = sine(MONO16_SAMPLES_PER_POINT * 500, 300, 20_000.0);
    let config = RenderConfig::default()
        .size(120, 30)
        .detail(5)
        .style(DrawStyle::Bars)
        .background(Some(BLACK));
    let mut renderer = WaveformRenderer::new(config).unwrap();
    let image = renderer
        .render(&mut [Cursor::new(wav16(1, 44_100, &samples))])
        .unwrap();
    assert_eq!(image.dimensions(), (120, 30));
    assert!(image.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn tiny_stream_still_renders() {
    let config = RenderConfig::default().size(64, 16).detail(100);
    let mut renderer = WaveformRenderer::new(config).unwrap();
    let image = renderer
        .render(&mut [Cursor::new(wav16(1, 8_000, &[0]))])
        .unwrap();
    assert_eq!(image.dimensions(), (64, 16));
}

#[test]
fn truncated_stream_renders_partial_data() {
    let mut data = wav16(1, 8_000, &vec![i16::MAX; MONO16_SAMPLES_PER_POINT * 10]);
    // cut inside the sample of point 5
    data.truncate(DATA_OFFSET as usize + 5 * 82 + 1);

    let config = RenderConfig::default().size(10, 10).detail(1);
    let mut renderer = WaveformRenderer::new(config).unwrap();
    let image = renderer.render(&mut [Cursor::new(data)]).unwrap();
    assert_eq!(image.dimensions(), (10, 10));
    assert_eq!(renderer.stage(), &RenderStage::Done);
}

#[test]
fn render_files_reports_missing_input() {
    let mut renderer = WaveformRenderer::new(RenderConfig::default()).unwrap();
    let result = renderer.render_files(&["/nonexistent/input.wav"]);
    assert!(result.is_err());
    assert!(matches!(renderer.stage(), RenderStage::Failed(_)));
}

//! Render pipeline
//!
//! Drives one render from channel streams to the final image:
//!
//! `Idle -> HeaderParsed -> Sampling(1..=N) -> Compositing -> Resampled -> Done`
//!
//! Any failure moves the renderer to `Failed`. A renderer renders once.

use super::canvas::Canvas;
use super::channel::ChannelRenderer;
use super::config::RenderConfig;
use super::resample::resample;
use crate::pcm::{Downsampler, StreamLayout};
use crate::{Result, WaveformError};
use image::RgbaImage;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Progress of a [`WaveformRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStage {
    /// Nothing read yet
    Idle,
    /// Every channel header parsed, canvas allocated
    HeaderParsed,
    /// Drawing channel `channel` of `of` (1-based)
    Sampling {
        /// Current channel
        channel: u32,
        /// Channel total
        of: u32,
    },
    /// All channels drawn, handing the canvas over
    Compositing,
    /// Output buffer produced
    Resampled,
    /// Render finished successfully
    Done,
    /// Render aborted
    Failed(String),
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStage::Idle => f.write_str("idle"),
            RenderStage::HeaderParsed => f.write_str("header parsed"),
            RenderStage::Sampling { channel, of } => write!(f, "sampling channel {channel}/{of}"),
            RenderStage::Compositing => f.write_str("compositing"),
            RenderStage::Resampled => f.write_str("resampled"),
            RenderStage::Done => f.write_str("done"),
            RenderStage::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Owns the logical canvas while channels are drawn into it
pub struct CanvasCompositor<'a> {
    config: &'a RenderConfig,
    channels: u32,
    canvas: Option<Canvas>,
}

impl<'a> CanvasCompositor<'a> {
    /// Compositor for `channels` stacked bands
    pub fn new(config: &'a RenderConfig, channels: u32) -> Self {
        CanvasCompositor {
            config,
            channels,
            canvas: None,
        }
    }

    /// Allocate the canvas from the first channel's layout; later calls reuse it
    pub fn allocate(&mut self, layout: &StreamLayout) -> Result<&mut Canvas> {
        if self.canvas.is_none() {
            let width = (layout.points / self.config.detail.max(1) as u64).max(1);
            let width = u32::try_from(width).map_err(|_| {
                WaveformError::InvalidConfig(format!("logical canvas too wide: {width} columns"))
            })?;
            let canvas = Canvas::new(width, self.config.height, self.channels, self.config.background)?;
            log::info!(
                "allocated {}x{} logical canvas ({} channel(s), {} background)",
                canvas.width(),
                canvas.height(),
                self.channels,
                if self.config.background.is_some() { "opaque" } else { "transparent" }
            );
            self.canvas = Some(canvas);
        }

        self.canvas
            .as_mut()
            .ok_or_else(|| WaveformError::Other("canvas missing after allocation".to_string()))
    }

    /// Draw one channel (1-based) into the shared canvas
    pub fn composite_channel<R: Read + Seek>(
        &mut self,
        channel: u32,
        sampler: &mut Downsampler<'_, R>,
    ) -> Result<u64> {
        let layout = *sampler.layout();
        let config = self.config;
        let canvas = self.allocate(&layout)?;

        let drawn = ChannelRenderer::new(canvas, config, channel).draw_all(&mut *sampler);
        if let Some(err) = sampler.take_error() {
            return Err(err.into());
        }
        if sampler.truncated() {
            log::warn!("channel {channel}: rendering {drawn} points from a truncated stream");
        }
        Ok(drawn)
    }

    /// Hand the finished canvas over
    pub fn finish(self) -> Result<Canvas> {
        self.canvas
            .ok_or_else(|| WaveformError::Other("no channel was composited".to_string()))
    }
}

/// Single-shot renderer from PCM channel streams to an RGBA image
pub struct WaveformRenderer {
    config: RenderConfig,
    stage: RenderStage,
}

impl WaveformRenderer {
    /// Validate `config`; nothing is read yet
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(WaveformRenderer {
            config,
            stage: RenderStage::Idle,
        })
    }

    /// Render configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Current stage
    pub fn stage(&self) -> &RenderStage {
        &self.stage
    }

    fn enter(&mut self, stage: RenderStage) {
        log::debug!("render stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn fail(&mut self, err: WaveformError) -> WaveformError {
        self.enter(RenderStage::Failed(err.to_string()));
        err
    }

    /// Render one stream per channel (one for mono, two for stereo)
    pub fn render<R: Read + Seek>(&mut self, streams: &mut [R]) -> Result<RgbaImage> {
        if self.stage != RenderStage::Idle {
            return Err(WaveformError::AlreadyRendered);
        }
        match self.run(streams) {
            Ok(image) => Ok(image),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Open the channel files and render them
    pub fn render_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<RgbaImage> {
        if self.stage != RenderStage::Idle {
            return Err(WaveformError::AlreadyRendered);
        }
        let mut streams = Vec::with_capacity(paths.len());
        for path in paths {
            let file = File::open(path.as_ref()).map_err(|e| {
                let msg = format!("Failed to open '{}': {}", path.as_ref().display(), e);
                self.fail(msg.into())
            })?;
            streams.push(BufReader::new(file));
        }
        self.render(&mut streams)
    }

    fn run<R: Read + Seek>(&mut self, streams: &mut [R]) -> Result<RgbaImage> {
        let expected = self.config.channel_count();
        if streams.len() != expected {
            return Err(WaveformError::InvalidConfig(format!(
                "{} render needs {} stream(s), got {}",
                if self.config.stereo { "stereo" } else { "mono" },
                expected,
                streams.len()
            )));
        }

        let detail = self.config.detail;
        let mut samplers = streams
            .iter_mut()
            .map(|stream| Downsampler::new(stream, detail))
            .collect::<Result<Vec<_>>>()?;
        self.enter(RenderStage::HeaderParsed);

        let config = self.config.clone();
        let total = samplers.len() as u32;
        let mut compositor = CanvasCompositor::new(&config, total);
        compositor.allocate(samplers[0].layout())?;

        for (i, sampler) in samplers.iter_mut().enumerate() {
            let channel = i as u32 + 1;
            self.enter(RenderStage::Sampling { channel, of: total });
            let header = *sampler.header();
            let drawn = compositor.composite_channel(channel, sampler)?;
            log::debug!(
                "channel {channel}: {} Hz, {} bit, {} declared channel(s), {drawn} points drawn",
                header.sample_rate_hz,
                header.bits_per_sample,
                header.channel_count
            );
        }

        self.enter(RenderStage::Compositing);
        let canvas = compositor.finish()?;
        let (logical_w, logical_h) = (canvas.width(), canvas.height());

        let image = resample(canvas, config.width, config.height)?;
        self.enter(RenderStage::Resampled);
        log::info!(
            "resampled {}x{} logical canvas to {}x{}",
            logical_w,
            logical_h,
            image.width(),
            image.height()
        );

        self.enter(RenderStage::Done);
        Ok(image)
    }
}

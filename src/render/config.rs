//! Render configuration
//!
//! [`RenderConfig`] is built once per render (builder methods or a JSON file),
//! validated with [`RenderConfig::validate`] and read-only afterwards.

use crate::{Result, WaveformError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Rgb {
    /// Create a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Opaque RGBA pixel value
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, u8::MAX]
    }
}

impl FromStr for Rgb {
    type Err = WaveformError;

    /// Parse `#rrggbb` or `rrggbb`
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WaveformError::InvalidConfig(format!(
                "invalid color '{s}' (expected #rrggbb)"
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| WaveformError::InvalidConfig(format!("invalid color '{s}': {e}")))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = WaveformError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How each retained point is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawStyle {
    /// Vertical strokes centered on the channel's mid line
    #[default]
    Waveform,
    /// Vertical bars rising from the bottom of the channel band
    Bars,
}

impl DrawStyle {
    /// Get string representation of the style
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawStyle::Waveform => "waveform",
            DrawStyle::Bars => "bars",
        }
    }
}

impl FromStr for DrawStyle {
    type Err = WaveformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "waveform" => Ok(DrawStyle::Waveform),
            "bars" => Ok(DrawStyle::Bars),
            other => Err(WaveformError::InvalidConfig(format!(
                "unknown style '{other}' (expected waveform or bars)"
            ))),
        }
    }
}

impl fmt::Display for DrawStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time interval drawn in an override color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorZone {
    /// Start of the interval in seconds (inclusive)
    pub min: f64,
    /// End of the interval in seconds (inclusive)
    pub max: f64,
    /// Override color
    pub color: Rgb,
}

impl ColorZone {
    /// Create a zone
    pub fn new(min: f64, max: f64, color: Rgb) -> Self {
        ColorZone { min, max, color }
    }

    /// Whether `t` lies in the closed interval
    pub fn contains(&self, t: f64) -> bool {
        t >= self.min && t <= self.max
    }
}

impl FromStr for ColorZone {
    type Err = WaveformError;

    /// Parse `MIN:MAX:#rrggbb`
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(min), Some(max), Some(color)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(WaveformError::InvalidConfig(format!(
                "invalid color zone '{s}' (expected MIN:MAX:#rrggbb)"
            )));
        };

        let seconds = |v: &str| {
            v.trim().parse::<f64>().map_err(|e| {
                WaveformError::InvalidConfig(format!("invalid color zone '{s}': {e}"))
            })
        };
        Ok(ColorZone::new(seconds(min)?, seconds(max)?, color.parse()?))
    }
}

/// Parameters of one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels (also the logical height of each channel band)
    pub height: u32,
    /// Stroke color outside any color zone
    pub foreground: Rgb,
    /// Background color, `None` for transparent
    pub background: Option<Rgb>,
    /// Keep one point out of every `detail`
    pub detail: u32,
    /// Render two channel streams stacked vertically
    pub stereo: bool,
    /// Draw style
    pub style: DrawStyle,
    /// Color overrides, later zones win
    pub zones: Vec<ColorZone>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 100,
            foreground: Rgb::new(0xd1, 0xd1, 0xd1),
            background: None,
            detail: 100,
            stereo: false,
            style: DrawStyle::Waveform,
            zones: Vec::new(),
        }
    }
}

impl RenderConfig {
    /// Config for two stacked channels
    pub fn stereo() -> Self {
        Self {
            stereo: true,
            ..Default::default()
        }
    }

    /// Set output size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set foreground color
    pub fn foreground(mut self, color: Rgb) -> Self {
        self.foreground = color;
        self
    }

    /// Set background color (`None` = transparent)
    pub fn background(mut self, color: Option<Rgb>) -> Self {
        self.background = color;
        self
    }

    /// Set detail factor
    pub fn detail(mut self, detail: u32) -> Self {
        self.detail = detail;
        self
    }

    /// Set draw style
    pub fn style(mut self, style: DrawStyle) -> Self {
        self.style = style;
        self
    }

    /// Append a color zone
    pub fn zone(mut self, min: f64, max: f64, color: Rgb) -> Self {
        self.zones.push(ColorZone::new(min, max, color));
        self
    }

    /// Remove all color zones
    pub fn clear_zones(mut self) -> Self {
        self.zones.clear();
        self
    }

    /// Number of channel streams a render expects
    pub fn channel_count(&self) -> usize {
        if self.stereo {
            2
        } else {
            1
        }
    }

    /// Reject configurations the renderer cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.detail == 0 {
            return Err(WaveformError::InvalidConfig(
                "detail must be at least 1".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(WaveformError::InvalidConfig(format!(
                "output size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        for zone in &self.zones {
            if !zone.min.is_finite() || !zone.max.is_finite() {
                return Err(WaveformError::InvalidConfig(format!(
                    "color zone bounds must be finite, got {}..{}",
                    zone.min, zone.max
                )));
            }
            if zone.min > zone.max {
                return Err(WaveformError::InvalidConfig(format!(
                    "color zone starts after it ends: {}..{}",
                    zone.min, zone.max
                )));
            }
        }
        Ok(())
    }

    /// Parse a JSON configuration, missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            format!(
                "Failed to read config '{}': {}",
                path.as_ref().display(),
                e
            )
        })?;
        Self::from_json_str(&text)
    }
}

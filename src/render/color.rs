//! Per-point stroke color

use super::config::{ColorZone, Rgb};

/// Color of a point at time `t`
///
/// Starts from `foreground` and walks `zones` in order; every zone whose closed
/// interval contains `t` replaces the working color, so the last match wins.
pub fn resolve_color(t: f64, foreground: Rgb, zones: &[ColorZone]) -> Rgb {
    zones
        .iter()
        .filter(|zone| zone.contains(t))
        .fold(foreground, |_, zone| zone.color)
}

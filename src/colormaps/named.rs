//! Named colors and the per-figure color cycle.

use colorgrad::Color;

use crate::error::{ClimplotError, Result};

/// An 8-bit RGBA color
pub type Rgba = [u8; 4];

/// Default line colors, assigned in order to the series of one figure
pub const COLOR_CYCLE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Parse a CSS color name or hex string (`"blue"`, `"#ff0000"`)
pub fn parse_color(spec: &str) -> Result<Rgba> {
    Color::from_html(spec.trim())
        .map(|c| c.to_rgba8())
        .map_err(|e| ClimplotError::InvalidParameter {
            param: "color".to_string(),
            message: format!("Unknown color '{}': {}", spec, e),
        })
}

/// The `index`-th color of the default cycle, wrapping around
pub fn cycle_color(index: usize) -> Rgba {
    // The cycle entries are valid hex literals.
    parse_color(COLOR_CYCLE[index % COLOR_CYCLE.len()]).unwrap_or([0, 0, 0, 255])
}

/// Resolve an optional user color, falling back to the cycle
pub fn color_or_cycle(spec: Option<&str>, index: usize) -> Result<Rgba> {
    match spec {
        Some(spec) => parse_color(spec),
        None => Ok(cycle_color(index)),
    }
}

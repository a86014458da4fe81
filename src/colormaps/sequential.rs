//! Sequential colormaps (single-hue progression).
//!
//! These colormaps are suitable for data that progresses from low to high,
//! such as precipitation or temperature maps.

use colorgrad::Gradient;

use super::colormap::Colormap;

/// A perceptually uniform sequential colormap backed by a colorgrad preset
pub struct Sequential {
    name: &'static str,
    gradient: Gradient,
}

impl Sequential {
    /// Viridis - perceptually uniform, colorblind-friendly
    pub fn viridis() -> Self {
        Self { name: "viridis", gradient: colorgrad::viridis() }
    }

    /// Plasma
    pub fn plasma() -> Self {
        Self { name: "plasma", gradient: colorgrad::plasma() }
    }

    /// Inferno
    pub fn inferno() -> Self {
        Self { name: "inferno", gradient: colorgrad::inferno() }
    }

    /// Magma
    pub fn magma() -> Self {
        Self { name: "magma", gradient: colorgrad::magma() }
    }

    /// Cividis - colorblind-friendly alternative to viridis
    pub fn cividis() -> Self {
        Self { name: "cividis", gradient: colorgrad::cividis() }
    }
}

impl Colormap for Sequential {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        self.gradient.at(value.clamp(0.0, 1.0)).to_rgba8()
    }

    fn name(&self) -> &str {
        self.name
    }
}

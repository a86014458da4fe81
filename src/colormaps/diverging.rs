//! Diverging colormaps (two-hue progression with center).
//!
//! These colormaps are suitable for data that diverges from a central value,
//! such as correlation coefficients in [-1, 1].

use colorgrad::{CustomGradient, Gradient};

use super::colormap::Colormap;
use crate::error::{ClimplotError, Result};

/// Coolwarm anchors, dark blue through light gray to dark red
const COOLWARM_ANCHORS: [&str; 7] = [
    "#3b4cc0", "#7b9ff9", "#c0d4f5", "#dddddd", "#f2cbb7", "#ee8468", "#b40426",
];

/// A diverging colormap with its neutral color at 0.5
pub struct Diverging {
    name: &'static str,
    gradient: Gradient,
}

impl Diverging {
    /// Coolwarm - blue to red through gray
    pub fn coolwarm() -> Result<Self> {
        let gradient = CustomGradient::new()
            .html_colors(&COOLWARM_ANCHORS)
            .build()
            .map_err(|e| ClimplotError::ImageGeneration {
                message: format!("Failed to build coolwarm gradient: {}", e),
            })?;
        Ok(Self { name: "coolwarm", gradient })
    }

    /// RdBu - red to blue through white
    pub fn rd_bu() -> Self {
        Self { name: "rdbu", gradient: colorgrad::rd_bu() }
    }
}

impl Colormap for Diverging {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        self.gradient.at(value.clamp(0.0, 1.0)).to_rgba8()
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coolwarm_endpoints() {
        let cmap = Diverging::coolwarm().unwrap();
        let cold = cmap.map_normalized(0.0);
        let warm = cmap.map_normalized(1.0);
        assert!(cold[2] > cold[0], "low end should be blue: {:?}", cold);
        assert!(warm[0] > warm[2], "high end should be red: {:?}", warm);
    }

    #[test]
    fn test_correlation_range_mapping() {
        let cmap = Diverging::coolwarm().unwrap();
        // -1..1 maps 0 to the neutral gray midpoint
        let mid = cmap.map(0.0, -1.0, 1.0);
        for channel in &mid[..3] {
            assert!((*channel as i16 - 0xdd).abs() <= 1, "midpoint {:?}", mid);
        }
        assert_eq!(Diverging::rd_bu().name(), "rdbu");
    }
}

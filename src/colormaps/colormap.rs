//! Colormap trait and lookup.
//!
//! This module defines the common interface for all colormaps.

use crate::error::{ClimplotError, Result};

/// Trait for color mapping implementations
pub trait Colormap {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Get a colormap by name (case-insensitive)
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    use super::{diverging::Diverging, sequential::Sequential};

    match name.to_lowercase().as_str() {
        "viridis" => Ok(Box::new(Sequential::viridis())),
        "plasma" => Ok(Box::new(Sequential::plasma())),
        "inferno" => Ok(Box::new(Sequential::inferno())),
        "magma" => Ok(Box::new(Sequential::magma())),
        "cividis" => Ok(Box::new(Sequential::cividis())),
        "coolwarm" => Ok(Box::new(Diverging::coolwarm()?)),
        "rdbu" => Ok(Box::new(Diverging::rd_bu())),
        _ => Err(ClimplotError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(get_colormap("Viridis").unwrap().name(), "viridis");
        assert_eq!(get_colormap("COOLWARM").unwrap().name(), "coolwarm");
        assert!(get_colormap("jet").is_err());
    }

    #[test]
    fn test_degenerate_range_maps_to_midpoint() {
        let cmap = get_colormap("viridis").unwrap();
        assert_eq!(cmap.map(3.0, 3.0, 3.0), cmap.map_normalized(0.5));
        assert_eq!(cmap.map(-10.0, 0.0, 1.0), cmap.map_normalized(0.0));
        assert_eq!(cmap.map(10.0, 0.0, 1.0), cmap.map_normalized(1.0));
    }
}

//! Colormap implementations for image generation.
//!
//! This module provides matplotlib-inspired colormaps for filled maps and
//! heatmaps, plus named-color parsing for line and marker styles.

pub mod colormap;
pub mod diverging;
pub mod named;
pub mod sequential;

pub use colormap::{get_colormap, Colormap};
pub use named::{color_or_cycle, cycle_color, parse_color, Rgba, COLOR_CYCLE};

// Re-export commonly used colormaps
pub use diverging::Diverging;
pub use sequential::Sequential;

//! Figure model and rasterization.
//!
//! Every plot call builds its own [`Figure`] and hands it back to the
//! caller; there is no process-wide "current figure" or color cycle.

pub mod backend;
pub mod canvas;
pub mod figure;
pub mod save;
pub mod slug;

pub use figure::{
    Annotation, Axes, Colorbar, DataRange, Figure, Legend, LegendEntry, LegendLocation, PixelRect,
    SecondaryAxis,
};
pub use save::save_figure;
pub use slug::slugify;

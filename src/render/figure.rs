//! Figures, axes and the data ranges they cover.

use image::RgbaImage;
use std::ops::Range;

use crate::colormaps::Rgba as Color;

/// Fraction of the data span added on each side of line and scatter axes
pub const AXIS_MARGIN: f64 = 0.05;

/// A rectangle on the canvas, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// One past the last column
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the last row
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// A closed interval of data values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Bounds of the finite values, or None when there are none
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<DataRange>, v| match acc {
                None => Some(DataRange::new(v, v)),
                Some(r) => Some(DataRange::new(r.min.min(v), r.max.max(v))),
            })
    }

    /// Smallest range covering both
    pub fn union(self, other: DataRange) -> Self {
        DataRange::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Half-open `min..max`, as chart builders take it
    pub fn to_range(self) -> Range<f64> {
        self.min..self.max
    }

    /// Widen by `fraction` of the span on each side; a zero span widens by ±0.5
    pub fn padded(self, fraction: f64) -> Self {
        let span = self.span();
        if span > 0.0 {
            DataRange::new(self.min - span * fraction, self.max + span * fraction)
        } else {
            DataRange::new(self.min - 0.5, self.max + 0.5)
        }
    }

    /// The range itself, or ±0.5 around it when it has no width
    ///
    /// Chart coordinates need a non-empty interval.
    pub fn drawable(self) -> Self {
        if self.span() > 0.0 {
            self
        } else {
            self.padded(0.0)
        }
    }
}

/// Where a legend box is anchored inside its axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLocation {
    UpperLeft,
    UpperRight,
}

/// One labelled swatch in a legend
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// A legend box
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub location: LegendLocation,
    pub entries: Vec<LegendEntry>,
}

/// A vertical colorbar beside an axes
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    /// The color strip on the canvas
    pub rect: PixelRect,
    pub label: String,
    pub range: DataRange,
    pub colormap: String,
}

/// A right-hand y axis sharing the x axis of its parent
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryAxis {
    pub label: String,
    pub range: DataRange,
}

/// Text placed at a data position, e.g. a heatmap cell value
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// One plotting panel of a figure
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    /// Plotting area on the canvas
    pub rect: PixelRect,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: DataRange,
    pub y_range: DataRange,
    pub secondary: Option<SecondaryAxis>,
    pub legends: Vec<Legend>,
    pub colorbar: Option<Colorbar>,
    pub annotations: Vec<Annotation>,
}

impl Axes {
    pub fn new(rect: PixelRect) -> Self {
        Self {
            rect,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            x_range: DataRange::new(0.0, 1.0),
            y_range: DataRange::new(0.0, 1.0),
            secondary: None,
            legends: Vec::new(),
            colorbar: None,
            annotations: Vec::new(),
        }
    }
}

/// A rendered chart: the raster plus a description of every panel
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: Option<String>,
    pub axes: Vec<Axes>,
    pub canvas: RgbaImage,
}

impl Figure {
    /// A figure around an already drawn canvas, with no panels yet
    pub fn new(canvas: RgbaImage) -> Self {
        Self {
            title: None,
            axes: Vec::new(),
            canvas,
        }
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_from_values_skips_non_finite() {
        let range = DataRange::from_values([3.0, f64::NAN, -1.0, f64::INFINITY]).unwrap();
        assert_eq!(range, DataRange::new(-1.0, 3.0));
        assert!(DataRange::from_values([f64::NAN]).is_none());
    }

    #[test]
    fn test_padding() {
        assert_eq!(DataRange::new(0.0, 10.0).padded(0.05), DataRange::new(-0.5, 10.5));
        assert_eq!(DataRange::new(2.0, 2.0).padded(0.05), DataRange::new(1.5, 2.5));
    }

    #[test]
    fn test_drawable_widens_only_empty_ranges() {
        assert_eq!(DataRange::new(0.0, 4.0).drawable(), DataRange::new(0.0, 4.0));
        assert_eq!(DataRange::new(4.0, 4.0).drawable(), DataRange::new(3.5, 4.5));
        assert_eq!(DataRange::new(-2.0, 3.0).span(), 5.0);
    }

    #[test]
    fn test_figure_wraps_canvas() {
        let fig = Figure::new(RgbaImage::new(30, 20));
        assert_eq!((fig.width(), fig.height()), (30, 20));
        assert!(fig.axes.is_empty());
        assert!(fig.title.is_none());
    }
}

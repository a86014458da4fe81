//! Chart rasterization with `plotters` onto an in-memory bitmap.

use image::{DynamicImage, RgbImage, RgbaImage};
use ndarray::ArrayView2;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use super::backend::GlyphTextBackend;
use super::figure::{DataRange, PixelRect};
use crate::colormaps::{Colormap, Rgba};
use crate::error::{ClimplotError, Result};
use crate::interpolation::common::coord_to_index;
use crate::interpolation::Interpolator;

/// Number of color steps drawn in a colorbar
const COLORBAR_STEPS: usize = 64;

/// Color of heatmap cells without data
pub const MISSING: Rgba = [235, 235, 235, 255];

/// The backend every chart is drawn on
pub type Backend<'a> = GlyphTextBackend<BitMapBackend<'a>>;

/// A drawing area in canvas pixels
pub type Area<'a> = DrawingArea<Backend<'a>, Shift>;

/// Plain x/y chart coordinates
pub type XyCoord = Cartesian2d<RangedCoordf64, RangedCoordf64>;

/// Font sizes and spacing scaled to the output resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub title_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
    pub margin: u32,
    pub label_area: u32,
}

impl Layout {
    pub fn for_dpi(dpi: u32) -> Self {
        let dpi = dpi as f64;
        Self {
            title_size: (dpi * 0.14).max(4.0),
            label_size: (dpi * 0.11).max(4.0),
            tick_size: (dpi * 0.09).max(4.0),
            margin: (dpi * 0.1).round().max(2.0) as u32,
            label_area: (dpi * 0.5).round().max(8.0) as u32,
        }
    }

    pub fn title_font(&self) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.title_size, FontStyle::Normal)
    }

    pub fn label_font(&self) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.label_size, FontStyle::Normal)
    }

    pub fn tick_font(&self) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.tick_size, FontStyle::Normal)
    }

    /// Length of a legend line swatch
    pub fn swatch(&self) -> i32 {
        (self.label_size * 2.0).round() as i32
    }
}

/// Convert an 8-bit RGBA color to a `plotters` color
pub fn rgb(color: Rgba) -> RGBAColor {
    RGBAColor(color[0], color[1], color[2], color[3] as f64 / 255.0)
}

/// Canvas rectangle covered by a drawing area
pub fn pixel_rect<DB: DrawingBackend, CT: CoordTranslate>(area: &DrawingArea<DB, CT>) -> PixelRect {
    let (xs, ys) = area.get_pixel_range();
    PixelRect::new(
        xs.start.max(0) as u32,
        ys.start.max(0) as u32,
        (xs.end - xs.start).max(0) as u32,
        (ys.end - ys.start).max(0) as u32,
    )
}

/// Register a legend entry drawn as a short line in `style`
///
/// The entry belongs to an empty series, so a chart can list labels for
/// lines drawn on another coordinate system.
pub fn label_series<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, XyCoord>,
    label: &str,
    style: ShapeStyle,
    swatch: i32,
) -> Result<()> {
    chart
        .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + swatch, y)], style));
    Ok(())
}

/// Draw the legend box of every labelled series of `chart`
pub fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, XyCoord>,
    position: SeriesLabelPosition,
    layout: &Layout,
) -> Result<()> {
    chart
        .configure_series_labels()
        .position(position)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(layout.label_font())
        .draw()?;
    Ok(())
}

/// Draw on a white `size` canvas and return the pixels
pub fn rasterize<F>(size: (u32, u32), draw: F) -> Result<RgbaImage>
where
    F: for<'a> FnOnce(&Area<'a>) -> Result<()>,
{
    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = GlyphTextBackend::new(BitMapBackend::with_buffer(&mut buffer, size))
            .into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    let rgb = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        ClimplotError::ImageGeneration {
            message: format!("Canvas buffer does not match {}x{}", width, height),
        }
    })?;
    Ok(DynamicImage::ImageRgb8(rgb).into_rgba8())
}

/// Vertical colorbar filling `area`, low values at the bottom
///
/// Returns the canvas rectangle of the color strip.
pub fn draw_colorbar(
    area: &Area<'_>,
    range: DataRange,
    colormap: &dyn Colormap,
    label: &str,
    layout: &Layout,
) -> Result<PixelRect> {
    let span = range.drawable();
    let mut chart = ChartBuilder::on(area)
        .margin_top(layout.margin + layout.label_area / 2)
        .margin_bottom(layout.label_area)
        .margin_right(layout.margin)
        .set_label_area_size(LabelAreaPosition::Right, layout.label_area)
        .build_cartesian_2d(0.0..1.0, span.min..span.max)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_desc(label)
        .label_style(layout.tick_font())
        .axis_desc_style(layout.label_font())
        .draw()?;

    let step = (span.max - span.min) / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|i| {
        let low = span.min + i as f64 * step;
        let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new(
            [(0.0, low), (1.0, low + step)],
            rgb(colormap.map_normalized(t)).filled(),
        )
    }))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(0.0, span.min), (1.0, span.max)],
        &BLACK,
    )))?;

    Ok(pixel_rect(chart.plotting_area()))
}

/// A (lat, lon) grid ready to be painted
#[derive(Debug, Clone, Copy)]
pub struct GridField<'a> {
    /// Rows run south to north, columns west to east
    pub grid: ArrayView2<'a, f64>,
    pub lats: &'a [f64],
    pub lons: &'a [f64],
    /// Values mapped to the ends of the colormap
    pub value_range: DataRange,
}

impl GridField<'_> {
    /// Longitude and latitude ranges covered by the grid
    pub fn extent(&self) -> Result<(DataRange, DataRange)> {
        let lon = DataRange::from_values(self.lons.iter().copied()).ok_or_else(|| {
            ClimplotError::DataNotFound {
                message: "longitude coordinate is empty".to_string(),
            }
        })?;
        let lat = DataRange::from_values(self.lats.iter().copied()).ok_or_else(|| {
            ClimplotError::DataNotFound {
                message: "latitude coordinate is empty".to_string(),
            }
        })?;
        Ok((lon.drawable(), lat.drawable()))
    }
}

/// Fractional index of `coord`; a single-value axis covers its whole extent
fn grid_index(coord: f64, values: &[f64]) -> Option<f64> {
    match values {
        [_] => Some(0.0),
        _ => coord_to_index(coord, values),
    }
}

/// Paint a grid over the whole of `area`, north up and west left
///
/// Every pixel center is mapped to coordinate values, then to fractional
/// grid indices, then sampled with the interpolator. Pixels outside the grid
/// or on NaN cells are left untouched.
pub fn fill_grid(
    area: &Area<'_>,
    field: &GridField<'_>,
    colormap: &dyn Colormap,
    interpolator: &dyn Interpolator,
) -> Result<()> {
    let (lon_range, lat_range) = field.extent()?;
    let (width, height) = area.dim_in_pixel();

    for py in 0..height {
        let lat = lat_range.max - (py as f64 + 0.5) / height as f64 * lat_range.span();
        let Some(row) = grid_index(lat, field.lats) else {
            continue;
        };

        for px in 0..width {
            let lon = lon_range.min + (px as f64 + 0.5) / width as f64 * lon_range.span();
            let Some(col) = grid_index(lon, field.lons) else {
                continue;
            };

            let value = interpolator.interpolate(field.grid, row, col)?;
            if value.is_finite() {
                let range = field.value_range;
                let color = colormap.map(value, range.min, range.max);
                area.draw_pixel((px as i32, py as i32), &rgb(color))?;
            }
        }
    }
    Ok(())
}

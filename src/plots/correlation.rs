//! Correlation heatmap of two monthly-resampled variables.

use chrono::NaiveTime;
use ndarray::Array2;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::PathBuf;
use tracing::debug;

use super::{PlotOutput, HEATMAP_FIGSIZE};
use crate::colormaps::get_colormap;
use crate::config::RenderConfig;
use crate::dataset::{DataArray, TimeSeries};
use crate::error::Result;
use crate::logging::log_timed_operation;
use crate::prepare::align::align_values_to_time;
use crate::prepare::resample::{correlation_matrix, outer_join, resample_monthly, JoinedFrame};
use crate::prepare::time::{date_from_ordinal, ordinal_from_calendar_time};
use crate::render::canvas::{draw_colorbar, pixel_rect, rasterize, rgb, Layout, MISSING};
use crate::render::slug::correlation_heatmap_file;
use crate::render::{save_figure, Annotation, Axes, Colorbar, DataRange, Figure, PixelRect};

/// Correlations are always shown on the full [-1, 1] scale
const CORRELATION_RANGE: DataRange = DataRange { min: -1.0, max: 1.0 };

/// Share of the canvas width given to the matrix, the rest holds the colorbar
const MATRIX_SHARE: f64 = 0.85;

/// Options for [`plot_correlation_heatmap`]
#[derive(Debug, Clone, Default)]
pub struct CorrelationParams {
    pub data1_label: String,
    pub data2_label: String,
    pub save_dir: Option<PathBuf>,
}

/// The heatmap together with the data it was computed from
#[derive(Debug, Clone)]
pub struct CorrelationOutput {
    pub plot: PlotOutput,
    /// Monthly means of both variables on the union of their months
    pub joined: JoinedFrame,
    /// 2×2 pairwise-complete Pearson matrix
    pub matrix: Array2<f64>,
}

/// Flatten a variable, align it to its time axis and round-trip the
/// timestamps through the Gregorian ordinal, keeping the calendar day
fn ordinal_series(array: &DataArray) -> Result<TimeSeries> {
    let values = array.flatten_values();
    let aligned = align_values_to_time(&values, array.time_values());
    let days = ordinal_from_calendar_time(array.time_values())
        .into_iter()
        .map(|ordinal| date_from_ordinal(ordinal).map(|d| d.and_time(NaiveTime::default())))
        .collect::<Result<Vec<_>>>()?;
    TimeSeries::new(days, aligned.to_vec())
}

/// Text shown in a heatmap cell
fn cell_text(r: f64) -> String {
    if r.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.2}", r)
    }
}

/// Correlate two variables month by month and draw the matrix
///
/// Each variable is flattened and truncated to its own time axis, resampled
/// to calendar-month means, and outer-joined with the other before the
/// pairwise-complete Pearson matrix is taken.
pub fn plot_correlation_heatmap(
    render: &RenderConfig,
    data1: &DataArray,
    data2: &DataArray,
    params: &CorrelationParams,
) -> Result<CorrelationOutput> {
    log_timed_operation("plot_correlation_heatmap", || {
        let colormap = get_colormap(&render.diverging_colormap)?;

        let monthly1 = resample_monthly(&ordinal_series(data1)?)?;
        let monthly2 = resample_monthly(&ordinal_series(data2)?)?;
        let joined = outer_join(&[
            (params.data1_label.as_str(), &monthly1),
            (params.data2_label.as_str(), &monthly2),
        ]);
        let matrix = correlation_matrix(&joined);
        debug!(months = joined.index.len(), "Correlation computed");

        let size = render.pixels(HEATMAP_FIGSIZE)?;
        let layout = Layout::for_dpi(render.dpi);
        let title = format!(
            "Correlation Heatmap for {} and {}",
            params.data1_label, params.data2_label
        );

        // Row 0 is drawn at the top
        let k = joined.columns.len();
        let extent = k.max(1) as f64;
        let mut cells = Vec::with_capacity(k * k);
        let mut annotations = Vec::with_capacity(k * k);
        for i in 0..k {
            for j in 0..k {
                let r = matrix[[i, j]];
                let color = if r.is_nan() {
                    MISSING
                } else {
                    colormap.map(r, CORRELATION_RANGE.min, CORRELATION_RANGE.max)
                };
                let (x, y) = (j as f64, (k - i - 1) as f64);
                cells.push(Rectangle::new([(x, y), (x + 1.0, y + 1.0)], rgb(color).filled()));
                annotations.push(Annotation {
                    x: x + 0.5,
                    y: y + 0.5,
                    text: cell_text(r),
                });
            }
        }

        let mut plot_rect = PixelRect::default();
        let mut strip = PixelRect::default();
        let canvas = rasterize(size, |root| {
            let matrix_width = (root.dim_in_pixel().0 as f64 * MATRIX_SHARE).round() as u32;
            let (matrix_area, bar_area) = root.split_horizontally(matrix_width);
            let chart = ChartBuilder::on(&matrix_area)
                .caption(&title, layout.title_font())
                .margin(layout.margin)
                .set_label_area_size(LabelAreaPosition::Left, layout.label_area * 2)
                .set_label_area_size(LabelAreaPosition::Bottom, layout.label_area)
                .build_cartesian_2d(0.0..extent, 0.0..extent)?;

            let area = chart.plotting_area();
            for cell in &cells {
                area.draw(cell)?;
            }
            area.draw(&Rectangle::new([(0.0, 0.0), (extent, extent)], &BLACK))?;

            let centered = Pos::new(HPos::Center, VPos::Center);
            let cell_font = layout.label_font().color(&BLACK).pos(centered);
            for note in &annotations {
                area.draw(&Text::new(note.text.as_str(), (note.x, note.y), cell_font.clone()))?;
            }

            // Variable names beside the rows and under the columns
            let tick_font = layout.tick_font().color(&BLACK);
            let gap = layout.margin as i32;
            for (j, name) in joined.columns.iter().enumerate() {
                let center = j as f64 + 0.5;
                let (x, y) = chart.backend_coord(&(center, 0.0));
                let below = tick_font.pos(Pos::new(HPos::Center, VPos::Top));
                root.draw(&Text::new(name.as_str(), (x, y + gap), below))?;
                let (x, y) = chart.backend_coord(&(0.0, extent - center));
                let left = tick_font.pos(Pos::new(HPos::Right, VPos::Center));
                root.draw(&Text::new(name.as_str(), (x - gap, y), left))?;
            }

            strip = draw_colorbar(&bar_area, CORRELATION_RANGE, colormap.as_ref(), "", &layout)?;
            plot_rect = pixel_rect(chart.plotting_area());
            Ok(())
        })?;

        let mut axes = Axes::new(plot_rect);
        axes.title = title.clone();
        axes.x_range = DataRange::new(0.0, extent);
        axes.y_range = DataRange::new(0.0, extent);
        axes.annotations = annotations;
        axes.colorbar = Some(Colorbar {
            rect: strip,
            label: String::new(),
            range: CORRELATION_RANGE,
            colormap: colormap.name().to_string(),
        });

        let mut figure = Figure::new(canvas);
        figure.title = Some(title);
        figure.axes.push(axes);

        let saved_to = save_figure(
            &figure,
            params.save_dir.as_deref(),
            &correlation_heatmap_file(&params.data1_label, &params.data2_label),
        )?;
        Ok(CorrelationOutput {
            plot: PlotOutput { figure, saved_to },
            joined,
            matrix,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, NaiveDateTime};
    use ndarray::{Array, IxDyn};
    use std::collections::HashMap;

    fn daily(start: (i32, u32, u32), n: usize) -> Vec<NaiveDateTime> {
        let first = NaiveDate::from_ymd_opt(start.0, start.1, start.2)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();
        (0..n).map(|i| first + chrono::Duration::days(i as i64)).collect()
    }

    /// A single-cell field per time step; the flattened values are `f(timestamp)`
    fn point_series(
        name: &str,
        times: Vec<NaiveDateTime>,
        f: impl Fn(&NaiveDateTime) -> f64,
    ) -> DataArray {
        let values: Vec<f64> = times.iter().map(f).collect();
        let data = Array::from_shape_vec(IxDyn(&[times.len(), 1, 1]), values).unwrap();
        let mut coordinates = HashMap::new();
        coordinates.insert("lat".to_string(), vec![10.0]);
        coordinates.insert("lon".to_string(), vec![0.0]);
        DataArray::new(
            name,
            vec!["time".into(), "lat".into(), "lon".into()],
            times,
            coordinates,
            data,
        )
        .unwrap()
    }

    fn small_render() -> RenderConfig {
        RenderConfig {
            dpi: 20,
            ..Default::default()
        }
    }

    fn params() -> CorrelationParams {
        CorrelationParams {
            data1_label: "Rainfall".to_string(),
            data2_label: "Humidity".to_string(),
            save_dir: None,
        }
    }

    #[test]
    fn test_ordinal_series_keeps_calendar_day() {
        let array = point_series("pr", daily((2001, 3, 31), 2), |_| 1.0);
        let series = ordinal_series(&array).unwrap();
        let days: Vec<u32> = series.timestamps().iter().map(|t| t.day()).collect();
        assert_eq!(days, vec![31, 1]);
    }

    #[test]
    fn test_heatmap_of_linearly_related_series() {
        let times = daily((2000, 1, 1), 120);
        let a = point_series("a", times.clone(), |t| t.month() as f64);
        let b = point_series("b", times, |t| 2.0 * t.month() as f64 + 1.0);
        let out = plot_correlation_heatmap(&small_render(), &a, &b, &params()).unwrap();

        assert_eq!(out.joined.index.len(), 4);
        assert!((out.matrix[[0, 1]] - 1.0).abs() < 1e-9);
        let axes = &out.plot.figure.axes[0];
        assert_eq!(axes.title, "Correlation Heatmap for Rainfall and Humidity");
        let texts: Vec<&str> = axes.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["1.00", "1.00", "1.00", "1.00"]);
        assert_eq!(axes.colorbar.as_ref().unwrap().range, CORRELATION_RANGE);
    }

    #[test]
    fn test_disjoint_months_leave_gaps() {
        let a = point_series("a", daily((2000, 1, 1), 60), |t| t.day() as f64);
        let b = point_series("b", daily((2000, 2, 1), 90), |t| t.day() as f64);
        let out = plot_correlation_heatmap(&small_render(), &a, &b, &params()).unwrap();

        // January only has the first column, April only the second.
        assert!(out.joined.data[[0, 1]].is_nan());
        assert!(!out.joined.data[[0, 0]].is_nan());
        assert!(out.joined.data[[3, 0]].is_nan());
        assert!(!out.joined.data[[3, 1]].is_nan());
        assert_eq!(
            out.joined.columns,
            vec!["Rainfall".to_string(), "Humidity".to_string()]
        );
    }

    #[test]
    fn test_heatmap_cells_use_the_diverging_colormap() {
        let times = daily((2000, 1, 1), 120);
        let a = point_series("a", times.clone(), |t| t.month() as f64);
        let b = point_series("b", times, |t| -(t.month() as f64));
        let render = RenderConfig {
            dpi: 40,
            ..Default::default()
        };
        let out = plot_correlation_heatmap(&render, &a, &b, &params()).unwrap();
        assert!((out.matrix[[0, 1]] + 1.0).abs() < 1e-9);

        let cmap = get_colormap(&render.diverging_colormap).unwrap();
        let axes = &out.plot.figure.axes[0];
        let canvas = &out.plot.figure.canvas;
        // Upper-left cell is r = 1, upper-right is r = -1; sample near their corners
        let rect = axes.rect;
        let top_left = canvas.get_pixel(rect.x + 2, rect.y + 2).0;
        let top_right = canvas.get_pixel(rect.right() - 3, rect.y + 2).0;
        assert_eq!(top_left, cmap.map(1.0, -1.0, 1.0));
        assert_eq!(top_right, cmap.map(-1.0, -1.0, 1.0));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(0.456), "0.46");
        assert_eq!(cell_text(-1.0), "-1.00");
        assert_eq!(cell_text(f64::NAN), "nan");
    }
}

//! Single and dual-axis time series charts.

use chrono::NaiveDateTime;
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::debug;

use super::{PlotOutput, TIME_SERIES_FIGSIZE};
use crate::colormaps::color_or_cycle;
use crate::config::RenderConfig;
use crate::dataset::TimeSeries;
use crate::error::Result;
use crate::logging::log_timed_operation;
use crate::prepare::time::{calendar_time_from_datenum, datenum_from_calendar_time};
use crate::render::canvas::{draw_legend, label_series, pixel_rect, rasterize, rgb, Layout, XyCoord};
use crate::render::figure::AXIS_MARGIN;
use crate::render::slug::{dual_time_series_file, time_series_file};
use crate::render::{
    save_figure, Axes, DataRange, Figure, Legend, LegendEntry, LegendLocation, PixelRect,
    SecondaryAxis,
};

/// Line width of series, in pixels
const LINE_WIDTH: u32 = 2;

/// Number of date ticks on the time axis
const TIME_TICKS: usize = 6;

/// Options for [`plot_time_series`]
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesParams {
    /// Shown in the legend, y label and title
    pub variable_name: String,
    /// Unit of the values, shown in the y label
    pub unit: String,
    /// CSS color name or hex; the first cycle color when absent
    pub color: Option<String>,
    /// Where to write the PNG; nothing is written when absent
    pub save_dir: Option<PathBuf>,
}

impl TimeSeriesParams {
    pub fn new(variable_name: impl Into<String>) -> Self {
        Self {
            variable_name: variable_name.into(),
            ..Default::default()
        }
    }
}

/// Label, unit and color of one series in a dual chart
#[derive(Debug, Clone, Default)]
pub struct SeriesStyle {
    pub label: String,
    pub unit: String,
    pub color: Option<String>,
}

/// Options for [`plot_dual_time_series`]
#[derive(Debug, Clone, Default)]
pub struct DualTimeSeriesParams {
    /// Drawn against the left y axis
    pub primary: SeriesStyle,
    /// Drawn against the right y axis
    pub secondary: SeriesStyle,
    pub save_dir: Option<PathBuf>,
}

/// Date-numbers of the series and the range covering them
fn x_positions(series: &TimeSeries) -> (Vec<f64>, Option<DataRange>) {
    let x = datenum_from_calendar_time(series.timestamps());
    let range = DataRange::from_values(x.iter().copied());
    (x, range)
}

fn y_range(series: &TimeSeries) -> DataRange {
    DataRange::from_values(series.values().iter().copied())
        .map(|r| r.padded(AXIS_MARGIN))
        .unwrap_or(DataRange::new(0.0, 1.0))
}

fn y_label(name: &str, unit: &str) -> String {
    format!("{} ({})", name, unit)
}

/// Tick label of a date-number axis
fn date_label(datenum: &f64) -> String {
    calendar_time_from_datenum(*datenum)
        .map(|t| t.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Finite stretches of a series; the line breaks at NaN values
fn line_runs(x: &[f64], values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (&xv, &yv) in x.iter().zip(values) {
        if yv.is_finite() {
            current.push((xv, yv));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Time axis labels, primary y label and tick fonts
fn configure_time_mesh<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, XyCoord>,
    y_desc: &str,
    layout: &Layout,
) -> Result<()> {
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(TIME_TICKS)
        .x_label_formatter(&date_label)
        .x_desc("Time")
        .y_desc(y_desc)
        .label_style(layout.tick_font())
        .axis_desc_style(layout.label_font())
        .draw()?;
    Ok(())
}

/// Plot one variable against time
///
/// `values` is first truncated to the length of `time`; fewer values than
/// timestamps is a [`crate::ClimplotError::ShapeMismatch`].
pub fn plot_time_series(
    render: &RenderConfig,
    time: &[NaiveDateTime],
    values: &[f64],
    params: &TimeSeriesParams,
) -> Result<PlotOutput> {
    log_timed_operation("plot_time_series", || {
        let series = TimeSeries::from_unaligned(time, values)?;
        let color = color_or_cycle(params.color.as_deref(), 0)?;
        let size = render.pixels(TIME_SERIES_FIGSIZE)?;
        let layout = Layout::for_dpi(render.dpi);

        let title = format!("{} Time Series", params.variable_name);
        let y_desc = y_label(&params.variable_name, &params.unit);
        let (x, x_range) = x_positions(&series);
        let x_range = x_range
            .map(|r| r.padded(AXIS_MARGIN))
            .unwrap_or(DataRange::new(0.0, 1.0));
        let y_range = y_range(&series);
        let runs = line_runs(&x, series.values());
        debug!(samples = x.len(), runs = runs.len(), "Drawing time series");

        let mut plot_rect = PixelRect::default();
        let canvas = rasterize(size, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(&title, layout.title_font())
                .margin(layout.margin)
                .set_label_area_size(LabelAreaPosition::Left, layout.label_area)
                .set_label_area_size(LabelAreaPosition::Bottom, layout.label_area)
                .build_cartesian_2d(x_range.to_range(), y_range.to_range())?;
            configure_time_mesh(&mut chart, &y_desc, &layout)?;

            let style = rgb(color).stroke_width(LINE_WIDTH);
            for run in &runs {
                chart.draw_series(LineSeries::new(run.iter().copied(), style))?;
            }
            label_series(&mut chart, &params.variable_name, style, layout.swatch())?;
            draw_legend(&mut chart, SeriesLabelPosition::UpperRight, &layout)?;

            plot_rect = pixel_rect(chart.plotting_area());
            Ok(())
        })?;

        let mut axes = Axes::new(plot_rect);
        axes.title = title.clone();
        axes.x_label = "Time".to_string();
        axes.y_label = y_desc;
        axes.x_range = x_range;
        axes.y_range = y_range;
        axes.legends.push(Legend {
            location: LegendLocation::UpperRight,
            entries: vec![LegendEntry {
                label: params.variable_name.clone(),
                color,
            }],
        });

        let mut figure = Figure::new(canvas);
        figure.title = Some(title);
        figure.axes.push(axes);

        let saved_to = save_figure(
            &figure,
            params.save_dir.as_deref(),
            &time_series_file(&params.variable_name),
        )?;
        Ok(PlotOutput { figure, saved_to })
    })
}

/// Plot two variables on a shared time axis with independent y axes
///
/// Each series is aligned to its own time axis first.
pub fn plot_dual_time_series(
    render: &RenderConfig,
    primary_time: &[NaiveDateTime],
    primary_values: &[f64],
    secondary_time: &[NaiveDateTime],
    secondary_values: &[f64],
    params: &DualTimeSeriesParams,
) -> Result<PlotOutput> {
    log_timed_operation("plot_dual_time_series", || {
        let primary = TimeSeries::from_unaligned(primary_time, primary_values)?;
        let secondary = TimeSeries::from_unaligned(secondary_time, secondary_values)?;
        let primary_color = color_or_cycle(params.primary.color.as_deref(), 0)?;
        let secondary_color = color_or_cycle(params.secondary.color.as_deref(), 1)?;
        let size = render.pixels(TIME_SERIES_FIGSIZE)?;
        let layout = Layout::for_dpi(render.dpi);

        let title = format!(
            "{} VS {} Time Series",
            params.primary.label, params.secondary.label
        );
        let primary_desc = y_label(&params.primary.label, &params.primary.unit);
        let secondary_desc = y_label(&params.secondary.label, &params.secondary.unit);

        let (x1, r1) = x_positions(&primary);
        let (x2, r2) = x_positions(&secondary);
        let x_range = match (r1, r2) {
            (Some(a), Some(b)) => a.union(b).padded(AXIS_MARGIN),
            (Some(r), None) | (None, Some(r)) => r.padded(AXIS_MARGIN),
            (None, None) => DataRange::new(0.0, 1.0),
        };
        let primary_range = y_range(&primary);
        let secondary_range = y_range(&secondary);
        let primary_runs = line_runs(&x1, primary.values());
        let secondary_runs = line_runs(&x2, secondary.values());

        let mut plot_rect = PixelRect::default();
        let canvas = rasterize(size, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(&title, layout.title_font())
                .margin(layout.margin)
                .set_label_area_size(LabelAreaPosition::Left, layout.label_area)
                .set_label_area_size(LabelAreaPosition::Right, layout.label_area)
                .set_label_area_size(LabelAreaPosition::Bottom, layout.label_area)
                .build_cartesian_2d(x_range.to_range(), primary_range.to_range())?
                .set_secondary_coord(x_range.to_range(), secondary_range.to_range());
            configure_time_mesh(&mut *chart, &primary_desc, &layout)?;
            chart
                .configure_secondary_axes()
                .y_desc(&secondary_desc)
                .label_style(layout.tick_font())
                .axis_desc_style(layout.label_font())
                .draw()?;

            let primary_style = rgb(primary_color).stroke_width(LINE_WIDTH);
            let secondary_style = rgb(secondary_color).stroke_width(LINE_WIDTH);
            for run in &primary_runs {
                chart.draw_series(LineSeries::new(run.iter().copied(), primary_style))?;
            }
            for run in &secondary_runs {
                let line = LineSeries::new(run.iter().copied(), secondary_style);
                chart.draw_secondary_series(line)?;
            }
            let swatch = layout.swatch();
            label_series(&mut *chart, &params.primary.label, primary_style, swatch)?;
            draw_legend(&mut *chart, SeriesLabelPosition::UpperLeft, &layout)?;

            // Second legend box in the other corner of the same plotting area
            let plotting = chart.plotting_area().strip_coord_spec();
            let mut overlay = ChartBuilder::on(&plotting)
                .build_cartesian_2d(x_range.to_range(), secondary_range.to_range())?;
            label_series(&mut overlay, &params.secondary.label, secondary_style, swatch)?;
            draw_legend(&mut overlay, SeriesLabelPosition::UpperRight, &layout)?;

            plot_rect = pixel_rect(chart.plotting_area());
            Ok(())
        })?;

        let mut axes = Axes::new(plot_rect);
        axes.title = title.clone();
        axes.x_label = "Time".to_string();
        axes.y_label = primary_desc;
        axes.x_range = x_range;
        axes.y_range = primary_range;
        axes.secondary = Some(SecondaryAxis {
            label: secondary_desc,
            range: secondary_range,
        });
        axes.legends = vec![
            Legend {
                location: LegendLocation::UpperLeft,
                entries: vec![LegendEntry {
                    label: params.primary.label.clone(),
                    color: primary_color,
                }],
            },
            Legend {
                location: LegendLocation::UpperRight,
                entries: vec![LegendEntry {
                    label: params.secondary.label.clone(),
                    color: secondary_color,
                }],
            },
        ];

        let mut figure = Figure::new(canvas);
        figure.title = Some(title);
        figure.axes.push(axes);

        let saved_to = save_figure(
            &figure,
            params.save_dir.as_deref(),
            &dual_time_series_file(&params.primary.label, &params.secondary.label),
        )?;
        Ok(PlotOutput { figure, saved_to })
    })
}

//! Scatter of held-out samples with their least squares line.

use plotters::prelude::*;
use std::path::PathBuf;
use tracing::info;

use super::{format_sci, PlotOutput, REGRESSION_FIGSIZE};
use crate::colormaps::parse_color;
use crate::config::RenderConfig;
use crate::error::{ClimplotError, Result};
use crate::logging::log_timed_operation;
use crate::prepare::regression::{
    fit_linear_regression, train_test_split, LinearFit, SplitDataset, DEFAULT_SEED,
    DEFAULT_TEST_FRACTION,
};
use crate::render::canvas::{draw_legend, pixel_rect, rasterize, rgb, Layout};
use crate::render::figure::AXIS_MARGIN;
use crate::render::slug::linear_regression_file;
use crate::render::{
    save_figure, Axes, DataRange, Figure, Legend, LegendEntry, LegendLocation, PixelRect,
};

/// Width of the fitted line, in pixels
const LINE_WIDTH: u32 = 2;

/// Options for [`visualize_linear_regression`]
#[derive(Debug, Clone)]
pub struct RegressionParams {
    /// Share of samples held out and plotted
    pub test_fraction: f64,
    /// Seed of the train/test permutation
    pub seed: u64,
    pub x_label: String,
    pub y_label: String,
    pub x_unit: String,
    pub y_unit: String,
    pub save_dir: Option<PathBuf>,
}

impl Default for RegressionParams {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            x_label: String::new(),
            y_label: String::new(),
            x_unit: String::new(),
            y_unit: String::new(),
            save_dir: None,
        }
    }
}

/// The chart plus the fitted model and the partitions behind it
#[derive(Debug, Clone)]
pub struct RegressionOutput {
    pub plot: PlotOutput,
    pub split: SplitDataset,
    pub fit: LinearFit,
    /// Model predictions for `split.x_test`, in the same order
    pub predictions: Vec<f64>,
}

/// Legend text of the fitted line, e.g. `Regression Line (y = 2.00e+00x + 0.00e+00)`
fn line_label(fit: &LinearFit) -> String {
    format!(
        "Regression Line (y = {}x + {})",
        format_sci(fit.slope, 2),
        format_sci(fit.intercept, 2)
    )
}

fn padded_range(values: &[f64]) -> DataRange {
    DataRange::from_values(values.iter().copied())
        .map(|r| r.padded(AXIS_MARGIN))
        .unwrap_or(DataRange::new(0.0, 1.0))
}

/// Split the samples, fit y on x with the training part and plot the test part
///
/// `x` and `y` are paired sample by sample. Every sample must be finite.
pub fn visualize_linear_regression(
    render: &RenderConfig,
    x: &[f64],
    y: &[f64],
    params: &RegressionParams,
) -> Result<RegressionOutput> {
    log_timed_operation("visualize_linear_regression", || {
        if let Some(bad) = x.iter().chain(y).find(|v| !v.is_finite()) {
            return Err(ClimplotError::invalid_parameter(
                "samples",
                format!("regression input contains a non-finite value ({})", bad),
            ));
        }

        let split = train_test_split(x, y, params.test_fraction, params.seed)?;
        let fit = fit_linear_regression(&split.x_train, &split.y_train)?;
        let predictions = fit.predict(&split.x_test);
        info!(
            train = split.x_train.len(),
            test = split.x_test.len(),
            slope = fit.slope,
            intercept = fit.intercept,
            "Linear regression fitted"
        );

        let scatter_color = parse_color("blue")?;
        let line_color = parse_color("red")?;

        let size = render.pixels(REGRESSION_FIGSIZE)?;
        let layout = Layout::for_dpi(render.dpi);
        let title = format!(
            "Linear Regression: Vertical {} vs. {}",
            params.x_label, params.y_label
        );
        let x_desc = format!("{} {}", params.x_label, params.x_unit);
        let y_desc = format!("{} {}", params.y_label, params.y_unit);
        let fitted_label = line_label(&fit);

        let x_range = padded_range(&split.x_test);
        let y_values: Vec<f64> = split.y_test.iter().chain(&predictions).copied().collect();
        let y_range = padded_range(&y_values);

        // Sorted so the line does not double back on itself
        let mut line: Vec<(f64, f64)> = split
            .x_test
            .iter()
            .copied()
            .zip(predictions.iter().copied())
            .collect();
        line.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut plot_rect = PixelRect::default();
        let canvas = rasterize(size, |root| {
            let mut chart = ChartBuilder::on(root)
                .caption(&title, layout.title_font())
                .margin(layout.margin)
                .set_label_area_size(LabelAreaPosition::Left, layout.label_area)
                .set_label_area_size(LabelAreaPosition::Bottom, layout.label_area)
                .build_cartesian_2d(x_range.to_range(), y_range.to_range())?;
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(&x_desc)
                .y_desc(&y_desc)
                .label_style(layout.tick_font())
                .axis_desc_style(layout.label_font())
                .draw()?;

            let marker = (layout.tick_size / 3.0).round().max(2.0) as u32;
            let scatter = rgb(scatter_color).filled();
            chart
                .draw_series(
                    split
                        .x_test
                        .iter()
                        .zip(&split.y_test)
                        .map(|(&xi, &yi)| Circle::new((xi, yi), marker, scatter)),
                )?
                .label("Actual Data")
                .legend(move |(x, y)| Circle::new((x, y), marker, scatter));

            let stroke = rgb(line_color).stroke_width(LINE_WIDTH);
            let swatch = layout.swatch();
            chart
                .draw_series(LineSeries::new(line.iter().copied(), stroke))?
                .label(fitted_label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + swatch, y)], stroke));

            draw_legend(&mut chart, SeriesLabelPosition::UpperLeft, &layout)?;
            plot_rect = pixel_rect(chart.plotting_area());
            Ok(())
        })?;

        let mut axes = Axes::new(plot_rect);
        axes.title = title.clone();
        axes.x_label = x_desc;
        axes.y_label = y_desc;
        axes.x_range = x_range;
        axes.y_range = y_range;
        axes.legends.push(Legend {
            location: LegendLocation::UpperLeft,
            entries: vec![
                LegendEntry {
                    label: "Actual Data".to_string(),
                    color: scatter_color,
                },
                LegendEntry {
                    label: fitted_label,
                    color: line_color,
                },
            ],
        });

        let mut figure = Figure::new(canvas);
        figure.title = Some(title);
        figure.axes.push(axes);

        let saved_to = save_figure(
            &figure,
            params.save_dir.as_deref(),
            &linear_regression_file(&params.x_label, &params.y_label),
        )?;
        Ok(RegressionOutput {
            plot: PlotOutput { figure, saved_to },
            split,
            fit,
            predictions,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render() -> RenderConfig {
        RenderConfig {
            dpi: 20,
            ..Default::default()
        }
    }

    fn params() -> RegressionParams {
        RegressionParams {
            x_label: "Wind Speed".to_string(),
            y_label: "Temperature".to_string(),
            x_unit: "m/s".to_string(),
            y_unit: "K".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let p = RegressionParams::default();
        assert_eq!(p.test_fraction, 0.2);
        assert_eq!(p.seed, 42);
    }

    #[test]
    fn test_line_label_uses_signed_exponents() {
        let fit = LinearFit {
            slope: 2.0,
            intercept: -0.00123,
        };
        assert_eq!(line_label(&fit), "Regression Line (y = 2.00e+00x + -1.23e-03)");
    }

    #[test]
    fn test_regression_chart() {
        let x: Vec<f64> = (0..50).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
        let out = visualize_linear_regression(&render(), &x, &y, &params()).unwrap();

        assert_eq!(out.split.x_test.len(), 10);
        assert_eq!(out.predictions.len(), 10);
        assert!((out.fit.slope - 3.0).abs() < 1e-9);
        assert!((out.fit.intercept - 1.0).abs() < 1e-9);

        let axes = &out.plot.figure.axes[0];
        assert_eq!(axes.title, "Linear Regression: Vertical Wind Speed vs. Temperature");
        assert_eq!(axes.x_label, "Wind Speed m/s");
        assert_eq!(axes.y_label, "Temperature K");
        let labels: Vec<&str> = axes.legends[0].entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Actual Data", "Regression Line (y = 3.00e+00x + 1.00e+00)"]
        );
        assert_eq!((out.plot.figure.width(), out.plot.figure.height()), (200, 120));
    }

    #[test]
    fn test_regression_draws_markers_and_line() {
        let x: Vec<f64> = (0..50).map(|v| v as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v - 2.0).collect();
        let render = RenderConfig {
            dpi: 50,
            ..Default::default()
        };
        let out = visualize_linear_regression(&render, &x, &y, &params()).unwrap();

        let count = |color: [u8; 4]| {
            out.plot
                .figure
                .canvas
                .pixels()
                .filter(|p| p.0 == color)
                .count()
        };
        assert!(count([0, 0, 255, 255]) > 10, "scatter markers missing");
        assert!(count([255, 0, 0, 255]) > 10, "regression line missing");
    }

    #[test]
    fn test_regression_rejects_nan() {
        let err = visualize_linear_regression(&render(), &[1.0, f64::NAN], &[1.0, 2.0], &params())
            .unwrap_err();
        assert!(matches!(err, ClimplotError::InvalidParameter { .. }));
    }

    #[test]
    fn test_regression_saves_file() {
        let dir = tempfile::tempdir().unwrap();
        let params = RegressionParams {
            save_dir: Some(dir.path().to_path_buf()),
            ..params()
        };
        let x: Vec<f64> = (0..20).map(|v| v as f64).collect();
        let out = visualize_linear_regression(&render(), &x, &x, &params).unwrap();
        assert_eq!(
            out.plot.saved_to,
            Some(dir.path().join("wind_speed_and_temperature_linear_regression.png"))
        );
    }
}

//! climplot - plot preparation and rendering for gridded climate data
//!
//! This is the command-line entry point. Each subcommand loads one or two
//! variables from a dataset file and renders one chart kind.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use climplot::plots::{
    DualTimeSeriesParams, MapParams, RegressionParams, SeriesStyle, TimeSeriesParams,
};
use climplot::plots::{CorrelationParams, PlotOutput};
use climplot::prepare::regression::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use climplot::{
    init_tracing, inspect_dataset, load_dataset, log_error, Config, DataArray, GlobalArgs,
    TimeSeries,
};

#[derive(Parser, Debug)]
#[command(name = "climplot", version, about = "Render charts of gridded climate data")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Area-mean time series of one variable
    TimeSeries(TimeSeriesArgs),
    /// Two area-mean time series with separate y axes
    DualTimeSeries(DualTimeSeriesArgs),
    /// Map of the first time step
    Geoplot(MapArgs),
    /// 2x2 map of DJF, MAM, JJA and SON means
    Seasonal(MapArgs),
    /// Three 2x2 maps of monthly means
    Monthly(MapArgs),
    /// Heatmap of the monthly correlation between two variables
    Correlation(CorrelationArgs),
    /// Linear regression of one variable on another
    Regression(RegressionArgs),
    /// List the variables of a dataset file
    Inspect {
        /// Dataset file (.json, or .nc with the netcdf feature)
        data: PathBuf,
    },
}

#[derive(Args, Debug)]
struct VariableArgs {
    /// Dataset file (.json, or .nc with the netcdf feature)
    data: PathBuf,

    /// Variable to plot
    #[arg(short, long)]
    variable: String,

    /// Label for titles and file names; defaults to the variable name
    #[arg(short, long)]
    label: Option<String>,

    /// Unit; defaults to the variable's units attribute
    #[arg(short, long)]
    unit: Option<String>,
}

impl VariableArgs {
    fn load(&self) -> anyhow::Result<(DataArray, String, String)> {
        let array = load_dataset(&self.data, &self.variable)
            .with_context(|| format!("loading {} from {}", self.variable, self.data.display()))?;
        let label = self.label.clone().unwrap_or_else(|| self.variable.clone());
        let unit = self
            .unit
            .clone()
            .or_else(|| array.units.clone())
            .unwrap_or_default();
        Ok((array, label, unit))
    }
}

#[derive(Args, Debug)]
struct TimeSeriesArgs {
    #[command(flatten)]
    variable: VariableArgs,

    /// Line color, a CSS name or hex string
    #[arg(long)]
    color: Option<String>,
}

#[derive(Args, Debug)]
struct DualTimeSeriesArgs {
    /// Dataset file holding both variables
    data: PathBuf,

    /// Variable drawn against the left axis
    #[arg(long)]
    primary: String,

    /// Variable drawn against the right axis
    #[arg(long)]
    secondary: String,

    /// Read the secondary variable from this file instead
    #[arg(long)]
    secondary_data: Option<PathBuf>,

    #[arg(long)]
    primary_label: Option<String>,

    #[arg(long)]
    secondary_label: Option<String>,

    /// Unit of the primary variable; defaults to its units attribute
    #[arg(long)]
    primary_unit: Option<String>,

    /// Unit of the secondary variable; defaults to its units attribute
    #[arg(long)]
    secondary_unit: Option<String>,

    #[arg(long)]
    primary_color: Option<String>,

    #[arg(long)]
    secondary_color: Option<String>,
}

#[derive(Args, Debug)]
struct MapArgs {
    #[command(flatten)]
    variable: VariableArgs,
}

#[derive(Args, Debug)]
struct CorrelationArgs {
    /// Dataset file holding both variables
    data: PathBuf,

    /// First variable
    #[arg(long)]
    first: String,

    /// Second variable
    #[arg(long)]
    second: String,

    /// Read the second variable from this file instead
    #[arg(long)]
    second_data: Option<PathBuf>,

    #[arg(long)]
    first_label: Option<String>,

    #[arg(long)]
    second_label: Option<String>,
}

#[derive(Args, Debug)]
struct RegressionArgs {
    /// Dataset file holding both variables
    data: PathBuf,

    /// Independent variable
    #[arg(short)]
    x: String,

    /// Dependent variable
    #[arg(short)]
    y: String,

    #[arg(long)]
    x_label: Option<String>,

    #[arg(long)]
    y_label: Option<String>,

    #[arg(long)]
    x_unit: Option<String>,

    #[arg(long)]
    y_unit: Option<String>,

    /// Share of samples held out and plotted
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Seed of the train/test permutation
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn load(path: &Path, variable: &str) -> anyhow::Result<DataArray> {
    load_dataset(path, variable)
        .with_context(|| format!("loading {} from {}", variable, path.display()))
}

/// An explicit unit, else the variable's own units attribute
fn unit_or_attribute(unit: Option<String>, array: &DataArray) -> String {
    unit.or_else(|| array.units.clone()).unwrap_or_default()
}

fn report(output: &PlotOutput) {
    match &output.saved_to {
        Some(path) => info!("Wrote {}", path.display()),
        None => info!(
            "Rendered {}x{} figure; pass --save-dir to write it",
            output.figure.width(),
            output.figure.height()
        ),
    }
}

fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let render = &config.render;
    let save_dir = config.output.save_dir.clone();

    match cli.command {
        Command::TimeSeries(args) => {
            let (array, label, unit) = args.variable.load()?;
            let series = TimeSeries::area_mean(&array)?;
            let params = TimeSeriesParams {
                variable_name: label,
                unit,
                color: args.color,
                save_dir,
            };
            let out =
                climplot::plot_time_series(render, series.timestamps(), series.values(), &params)?;
            report(&out);
        }
        Command::DualTimeSeries(args) => {
            let primary = load(&args.data, &args.primary)?;
            let secondary_path = args.secondary_data.as_deref().unwrap_or(&args.data);
            let secondary = load(secondary_path, &args.secondary)?;
            let p = TimeSeries::area_mean(&primary)?;
            let s = TimeSeries::area_mean(&secondary)?;
            let params = DualTimeSeriesParams {
                primary: SeriesStyle {
                    label: args.primary_label.unwrap_or(args.primary),
                    unit: unit_or_attribute(args.primary_unit, &primary),
                    color: args.primary_color,
                },
                secondary: SeriesStyle {
                    label: args.secondary_label.unwrap_or(args.secondary),
                    unit: unit_or_attribute(args.secondary_unit, &secondary),
                    color: args.secondary_color,
                },
                save_dir,
            };
            let out = climplot::plot_dual_time_series(
                render,
                p.timestamps(),
                p.values(),
                s.timestamps(),
                s.values(),
                &params,
            )?;
            report(&out);
        }
        Command::Geoplot(args) => {
            let (array, label, unit) = args.variable.load()?;
            let params = MapParams {
                variable_label: label,
                unit,
                save_dir,
            };
            report(&climplot::plot_geomap(render, &array, &params)?);
        }
        Command::Seasonal(args) => {
            let (array, label, unit) = args.variable.load()?;
            let params = MapParams {
                variable_label: label,
                unit,
                save_dir,
            };
            report(&climplot::plot_seasonal_maps(render, &array, &params)?);
        }
        Command::Monthly(args) => {
            let (array, label, unit) = args.variable.load()?;
            let params = MapParams {
                variable_label: label,
                unit,
                save_dir,
            };
            for out in climplot::plot_monthly_maps(render, &array, &params)? {
                report(&out);
            }
        }
        Command::Correlation(args) => {
            let first = load(&args.data, &args.first)?;
            let second_path = args.second_data.as_deref().unwrap_or(&args.data);
            let second = load(second_path, &args.second)?;
            // One value per time step: gridded variables are reduced to their area mean.
            let first = TimeSeries::area_mean(&first)?.to_data_array(&args.first)?;
            let second = TimeSeries::area_mean(&second)?.to_data_array(&args.second)?;
            let params = CorrelationParams {
                data1_label: args.first_label.unwrap_or(args.first),
                data2_label: args.second_label.unwrap_or(args.second),
                save_dir,
            };
            let out = climplot::plot_correlation_heatmap(render, &first, &second, &params)?;
            info!(
                months = out.joined.index.len(),
                r = out.matrix[[0, 1]],
                "Monthly correlation"
            );
            report(&out.plot);
        }
        Command::Regression(args) => {
            let x = load(&args.data, &args.x)?;
            let y = load(&args.data, &args.y)?;
            let params = RegressionParams {
                test_fraction: args.test_fraction,
                seed: args.seed,
                x_unit: args.x_unit.or_else(|| x.units.clone()).unwrap_or_default(),
                y_unit: args.y_unit.or_else(|| y.units.clone()).unwrap_or_default(),
                x_label: args.x_label.unwrap_or(args.x),
                y_label: args.y_label.unwrap_or(args.y),
                save_dir,
            };
            let out = climplot::visualize_linear_regression(
                render,
                &x.flatten_values(),
                &y.flatten_values(),
                &params,
            )?;
            info!(slope = out.fit.slope, intercept = out.fit.intercept, "Fitted line");
            report(&out.plot);
        }
        Command::Inspect { data } => {
            let summaries = inspect_dataset(&data)
                .with_context(|| format!("inspecting {}", data.display()))?;
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.global).context("loading configuration")?;
    init_tracing(&config.log_level);
    info!("Starting climplot v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        log_error(&e, "configuration");
        e
    })?;

    run(cli, &config).map_err(|e| {
        error!("{:#}", e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};
    use std::collections::HashMap;

    #[test]
    fn test_dual_time_series_accepts_units() {
        let cli = Cli::try_parse_from([
            "climplot",
            "dual-time-series",
            "data.json",
            "--primary",
            "t2m",
            "--secondary",
            "pr",
            "--primary-unit",
            "degC",
            "--secondary-unit",
            "mm/day",
        ])
        .unwrap();

        let Command::DualTimeSeries(args) = cli.command else {
            panic!("expected the dual-time-series subcommand");
        };
        assert_eq!(args.primary_unit.as_deref(), Some("degC"));
        assert_eq!(args.secondary_unit.as_deref(), Some("mm/day"));
    }

    #[test]
    fn test_unit_falls_back_to_attribute() {
        let data = Array::from_shape_vec(IxDyn(&[2]), vec![1.0, 2.0]).unwrap();
        let mut coordinates = HashMap::new();
        coordinates.insert("lat".to_string(), vec![0.0, 1.0]);
        let array = DataArray::new("t2m", vec!["lat".into()], Vec::new(), coordinates, data)
            .unwrap()
            .with_units("K");

        assert_eq!(unit_or_attribute(Some("degC".to_string()), &array), "degC");
        assert_eq!(unit_or_attribute(None, &array), "K");
    }
}

//! Filled latitude/longitude maps: a single time slice, seasonal means
//! and monthly means.

use ndarray::Array2;
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

use super::{PlotOutput, MAP_FIGSIZE, MAP_GRID_FIGSIZE};
use crate::colormaps::{get_colormap, Colormap};
use crate::config::RenderConfig;
use crate::dataset::DataArray;
use crate::error::{ClimplotError, Result};
use crate::interpolation::{get_interpolator, Interpolator};
use crate::logging::log_timed_operation;
use crate::prepare::grouping::{mean_over_time, select_array_by_months, MONTH_BATCHES, SEASONS};
use crate::render::canvas::{
    draw_colorbar, fill_grid, pixel_rect, rasterize, Area, GridField, Layout,
};
use crate::render::slug::{geoplot_file, monthly_geoplot_file, seasonal_geoplot_file};
use crate::render::{save_figure, Axes, Colorbar, DataRange, Figure};

/// Approximate number of gridlines per axis
const GRID_TICKS: usize = 5;

/// Share of a panel's width given to the map, the rest holds the colorbar
const MAP_SHARE: f64 = 0.8;

/// Options shared by the map operations
#[derive(Debug, Clone, Default)]
pub struct MapParams {
    /// Human-readable variable label used in titles and file names
    pub variable_label: String,
    /// Unit appended to the colorbar label
    pub unit: String,
    pub save_dir: Option<PathBuf>,
}

impl MapParams {
    fn colorbar_label(&self) -> String {
        if self.unit.is_empty() {
            self.variable_label.clone()
        } else {
            format!("{} {}", self.variable_label, self.unit)
        }
    }
}

/// Colormap and sampler resolved once per figure
struct MapStyle {
    colormap_name: String,
    colormap: Box<dyn Colormap>,
    interpolator: Box<dyn Interpolator>,
}

impl MapStyle {
    fn from_config(render: &RenderConfig) -> Result<Self> {
        Ok(Self {
            colormap_name: render.colormap.clone(),
            colormap: get_colormap(&render.colormap)?,
            interpolator: get_interpolator(&render.resampling)?,
        })
    }
}

/// A titled grid to draw as one map panel
struct MapPanel<'a> {
    title: String,
    colorbar_label: String,
    grid: &'a Array2<f64>,
    lats: &'a [f64],
    lons: &'a [f64],
}

impl MapPanel<'_> {
    fn field(&self) -> GridField<'_> {
        GridField {
            grid: self.grid.view(),
            lats: self.lats,
            lons: self.lons,
            value_range: DataRange::from_values(self.grid.iter().copied())
                .unwrap_or(DataRange::new(0.0, 1.0)),
        }
    }
}

/// Draw a map with gridlines and its colorbar into `area`
fn draw_map_panel(
    area: &Area<'_>,
    panel: &MapPanel<'_>,
    style: &MapStyle,
    layout: &Layout,
) -> Result<Axes> {
    let field = panel.field();
    let (lon_extent, lat_extent) = field.extent()?;
    let map_width = (area.dim_in_pixel().0 as f64 * MAP_SHARE).round() as u32;
    let (map_area, bar_area) = area.split_horizontally(map_width);

    let mut chart = ChartBuilder::on(&map_area)
        .caption(&panel.title, layout.title_font())
        .margin(layout.margin)
        .set_label_area_size(LabelAreaPosition::Left, layout.label_area)
        .set_label_area_size(LabelAreaPosition::Bottom, layout.label_area)
        .build_cartesian_2d(lon_extent.to_range(), lat_extent.to_range())?;

    let plotting = chart.plotting_area().strip_coord_spec();
    fill_grid(&plotting, &field, style.colormap.as_ref(), style.interpolator.as_ref())?;

    chart
        .configure_mesh()
        .x_labels(GRID_TICKS)
        .y_labels(GRID_TICKS)
        .max_light_lines(0)
        .bold_line_style(&BLACK.mix(0.3))
        .x_desc("Longitude")
        .y_desc("Latitude")
        .label_style(layout.tick_font())
        .axis_desc_style(layout.label_font())
        .draw()?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(lon_extent.min, lat_extent.min), (lon_extent.max, lat_extent.max)],
        &BLACK,
    )))?;

    let strip = draw_colorbar(
        &bar_area,
        field.value_range,
        style.colormap.as_ref(),
        &panel.colorbar_label,
        layout,
    )?;

    let (lon_range, lat_range) = (
        DataRange::from_values(panel.lons.iter().copied()).unwrap_or(lon_extent),
        DataRange::from_values(panel.lats.iter().copied()).unwrap_or(lat_extent),
    );
    let mut axes = Axes::new(pixel_rect(chart.plotting_area()));
    axes.title = panel.title.clone();
    axes.x_label = "Longitude".to_string();
    axes.y_label = "Latitude".to_string();
    axes.x_range = lon_range;
    axes.y_range = lat_range;
    axes.colorbar = Some(Colorbar {
        rect: strip,
        label: panel.colorbar_label.clone(),
        range: field.value_range,
        colormap: style.colormap_name.clone(),
    });
    Ok(axes)
}

/// Draw up to four panels on a 2×2 grid
fn draw_map_grid(
    size: (u32, u32),
    panels: &[MapPanel<'_>],
    style: &MapStyle,
    layout: &Layout,
) -> Result<Figure> {
    let mut axes = Vec::with_capacity(panels.len());
    let canvas = rasterize(size, |root| {
        for (cell, panel) in root.split_evenly((2, 2)).iter().zip(panels) {
            axes.push(draw_map_panel(cell, panel, style, layout)?);
        }
        Ok(())
    })?;

    let mut figure = Figure::new(canvas);
    figure.axes = axes;
    Ok(figure)
}

fn coordinates(array: &DataArray) -> Result<(Vec<f64>, Vec<f64>)> {
    Ok((array.latitudes()?.to_vec(), array.longitudes()?.to_vec()))
}

/// Time-mean grid of the steps whose month is in `months`
///
/// Also returns the first and last selected timestamps for panel titles.
fn period_mean(
    array: &DataArray,
    months: &[u32],
) -> Result<(Array2<f64>, chrono::NaiveDateTime, chrono::NaiveDateTime)> {
    let subset = select_array_by_months(array, months)?;
    let (Some(&first), Some(&last)) = (subset.time.first(), subset.time.last()) else {
        return Err(ClimplotError::DataNotFound {
            message: format!(
                "Variable {} has no time steps in months {:?}",
                array.name, months
            ),
        });
    };
    let mean = mean_over_time(&subset)?;
    let grid = subset.orient_lat_lon(mean, subset.time_axis())?;
    Ok((grid, first, last))
}

/// Map of the first time slice of a (time, lat, lon) variable
pub fn plot_geomap(
    render: &RenderConfig,
    array: &DataArray,
    params: &MapParams,
) -> Result<PlotOutput> {
    log_timed_operation("plot_geomap", || {
        let style = MapStyle::from_config(render)?;
        let layout = Layout::for_dpi(render.dpi);
        let grid = array.time_slice(0)?;
        let (lats, lons) = coordinates(array)?;
        let size = render.pixels(MAP_FIGSIZE)?;

        let title = format!("Mean {} West Africa", params.variable_label);
        let panel = MapPanel {
            title: title.clone(),
            colorbar_label: params.colorbar_label(),
            grid: &grid,
            lats: &lats,
            lons: &lons,
        };

        let mut axes = None;
        let canvas = rasterize(size, |root| {
            axes = Some(draw_map_panel(root, &panel, &style, &layout)?);
            Ok(())
        })?;

        let mut figure = Figure::new(canvas);
        figure.title = Some(title);
        figure.axes.extend(axes);

        let saved_to = save_figure(
            &figure,
            params.save_dir.as_deref(),
            &geoplot_file(&params.variable_label),
        )?;
        Ok(PlotOutput { figure, saved_to })
    })
}

/// 2×2 grid of seasonal means, DJF, MAM, JJA and SON
pub fn plot_seasonal_maps(
    render: &RenderConfig,
    array: &DataArray,
    params: &MapParams,
) -> Result<PlotOutput> {
    log_timed_operation("plot_seasonal_maps", || {
        let style = MapStyle::from_config(render)?;
        let layout = Layout::for_dpi(render.dpi);
        let (lats, lons) = coordinates(array)?;
        let size = render.pixels(MAP_GRID_FIGSIZE)?;

        let mut means = Vec::with_capacity(SEASONS.len());
        for season in SEASONS.iter() {
            let (grid, first, last) = period_mean(array, &season.months())?;
            debug!(season = season.abbrev(), "Seasonal mean computed");
            let title = format!(
                "Mean {} ({}-{})",
                params.variable_label,
                first.format("%b"),
                last.format("%b")
            );
            means.push((title, grid));
        }

        let panels: Vec<MapPanel> = means
            .iter()
            .map(|(title, grid)| MapPanel {
                title: title.clone(),
                colorbar_label: params.colorbar_label(),
                grid,
                lats: &lats,
                lons: &lons,
            })
            .collect();
        let figure = draw_map_grid(size, &panels, &style, &layout)?;

        let saved_to = save_figure(
            &figure,
            params.save_dir.as_deref(),
            &seasonal_geoplot_file(&params.variable_label),
        )?;
        Ok(PlotOutput { figure, saved_to })
    })
}

/// Three 2×2 figures of monthly means, January to April, May to August and
/// September to December
pub fn plot_monthly_maps(
    render: &RenderConfig,
    array: &DataArray,
    params: &MapParams,
) -> Result<Vec<PlotOutput>> {
    log_timed_operation("plot_monthly_maps", || {
        let style = MapStyle::from_config(render)?;
        let layout = Layout::for_dpi(render.dpi);
        let (lats, lons) = coordinates(array)?;
        let size = render.pixels(MAP_GRID_FIGSIZE)?;

        let mut outputs = Vec::with_capacity(MONTH_BATCHES.len());
        for (batch_index, batch) in MONTH_BATCHES.iter().enumerate() {
            let mut means = Vec::with_capacity(batch.len());
            for &month in batch.iter() {
                let (grid, first, _) = period_mean(array, &[month])?;
                let title = format!("Mean {} - {}", params.variable_label, first.format("%B"));
                means.push((title, grid));
            }

            let panels: Vec<MapPanel> = means
                .iter()
                .map(|(title, grid)| MapPanel {
                    title: title.clone(),
                    colorbar_label: params.variable_label.clone(),
                    grid,
                    lats: &lats,
                    lons: &lons,
                })
                .collect();
            let figure = draw_map_grid(size, &panels, &style, &layout)?;

            let saved_to = save_figure(
                &figure,
                params.save_dir.as_deref(),
                &monthly_geoplot_file(&params.variable_label, batch_index + 1),
            )?;
            outputs.push(PlotOutput { figure, saved_to });
        }

        info!(figures = outputs.len(), "Monthly maps rendered");
        Ok(outputs)
    })
}

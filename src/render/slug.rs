//! Output file names.
//!
//! Names are built from the caller's labels: lowercased, with spaces
//! replaced by underscores, followed by a fixed suffix for the plot kind.

/// Lowercase a label and replace spaces with underscores
pub fn slugify(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// `{name}_time_series.png`
pub fn time_series_file(name: &str) -> String {
    format!("{}_time_series.png", slugify(name))
}

/// `{primary}_{secondary}_time_series.png`
pub fn dual_time_series_file(primary: &str, secondary: &str) -> String {
    format!("{}_{}_time_series.png", slugify(primary), slugify(secondary))
}

/// `{label}_geoplot.png`
pub fn geoplot_file(label: &str) -> String {
    format!("{}_geoplot.png", slugify(label))
}

/// `{label}_3_month_period_geoplot.png`
pub fn seasonal_geoplot_file(label: &str) -> String {
    format!("{}_3_month_period_geoplot.png", slugify(label))
}

/// `{label}_plot_quarter_{n}.png`, `n` counting from 1
pub fn monthly_geoplot_file(label: &str, n: usize) -> String {
    format!("{}_plot_quarter_{}.png", slugify(label), n)
}

/// `{a}_and_{b}_correlation_heatmap.png`
pub fn correlation_heatmap_file(a: &str, b: &str) -> String {
    format!("{}_and_{}_correlation_heatmap.png", slugify(a), slugify(b))
}

/// `{x}_and_{y}_linear_regression.png`
pub fn linear_regression_file(x: &str, y: &str) -> String {
    format!("{}_and_{}_linear_regression.png", slugify(x), slugify(y))
}

//! Configuration management for climplot.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colormaps;
use crate::error::{ClimplotError, Result};

/// Highest accepted output resolution
pub const MAX_DPI: u32 = 600;

/// Largest canvas, in pixels, a figure may allocate
pub const MAX_CANVAS_PIXELS: f64 = 50_000_000.0;

/// Options shared by every `climplot` subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to JSON configuration file
    #[arg(short, long, global = true, env = "CLIMPLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the rendered PNG files are written to
    #[arg(short, long, global = true, env = "CLIMPLOT_SAVE_DIR")]
    pub save_dir: Option<PathBuf>,

    /// Output resolution in pixels per inch
    #[arg(long, global = true, env = "CLIMPLOT_DPI")]
    pub dpi: Option<u32>,

    /// Sequential colormap used for map fills
    #[arg(long, global = true, env = "CLIMPLOT_COLORMAP")]
    pub colormap: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CLIMPLOT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Rendering configuration passed explicitly to every plot operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixels per inch; figure sizes are given in inches
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Colormap for map fills
    #[serde(default = "default_colormap")]
    pub colormap: String,

    /// Colormap for correlation heatmaps
    #[serde(default = "default_diverging_colormap")]
    pub diverging_colormap: String,

    /// Grid-to-pixel resampling method (nearest, bilinear)
    #[serde(default = "default_resampling")]
    pub resampling: String,
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory to save figures into (None = render only)
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Build configuration from parsed arguments with proper precedence
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments (clap has already folded in env vars)
        if let Some(dpi) = args.dpi {
            config.render.dpi = dpi;
        }
        if let Some(colormap) = &args.colormap {
            config.render.colormap = colormap.clone();
        }
        if args.save_dir.is_some() {
            config.output.save_dir = args.save_dir.clone();
        }
        if let Some(level) = &args.log_level {
            config.log_level = level.clone();
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.render = other.render;
        if other.output.save_dir.is_some() {
            self.output.save_dir = other.output.save_dir;
        }
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ClimplotError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        self.render.validate()
    }
}

impl RenderConfig {
    /// Validate the rendering options
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(ClimplotError::Config {
                message: "dpi cannot be 0".to_string(),
            });
        }
        if self.dpi > MAX_DPI {
            return Err(ClimplotError::Config {
                message: format!("dpi {} exceeds the maximum of {}", self.dpi, MAX_DPI),
            });
        }

        for name in [&self.colormap, &self.diverging_colormap] {
            if colormaps::get_colormap(name).is_err() {
                return Err(ClimplotError::Config {
                    message: format!("Unknown colormap: {}", name),
                });
            }
        }

        match self.resampling.as_str() {
            "nearest" | "bilinear" => {}
            _ => {
                return Err(ClimplotError::Config {
                    message: format!(
                        "Invalid resampling method: {}. Must be one of: nearest, bilinear",
                        self.resampling
                    ),
                });
            }
        }

        Ok(())
    }

    /// Convert a figure size in inches to pixels
    ///
    /// Fails when the canvas would exceed [`MAX_CANVAS_PIXELS`], which also
    /// covers a dpi that skipped validation.
    pub fn pixels(&self, figsize: (f64, f64)) -> Result<(u32, u32)> {
        let dpi = self.dpi as f64;
        let width = (figsize.0 * dpi).round().max(1.0);
        let height = (figsize.1 * dpi).round().max(1.0);
        let area = width * height;
        if !area.is_finite() || area > MAX_CANVAS_PIXELS {
            return Err(ClimplotError::invalid_parameter(
                "dpi",
                format!(
                    "{} dpi gives a {}x{} canvas, above the {} pixel limit",
                    self.dpi, width, height, MAX_CANVAS_PIXELS
                ),
            ));
        }
        Ok((width as u32, height as u32))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            colormap: default_colormap(),
            diverging_colormap: default_diverging_colormap(),
            resampling: default_resampling(),
        }
    }
}

// Default value functions for serde
fn default_dpi() -> u32 {
    100
}

fn default_colormap() -> String {
    "viridis".to_string()
}

fn default_diverging_colormap() -> String {
    "coolwarm".to_string()
}

fn default_resampling() -> String {
    "bilinear".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.dpi, 100);
        assert_eq!(config.render.colormap, "viridis");
        assert_eq!(config.render.diverging_colormap, "coolwarm");
        assert_eq!(config.render.resampling, "bilinear");
        assert_eq!(config.output.save_dir, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.render.dpi = 72;
        config2.output.save_dir = Some(PathBuf::from("figures"));

        config1.merge(config2);

        assert_eq!(config1.render.dpi, 72);
        assert_eq!(config1.output.save_dir, Some(PathBuf::from("figures")));
    }

    #[test]
    fn test_args_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"render": {{"dpi": 50, "colormap": "plasma"}}, "log_level": "debug"}}"#
        )
        .unwrap();

        let args = GlobalArgs {
            config: Some(file.path().to_path_buf()),
            dpi: Some(80),
            ..Default::default()
        };
        let config = Config::load(&args).unwrap();

        assert_eq!(config.render.dpi, 80);
        assert_eq!(config.render.colormap, "plasma");
        assert_eq!(config.render.resampling, "bilinear");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        let config = Config::default();
        assert!(config.validate().is_ok());

        // Test invalid log level
        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        // Test zero dpi
        let mut config = Config::default();
        config.render.dpi = 0;
        assert!(config.validate().is_err());

        // Test dpi above the maximum
        let mut config = Config::default();
        config.render.dpi = MAX_DPI + 1;
        assert!(config.validate().is_err());
        config.render.dpi = MAX_DPI;
        assert!(config.validate().is_ok());

        // Test unknown colormap
        let mut config = Config::default();
        config.render.colormap = "rainbowish".to_string();
        assert!(config.validate().is_err());

        // Test invalid resampling method
        let mut config = Config::default();
        config.render.resampling = "bicubic".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pixels_from_inches() {
        let render = RenderConfig::default();
        assert_eq!(render.pixels((12.0, 6.0)).unwrap(), (1200, 600));
        assert_eq!(render.pixels((6.4, 4.8)).unwrap(), (640, 480));
    }

    #[test]
    fn test_pixels_rejects_oversized_canvas() {
        let render = RenderConfig {
            dpi: u32::MAX,
            ..Default::default()
        };
        let err = render.pixels((12.0, 6.0)).unwrap_err();
        assert!(matches!(err, ClimplotError::InvalidParameter { ref param, .. } if param == "dpi"));

        let render = RenderConfig {
            dpi: MAX_DPI,
            ..Default::default()
        };
        assert_eq!(render.pixels((12.0, 6.0)).unwrap(), (7200, 3600));
    }
}

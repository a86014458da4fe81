//! Writing figures to disk.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::figure::Figure;
use crate::error::{ClimplotError, Result};

/// Write `figure` as PNG to `save_dir/file_name`
///
/// The directory is created if absent and an existing file is overwritten.
/// Without a directory nothing is written and None is returned.
pub fn save_figure(
    figure: &Figure,
    save_dir: Option<&Path>,
    file_name: &str,
) -> Result<Option<PathBuf>> {
    let Some(dir) = save_dir else {
        debug!(file_name = file_name, "No save directory; figure kept in memory");
        return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    figure
        .canvas
        .save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| ClimplotError::ImageGeneration {
            message: format!("Failed to write PNG {}: {}", path.display(), e),
        })?;

    info!(
        path = %path.display(),
        width = figure.width(),
        height = figure.height(),
        "Figure saved"
    );
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_without_directory_nothing_is_written() {
        let figure = Figure::new(RgbaImage::new(20, 10));
        assert_eq!(save_figure(&figure, None, "x.png").unwrap(), None);
    }

    #[test]
    fn test_creates_nested_directory_and_overwrites() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a").join("b");
        let figure = Figure::new(RgbaImage::new(20, 10));

        let first = save_figure(&figure, Some(&target), "x.png").unwrap().unwrap();
        assert!(first.exists());
        let second = save_figure(&figure, Some(&target), "x.png").unwrap().unwrap();
        assert_eq!(first, second);

        let img = image::open(&second).unwrap();
        assert_eq!(img.dimensions(), (20, 10));
    }

    #[test]
    fn test_directory_creation_failure_propagates() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let figure = Figure::new(RgbaImage::new(4, 4));
        let err = save_figure(&figure, Some(&blocker.join("sub")), "x.png").unwrap_err();
        assert!(matches!(err, ClimplotError::Io(_)));
    }
}

//! Sprite and image asset generators
//!
//! Vector shapes are drawn with plotters' bitmap backend at a multiple of
//! the final resolution, then filtered and downscaled with `image`.

pub mod canvas;
pub mod knob;
pub mod screw;
pub mod shapes;
pub mod tabs;

use plotters::drawing::DrawingAreaErrorKind;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image is {width}x{height}, need at least {min_width}x{min_height}")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
    #[error("Need at least {min} stages, got {got}")]
    TooFewStages { got: usize, min: usize },
    #[error("Cannot create directory {path:?}: {source}")]
    CreateDir {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

impl<E> From<DrawingAreaErrorKind<E>> for RasterError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        RasterError::Draw(e.to_string())
    }
}

pub(crate) fn ensure_dir(path: &Path) -> Result<(), RasterError> {
    std::fs::create_dir_all(path).map_err(|source| RasterError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Re-encode an image, the format of `destination` following its extension
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use synthgen::raster::convert;
///
/// convert(Path::new("knob.bmp"), Path::new("knob.png")).unwrap();
/// ```
pub fn convert(source: &Path, destination: &Path) -> Result<(), RasterError> {
    let img = image::open(source)?;
    img.save(destination)?;
    info!(?source, ?destination, "converted image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_convert_bmp_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let bmp = dir.path().join("in.bmp");
        let png = dir.path().join("out.png");
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([10, 20, 30]));
        img.save(&bmp).unwrap();

        convert(&bmp, &png).unwrap();
        let back = image::open(&png).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_convert_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert(&dir.path().join("nope.bmp"), &dir.path().join("out.png"));
        assert!(matches!(result, Err(RasterError::Image(_))));
    }
}

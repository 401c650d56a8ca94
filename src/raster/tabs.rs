//! Tab backgrounds cut out of a full GUI mockup screenshot
//!
//! The mockup stacks every tab of the plugin window vertically; each tab is
//! saved as both PNG and BMP.

use super::{ensure_dir, RasterError};
use image::{imageops, RgbImage};
use std::path::{Path, PathBuf};
use tracing::info;

pub const WIDTH: u32 = 980;
pub const HEIGHT: u32 = 600;
pub const LEFT: u32 = 11;

/// Tab name and the top edge of the tab in the mockup
pub const TABS: [(&str, u32); 9] = [
    ("synth", 11),
    ("effects", 623),
    ("macros1", 1235),
    ("macros2", 1847),
    ("macros3", 2459),
    ("envelopes1", 3071),
    ("envelopes2", 3683),
    ("lfos", 4295),
    ("about", 4907),
];

/// Smallest mockup that contains every tab
pub fn required_size() -> (u32, u32) {
    let bottom = TABS.iter().map(|&(_, top)| top + HEIGHT).max().unwrap_or(0);
    (LEFT + WIDTH, bottom)
}

/// Cut out a single tab
pub fn crop_tab(mockup: &RgbImage, top: u32) -> Result<RgbImage, RasterError> {
    let (width, height) = mockup.dimensions();
    if width < LEFT + WIDTH || height < top + HEIGHT {
        return Err(RasterError::TooSmall {
            width,
            height,
            min_width: LEFT + WIDTH,
            min_height: top + HEIGHT,
        });
    }
    Ok(imageops::crop_imm(mockup, LEFT, top, WIDTH, HEIGHT).to_image())
}

/// Write `<name>.png` and `<name>.bmp` for every tab into `out_dir`
pub fn write_tabs(mockup: &RgbImage, out_dir: &Path) -> Result<Vec<PathBuf>, RasterError> {
    let (min_width, min_height) = required_size();
    let (width, height) = mockup.dimensions();
    if width < min_width || height < min_height {
        return Err(RasterError::TooSmall {
            width,
            height,
            min_width,
            min_height,
        });
    }

    ensure_dir(out_dir)?;
    let mut written = Vec::with_capacity(TABS.len() * 2);
    for (name, top) in TABS {
        let tab = crop_tab(mockup, top)?;
        for ext in ["png", "bmp"] {
            let path = out_dir.join(format!("{name}.{ext}"));
            tab.save(&path)?;
            written.push(path);
        }
        info!(name, top, "wrote tab background");
    }
    Ok(written)
}

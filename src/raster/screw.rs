//! Screw head sprite sheet
//!
//! A grey screw head with a slot, the slot turning half a revolution over
//! the sheet. Used as the frame of the plugin's tuning screws.

use super::canvas::{downscale, rotate, to_point, Canvas, Shape, SUBPIXELS};
use super::RasterError;
use image::{GenericImage, RgbaImage};
use plotters::style::RGBColor;
use tracing::info;

pub const DEFAULT_STAGES: usize = 32;
pub const SIZE: u32 = 21;

const RIM_COLOR: RGBColor = RGBColor(60, 60, 66);
const HEAD_COLOR: RGBColor = RGBColor(150, 150, 158);
const SLOT_COLOR: RGBColor = RGBColor(30, 30, 34);
const RIM_WIDTH: u32 = 5;
const SLOT_WIDTH: u32 = 12;
/// Slot ends stay this far inside the head's edge
const SLOT_INSET: f64 = 14.0;

fn draw_stage(angle: f64) -> Result<RgbaImage, RasterError> {
    let size = SIZE * SUBPIXELS;
    let center = (size as f64 / 2.0, size as f64 / 2.0);
    let radius = size / 2;

    let mut canvas = Canvas::new(size, size);
    canvas.draw(
        &Shape::Disc {
            center: to_point(center),
            radius,
        },
        RIM_COLOR,
        255,
    )?;
    canvas.draw(
        &Shape::Disc {
            center: to_point(center),
            radius: radius - RIM_WIDTH,
        },
        HEAD_COLOR,
        255,
    )?;

    let reach = radius as f64 - SLOT_INSET;
    let slot = [-reach, reach]
        .iter()
        .map(|&dx| to_point(rotate((center.0 + dx, center.1), center, angle)))
        .collect();
    canvas.polyline(slot, SLOT_WIDTH, SLOT_COLOR)?;

    Ok(downscale(&canvas.to_rgba(), SIZE, SIZE))
}

/// Render `stages` screw positions side by side, the slot turning from
/// horizontal to just short of horizontal again
pub fn screw_states(stages: usize) -> Result<RgbaImage, RasterError> {
    if stages < 1 {
        return Err(RasterError::TooFewStages { got: stages, min: 1 });
    }
    let mut sheet = RgbaImage::new(SIZE * stages as u32, SIZE);
    for i in 0..stages {
        let angle = 180.0 * i as f64 / stages as f64;
        sheet.copy_from(&draw_stage(angle)?, SIZE * i as u32, 0)?;
    }
    info!(stages, "rendered screw states");
    Ok(sheet)
}

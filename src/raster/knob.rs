//! Knob sprite sheet
//!
//! Every stage is the knob background with tick marks, a dark track arc, an
//! indicator line and a colored glow following the knob's position. Stages
//! are laid out left to right, each scaled down by [`SUBPIXELS`].

use super::canvas::{arc_points, downscale, mix, rotate, to_point, Canvas, Shape, SUBPIXELS};
use super::RasterError;
use image::imageops;
use image::{GenericImage, Rgb, RgbImage, RgbaImage};
use plotters::style::RGBColor;
use tracing::{debug, info};

pub const DEFAULT_STAGES: usize = 128;

/// Dead zone at the bottom of the knob, on each side, in degrees
const ANGLE_DIFF: f64 = 30.0;
/// 0 degrees is 3 o'clock, angles increase clockwise
const START_ANGLE: f64 = 90.0 + ANGLE_DIFF;
const SWEEP: f64 = 360.0 - ANGLE_DIFF * 2.0;
const ARC_DISTANCE: u32 = 28;
const ARC_WIDTH: u32 = 25;

const GLOW_COLOR_1: RGBColor = RGBColor(72, 0, 55);
const GLOW_COLOR_2: RGBColor = RGBColor(0, 42, 144);
const GLOW_COLOR_3: RGBColor = RGBColor(80, 170, 255);
const TICKS_COLOR: RGBColor = RGBColor(144, 144, 150);
const LINE_COLOR: RGBColor = RGBColor(200, 200, 220);
const TRACK_COLOR: RGBColor = RGBColor(0, 5, 9);
const TRACK_OPACITY: u8 = 190;

const TICKS: usize = 15;
const TICK_WIDTH: u32 = 6;
const TICK_SPAN: (f64, f64) = (1.0, 12.0);
const LINE_WIDTH: u32 = 15;
const LINE_SPAN: (f64, f64) = (24.0, 103.0);

const OVERLAY_BLUR: f32 = 2.0;
const GLOW_BRIGHTNESS: f64 = 1.5;
const GLOW_CONTRAST: f64 = 1.7;
const GLOW_BLUR: f32 = 12.0;

const MIN_SIZE: u32 = 2 * (ARC_DISTANCE + ARC_WIDTH);

/// Glow color at a knob position in `[0, 1]`
pub fn glow_color(progress: f64) -> RGBColor {
    if progress < 0.5 {
        mix(GLOW_COLOR_1, GLOW_COLOR_2, 2.0 * progress)
    } else {
        mix(GLOW_COLOR_2, GLOW_COLOR_3, 2.0 * (progress - 0.5))
    }
}

struct Geometry {
    width: u32,
    height: u32,
    center: (f64, f64),
    arc_center: (f64, f64),
    arc_radii: (f64, f64),
}

impl Geometry {
    fn new(width: u32, height: u32) -> Self {
        let center = (
            (width as f64 / 2.0).round_ties_even(),
            (height as f64 / 2.0).round_ties_even(),
        );
        // The arc's bounding box is inset by ARC_DISTANCE, the stroke lies
        // inside the box
        let inset = ARC_DISTANCE as f64;
        let half_stroke = ARC_WIDTH as f64 / 2.0;
        Self {
            width,
            height,
            center,
            arc_center: (width as f64 / 2.0, height as f64 / 2.0),
            arc_radii: (
                (width as f64 - 2.0 * inset) / 2.0 - half_stroke,
                (height as f64 - 2.0 * inset) / 2.0 - half_stroke,
            ),
        }
    }

    /// Radial segment at 12 o'clock rotated to `progress`, outer end first
    fn radial(&self, span: (f64, f64), progress: f64) -> Vec<(i32, i32)> {
        let angle = SWEEP * (progress - 0.5);
        [span.0, span.1]
            .iter()
            .map(|&y| to_point(rotate((self.center.0, y), self.center, angle)))
            .collect()
    }

    fn arc(&self, sweep: f64) -> Shape {
        Shape::Polyline {
            points: arc_points(self.arc_center, self.arc_radii, START_ANGLE, START_ANGLE + sweep),
            width: ARC_WIDTH,
        }
    }
}

/// Paint the tick marks onto the background
fn draw_ticks(background: &mut RgbaImage, geometry: &Geometry) -> Result<(), RasterError> {
    let mut canvas = Canvas::new(geometry.width, geometry.height);
    for i in 0..TICKS {
        let progress = i as f64 / (TICKS - 1) as f64;
        canvas.polyline(geometry.radial(TICK_SPAN, progress), TICK_WIDTH, TICKS_COLOR)?;
    }
    imageops::overlay(background, &canvas.to_rgba(), 0, 0);
    Ok(())
}

fn brighten(img: &mut RgbImage, factor: f64) {
    for p in img.pixels_mut() {
        for c in p.0.iter_mut() {
            *c = (*c as f64 * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Scale the distance of every channel from the mean luminance
fn contrast(img: &mut RgbImage, factor: f64) {
    let pixels = (img.width() * img.height()).max(1) as f64;
    let luma_sum: f64 = img
        .pixels()
        .map(|p| (299 * p[0] as u32 + 587 * p[1] as u32 + 114 * p[2] as u32) as f64 / 1000.0)
        .sum();
    let mean = (luma_sum / pixels + 0.5).floor();
    for p in img.pixels_mut() {
        for c in p.0.iter_mut() {
            *c = (mean + factor * (*c as f64 - mean)).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Screen blend `top` onto the color channels of `base`
fn screen(base: &mut RgbaImage, top: &RgbImage) {
    for (b, t) in base.pixels_mut().zip(top.pixels()) {
        for i in 0..3 {
            let (x, y) = (b[i] as u32, t[i] as u32);
            b[i] = (255 - (255 - x) * (255 - y) / 255) as u8;
        }
    }
}

/// Render a single full resolution stage
fn render_stage(background: &RgbaImage, geometry: &Geometry, progress: f64) -> Result<RgbImage, RasterError> {
    let mut glow = Canvas::new(geometry.width, geometry.height);
    glow.draw(&geometry.arc(SWEEP * progress), glow_color(progress), 255)?;

    let mut overlay = Canvas::new(geometry.width, geometry.height);
    overlay.draw(&geometry.arc(SWEEP), TRACK_COLOR, TRACK_OPACITY)?;
    let mut line = geometry.radial(LINE_SPAN, progress);
    line.reverse();
    overlay.polyline(line, LINE_WIDTH, LINE_COLOR)?;

    let mut knob = background.clone();
    let overlay = imageops::blur(&overlay.to_rgba(), OVERLAY_BLUR);
    imageops::overlay(&mut knob, &overlay, 0, 0);

    let mut glow = glow.to_rgb();
    brighten(&mut glow, GLOW_BRIGHTNESS);
    contrast(&mut glow, GLOW_CONTRAST);
    let glow = imageops::blur(&glow, GLOW_BLUR);
    screen(&mut knob, &glow);

    Ok(RgbImage::from_fn(knob.width(), knob.height(), |x, y| {
        let p = knob.get_pixel(x, y);
        Rgb([p[0], p[1], p[2]])
    }))
}

/// Render the sprite sheet for a knob background
///
/// # Arguments
/// * `background` - The knob image at full (5x) resolution
/// * `stages` - Number of knob positions, at least 2
pub fn knob_states(background: &RgbaImage, stages: usize) -> Result<RgbImage, RasterError> {
    if stages < 2 {
        return Err(RasterError::TooFewStages { got: stages, min: 2 });
    }
    let (width, height) = background.dimensions();
    if width < MIN_SIZE || height < MIN_SIZE {
        return Err(RasterError::TooSmall {
            width,
            height,
            min_width: MIN_SIZE,
            min_height: MIN_SIZE,
        });
    }

    let geometry = Geometry::new(width, height);
    let mut background = background.clone();
    draw_ticks(&mut background, &geometry)?;

    let (cell_width, cell_height) = (width / SUBPIXELS, height / SUBPIXELS);
    let mut sheet = RgbImage::new(cell_width * stages as u32, cell_height);
    for i in 0..stages {
        let progress = i as f64 / (stages - 1) as f64;
        let stage = render_stage(&background, &geometry, progress)?;
        sheet.copy_from(&downscale(&stage, cell_width, cell_height), cell_width * i as u32, 0)?;
        debug!(stage = i, "rendered knob stage");
    }

    info!(stages, cell_width, cell_height, "rendered knob states");
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn background(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([40, 40, 45, 255]))
    }

    #[test]
    fn test_glow_color_gradient() {
        assert_eq!(glow_color(0.0), GLOW_COLOR_1);
        assert_eq!(glow_color(0.5), GLOW_COLOR_2);
        assert_eq!(glow_color(1.0), GLOW_COLOR_3);
    }

    #[test]
    fn test_sheet_dimensions() {
        let sheet = knob_states(&background(125), 4).unwrap();
        assert_eq!(sheet.dimensions(), (25 * 4, 25));
    }

    #[test]
    fn test_stages_differ() {
        let sheet = knob_states(&background(125), 2).unwrap();
        let first = imageops::crop_imm(&sheet, 0, 0, 25, 25).to_image();
        let last = imageops::crop_imm(&sheet, 25, 0, 25, 25).to_image();
        assert_ne!(first, last);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            knob_states(&background(125), 1),
            Err(RasterError::TooFewStages { got: 1, min: 2 })
        ));
        assert!(matches!(
            knob_states(&background(50), 4),
            Err(RasterError::TooSmall { .. })
        ));
    }

    #[test]
    fn test_screen_blend() {
        let mut base = RgbaImage::from_pixel(1, 1, Rgba([0, 128, 255, 255]));
        let top = RgbImage::from_pixel(1, 1, Rgb([0, 128, 10]));
        screen(&mut base, &top);
        assert_eq!(base.get_pixel(0, 0), &Rgba([0, 192, 255, 255]));
    }
}

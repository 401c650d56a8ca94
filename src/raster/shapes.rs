//! Preview icons of envelope and macro curve shapes
//!
//! Each icon is a 21x21 plot of a function on `[0, 1]`; a sheet stacks the
//! icons of a list of functions vertically.

use super::canvas::{downscale, mix, Canvas, Point, SUBPIXELS};
use super::{ensure_dir, RasterError};
use image::{GenericImage, RgbImage};
use plotters::style::RGBColor;
use std::path::{Path, PathBuf};
use tracing::info;

pub const WIDTH: u32 = 21;
pub const HEIGHT: u32 = 21;
pub const SEGMENTS: usize = 20;
pub const STROKE_WIDTH: u32 = 18;

pub const LIGHT_GREY: RGBColor = RGBColor(200, 200, 200);
pub const GREEN: RGBColor = RGBColor(100, 255, 140);
pub const CYAN_1: RGBColor = RGBColor(120, 200, 230);
pub const CYAN_2: RGBColor = RGBColor(140, 210, 240);
pub const CYAN_3: RGBColor = RGBColor(160, 220, 250);
pub const PURPLE_1: RGBColor = RGBColor(170, 100, 220);
pub const PURPLE_2: RGBColor = RGBColor(200, 120, 240);
pub const PURPLE_3: RGBColor = RGBColor(230, 140, 250);
pub const YELLOW_1: RGBColor = RGBColor(255, 175, 120);
pub const YELLOW_2: RGBColor = RGBColor(255, 215, 140);
pub const YELLOW_3: RGBColor = RGBColor(255, 255, 160);
pub const RED_1: RGBColor = RGBColor(210, 100, 100);
pub const RED_2: RGBColor = RGBColor(230, 140, 140);
pub const RED_3: RGBColor = RGBColor(250, 180, 180);

/// Number of midpoint shift states in the macro sheet
pub const MIDPOINT_STATES: usize = 128;

/// A function to plot and the color to plot it in
pub struct ShapeIcon {
    pub color: RGBColor,
    pub func: Box<dyn Fn(f64) -> f64>,
}

impl ShapeIcon {
    pub fn new(color: RGBColor, func: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            color,
            func: Box::new(func),
        }
    }
}

fn smooth(x: f64) -> f64 {
    ((-2.0 * x + 3.0) * x) * x
}

fn smoother(x: f64) -> f64 {
    ((((6.0 * x - 15.0) * x + 10.0) * x) * x) * x
}

fn smoothest(x: f64) -> f64 {
    ((((((((((-252.0 * x + 1386.0) * x - 3080.0) * x + 3465.0) * x - 1980.0) * x + 462.0) * x) * x) * x) * x) * x) * x
}

fn sharp(x: f64) -> f64 {
    x * (1.0 - (x + 0.001).ln()) / (1.0 - 1.001_f64.ln())
}

fn sharper(x: f64) -> f64 {
    sharp(x).powf(2.0 / 3.0)
}

fn sharpest(x: f64) -> f64 {
    sharp(x).powf(1.0 / 3.0)
}

fn steep(x: f64) -> f64 {
    ((4.0 * x - 6.0) * x + 3.0) * x
}

fn steeper(x: f64) -> f64 {
    ((((16.0 * x - 40.0) * x + 40.0) * x - 20.0) * x + 5.0) * x
}

fn steepest(x: f64) -> f64 {
    ((((((((((1024.0 * x - 5632.0) * x + 14080.0) * x - 21120.0) * x + 21120.0) * x - 14784.0) * x + 7392.0) * x
        - 2640.0)
        * x
        + 660.0)
        * x
        - 110.0)
        * x
        + 11.0)
        * x
}

/// The envelope shapes, in the order of the plugin's shape selector
pub fn env_shapes() -> Vec<ShapeIcon> {
    vec![
        ShapeIcon::new(CYAN_1, smooth),
        ShapeIcon::new(CYAN_2, smoother),
        ShapeIcon::new(CYAN_3, smoothest),
        ShapeIcon::new(PURPLE_1, |x: f64| x.powi(2)),
        ShapeIcon::new(PURPLE_2, |x: f64| x.powi(3)),
        ShapeIcon::new(PURPLE_3, |x: f64| x.powi(5)),
        ShapeIcon::new(YELLOW_1, sharp),
        ShapeIcon::new(YELLOW_2, sharper),
        ShapeIcon::new(YELLOW_3, sharpest),
        ShapeIcon::new(RED_1, steep),
        ShapeIcon::new(RED_2, steeper),
        ShapeIcon::new(RED_3, steepest),
        ShapeIcon::new(LIGHT_GREY, |x| x),
    ]
}

pub fn macro_distortions() -> Vec<ShapeIcon> {
    vec![
        ShapeIcon::new(CYAN_2, |x: f64| (8.0 * (x * 2.0 - 1.0)).tanh() * 0.5 + 0.5),
        ShapeIcon::new(PURPLE_2, |x: f64| x.powi(5)),
        ShapeIcon::new(YELLOW_2, sharpest),
        ShapeIcon::new(RED_2, steepest),
    ]
}

/// Piecewise linear map of `[0, 1]` onto itself sending 0.5 to `midpoint`
pub fn shift_midpoint(midpoint: f64, x: f64) -> f64 {
    let x2 = 2.0 * x;
    if x2 < 1.0 {
        x2 * midpoint
    } else {
        midpoint + (x2 - 1.0) * (1.0 - midpoint)
    }
}

/// Green at 0, grey at 0.5, yellow at 0.75, red at 1
pub fn midpoint_color(midpoint: f64) -> RGBColor {
    if midpoint <= 0.5 {
        mix(GREEN, LIGHT_GREY, 2.0 * midpoint)
    } else if midpoint <= 0.75 {
        mix(LIGHT_GREY, YELLOW_2, 4.0 * (midpoint - 0.5))
    } else {
        mix(YELLOW_2, RED_1, 4.0 * (midpoint - 0.75))
    }
}

pub fn midpoint_states() -> Vec<ShapeIcon> {
    (0..MIDPOINT_STATES)
        .map(|i| {
            let midpoint = i as f64 / (MIDPOINT_STATES - 1) as f64;
            ShapeIcon::new(midpoint_color(midpoint), move |x| shift_midpoint(midpoint, x))
        })
        .collect()
}

/// Polyline of `f` from `start` to `end` in supersampled icon coordinates
///
/// The line is extended horizontally past both edges so that the stroke
/// doesn't end in a visible cap.
pub fn plot_points(f: &dyn Fn(f64) -> f64, start: f64, end: f64) -> Vec<Point> {
    let border = (STROKE_WIDTH as f64 * 0.66 + 0.5) as i32;
    let w = (WIDTH * SUBPIXELS) as i32 - border * 2;
    let h = (HEIGHT * SUBPIXELS) as i32 - border * 2;
    let delta = end - start;

    let mut p = (border, h - (h as f64 * start + 0.5) as i32 + border);
    let mut points = vec![(-border * 3, p.1), p];
    for i in 0..SEGMENTS {
        let ratio = (i + 1) as f64 / SEGMENTS as f64;
        let y = start + f(ratio) * delta;
        p = (
            (w as f64 * ratio + 0.5) as i32 + border,
            h - (h as f64 * y + 0.5) as i32 + border,
        );
        points.push(p);
    }
    points.push((w + border * 3, p.1));
    points
}

/// Render one icon
pub fn draw_icon(icon: &ShapeIcon, start: f64, end: f64) -> Result<RgbImage, RasterError> {
    let mut canvas = Canvas::new(WIDTH * SUBPIXELS, HEIGHT * SUBPIXELS);
    canvas.polyline(plot_points(&icon.func, start, end), STROKE_WIDTH, icon.color)?;
    Ok(downscale(&canvas.to_rgb(), WIDTH, HEIGHT))
}

/// Stack the icons of `icons` vertically
pub fn sheet(icons: &[ShapeIcon], start: f64, end: f64) -> Result<RgbImage, RasterError> {
    let mut image = RgbImage::new(WIDTH, HEIGHT * icons.len() as u32);
    for (i, icon) in icons.iter().enumerate() {
        image.copy_from(&draw_icon(icon, start, end)?, 0, HEIGHT * i as u32)?;
    }
    Ok(image)
}

/// Write all shape sheets into `out_dir`, returning the written paths
pub fn write_all(out_dir: &Path) -> Result<Vec<PathBuf>, RasterError> {
    ensure_dir(out_dir)?;
    let sheets = [
        ("env_shapes-01.png", env_shapes(), 0.0, 1.0),
        ("env_shapes-10.png", env_shapes(), 1.0, 0.0),
        ("macro_distortions.png", macro_distortions(), 0.0, 1.0),
        ("macro_midpoint_states.png", midpoint_states(), 0.0, 1.0),
    ];

    let mut written = Vec::new();
    for (file_name, icons, start, end) in sheets {
        let path = out_dir.join(file_name);
        sheet(&icons, start, end)?.save(&path)?;
        info!(?path, icons = icons.len(), "wrote shape sheet");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_map_unit_interval() {
        for icon in env_shapes().iter().chain(macro_distortions().iter()) {
            let f = &icon.func;
            assert!(f(0.0).abs() < 0.001, "f(0) = {}", f(0.0));
            assert!((f(1.0) - 1.0).abs() < 0.001, "f(1) = {}", f(1.0));
        }
    }

    #[test]
    fn test_shift_midpoint() {
        assert_eq!(shift_midpoint(0.2, 0.0), 0.0);
        assert_eq!(shift_midpoint(0.2, 0.5), 0.2);
        assert_eq!(shift_midpoint(0.2, 1.0), 1.0);
        assert!((shift_midpoint(0.2, 0.25) - 0.1).abs() < 1e-12);
        assert!((shift_midpoint(0.2, 0.75) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_midpoint_colors() {
        assert_eq!(midpoint_color(0.0), GREEN);
        assert_eq!(midpoint_color(0.5), LIGHT_GREY);
        assert_eq!(midpoint_color(0.75), YELLOW_2);
        assert_eq!(midpoint_color(1.0), RED_1);
        assert_eq!(midpoint_states().len(), 128);
    }

    #[test]
    fn test_plot_points() {
        let identity = |x: f64| x;
        let points = plot_points(&identity, 0.0, 1.0);
        assert_eq!(points.len(), SEGMENTS + 3);
        // 105 subpixels, border 12: the plot spans 12..=93
        assert_eq!(points[0], (-36, 93));
        assert_eq!(points[1], (12, 93));
        assert_eq!(points[SEGMENTS + 1], (93, 12));
        assert_eq!(points[SEGMENTS + 2], (117, 12));

        let falling = plot_points(&identity, 1.0, 0.0);
        assert_eq!(falling[1], (12, 12));
        assert_eq!(falling[SEGMENTS + 1], (93, 93));
    }

    #[test]
    fn test_sheet_dimensions() {
        let icons = macro_distortions();
        let image = sheet(&icons, 0.0, 1.0).unwrap();
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT * 4));
        // Something was drawn in every icon
        for i in 0..4 {
            let lit = (0..HEIGHT)
                .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .any(|(x, y)| image.get_pixel(x, HEIGHT * i + y).0 != [0, 0, 0]);
            assert!(lit, "icon {} is empty", i);
        }
    }

    #[test]
    fn test_write_all() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_all(dir.path()).unwrap();
        assert_eq!(written.len(), 4);
        let midpoints = image::open(dir.path().join("macro_midpoint_states.png"))
            .unwrap()
            .to_rgb8();
        assert_eq!(midpoints.dimensions(), (WIDTH, HEIGHT * 128));
    }
}

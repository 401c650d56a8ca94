//! Supersampled drawing surface
//!
//! A [`Canvas`] keeps an RGB color plane and a coverage (alpha) plane of the
//! same size. Every shape is drawn into both with plotters' bitmap backend;
//! later shapes replace earlier ones where they overlap, the way a paint
//! program's line tool does.

use super::RasterError;
use image::imageops::{self, FilterType};
use image::{GenericImageView, ImageBuffer, Pixel, Rgb, RgbImage, Rgba, RgbaImage};
use plotters::prelude::*;

/// Drawing resolution multiplier
pub const SUBPIXELS: u32 = 5;

pub type Point = (i32, i32);

/// A primitive the canvas can draw
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Thick polyline with round joints between segments
    Polyline { points: Vec<Point>, width: u32 },
    Disc { center: Point, radius: u32 },
}

pub struct Canvas {
    width: u32,
    height: u32,
    color: Vec<u8>,
    alpha: Vec<u8>,
}

fn draw_shape(buffer: &mut [u8], size: (u32, u32), shape: &Shape, color: RGBColor) -> Result<(), RasterError> {
    let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
    match shape {
        Shape::Polyline { points, width } => {
            if points.len() < 2 {
                return Ok(());
            }
            let style = ShapeStyle {
                color: color.to_rgba(),
                filled: false,
                stroke_width: *width,
            };
            root.draw(&PathElement::new(points.clone(), style))?;
            for &joint in &points[1..points.len() - 1] {
                root.draw(&Circle::new(joint, *width / 2, color.filled()))?;
            }
        }
        Shape::Disc { center, radius } => {
            root.draw(&Circle::new(*center, *radius, color.filled()))?;
        }
    }
    root.present()?;
    Ok(())
}

impl Canvas {
    /// Black, fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height * 3) as usize;
        Self {
            width,
            height,
            color: vec![0; len],
            alpha: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw `shape` in `color` with the given opacity
    pub fn draw(&mut self, shape: &Shape, color: RGBColor, opacity: u8) -> Result<(), RasterError> {
        let size = (self.width, self.height);
        draw_shape(&mut self.color, size, shape, color)?;
        draw_shape(&mut self.alpha, size, shape, RGBColor(opacity, opacity, opacity))
    }

    pub fn polyline(&mut self, points: Vec<Point>, width: u32, color: RGBColor) -> Result<(), RasterError> {
        self.draw(&Shape::Polyline { points, width }, color, 255)
    }

    /// Color plane on black
    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = ((y * self.width + x) * 3) as usize;
            Rgb([self.color[i], self.color[i + 1], self.color[i + 2]])
        })
    }

    /// Color plane with the coverage plane as alpha
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let i = ((y * self.width + x) * 3) as usize;
            Rgba([self.color[i], self.color[i + 1], self.color[i + 2], self.alpha[i]])
        })
    }
}

/// Bicubic downscale to `width` x `height`
pub fn downscale<I>(img: &I, width: u32, height: u32) -> ImageBuffer<I::Pixel, Vec<<I::Pixel as Pixel>::Subpixel>>
where
    I: GenericImageView,
    I::Pixel: 'static,
    <I::Pixel as Pixel>::Subpixel: 'static,
{
    imageops::resize(img, width, height, FilterType::CatmullRom)
}

/// Rotate `point` around `origin` by `degrees`, clockwise on screen
pub fn rotate(point: (f64, f64), origin: (f64, f64), degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (x, y) = (point.0 - origin.0, point.1 - origin.1);
    (origin.0 + x * cos - y * sin, origin.1 + x * sin + y * cos)
}

pub fn to_point(p: (f64, f64)) -> Point {
    (p.0.round() as i32, p.1.round() as i32)
}

/// Points along an elliptic arc
///
/// Angles are in degrees, 0 at 3 o'clock and increasing clockwise on screen.
pub fn arc_points(center: (f64, f64), radii: (f64, f64), start: f64, end: f64) -> Vec<Point> {
    let steps = ((end - start).abs() / 2.0).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| {
            let angle = (start + (end - start) * i as f64 / steps as f64).to_radians();
            to_point((
                center.0 + radii.0 * angle.cos(),
                center.1 + radii.1 * angle.sin(),
            ))
        })
        .collect()
}

/// Linear mix of two colors, truncating each channel
pub fn mix(a: RGBColor, b: RGBColor, s: f64) -> RGBColor {
    let channel = |x: u8, y: u8| ((1.0 - s) * x as f64 + s * y as f64) as u8;
    RGBColor(channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}

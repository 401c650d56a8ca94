//! Diagnostic line plots
//!
//! Transfer functions, their antiderivative approximations and arbitrary
//! tab separated data are written as SVG line charts.

use plotters::prelude::*;
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

const SIZE: (u32, u32) = (1000, 600);
/// Fraction of the value range added above and below the data
const Y_PADDING: f64 = 0.05;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Nothing to plot")]
    NothingToPlot,
    #[error("Inconsistent number of columns in line {line}, expected {expected} columns:\n{text:?}")]
    InconsistentColumns {
        line: usize,
        expected: usize,
        text: String,
    },
    #[error("Cannot read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("Drawing failed: {0}")]
    Draw(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PlotError::Draw(e.to_string())
    }
}

/// One named line of a plot
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Pair `xs` with `ys`
    pub fn from_columns(label: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        Self::new(label, xs.iter().copied().zip(ys.iter().copied()).collect())
    }
}

/// Multi-series line chart
#[derive(Debug, Clone, Default)]
pub struct LinePlot {
    pub title: String,
    pub series: Vec<Series>,
}

impl LinePlot {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
        }
    }

    pub fn series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Bounding box of all finite points, `None` if there are none
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut points = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        let &(x, y) = points.next()?;
        let init = ((x, x), (y, y));
        Some(points.fold(init, |((x0, x1), (y0, y1)), &(x, y)| {
            ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))
        }))
    }

    /// Write the chart as SVG
    pub fn write_svg(&self, path: &Path) -> Result<(), PlotError> {
        let ((x_min, mut x_max), (mut y_min, mut y_max)) = self.bounds().ok_or(PlotError::NothingToPlot)?;
        if x_max <= x_min {
            x_max = x_min + 1.0;
        }
        let pad = ((y_max - y_min) * Y_PADDING).max(0.01);
        y_min -= pad;
        y_max += pad;

        let root = SVGBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart.configure_mesh().x_labels(10).y_labels(10).draw()?;

        for (i, series) in self.series.iter().enumerate() {
            let color = Palette99::pick(i).to_rgba();
            chart
                .draw_series(LineSeries::new(
                    series
                        .points
                        .iter()
                        .copied()
                        .filter(|(x, y)| x.is_finite() && y.is_finite()),
                    color.stroke_width(2),
                ))?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        info!(?path, series = self.series.len(), "wrote plot");
        Ok(())
    }
}

/// Read tab separated numeric columns
///
/// Blank lines are skipped. Every line must have as many columns as the
/// first one; lines with a value that is not a number are skipped with a
/// warning. At least two columns are needed: the first one holds the x
/// values.
pub fn parse_tsv<R: BufRead>(reader: R) -> Result<Vec<Vec<f64>>, PlotError> {
    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut expected: Option<usize> = None;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_matches(&[' ', '\r', '\n'][..]);
        if line.is_empty() {
            continue;
        }

        let row: Vec<&str> = line.split('\t').collect();
        match expected {
            None => {
                expected = Some(row.len());
                columns = vec![Vec::new(); row.len()];
            }
            Some(cols) if cols != row.len() => {
                return Err(PlotError::InconsistentColumns {
                    line: line_idx,
                    expected: cols,
                    text: line.to_string(),
                });
            }
            Some(_) => {}
        }

        let parsed: Result<Vec<f64>, _> = row.iter().map(|col| col.trim().parse::<f64>()).collect();
        match parsed {
            Ok(values) => {
                for (column, value) in columns.iter_mut().zip(values) {
                    column.push(value);
                }
            }
            Err(e) => warn!(line = line_idx, error = %e, text = line, "ignoring line"),
        }
    }

    if columns.len() < 2 {
        return Err(PlotError::NothingToPlot);
    }
    Ok(columns)
}

/// One series per column after the first, plotted against the first
pub fn tsv_plot(title: &str, columns: &[Vec<f64>]) -> Result<LinePlot, PlotError> {
    let (xs, rest) = columns.split_first().ok_or(PlotError::NothingToPlot)?;
    if rest.is_empty() {
        return Err(PlotError::NothingToPlot);
    }
    Ok(rest
        .iter()
        .enumerate()
        .fold(LinePlot::new(title), |plot, (i, ys)| {
            plot.series(Series::from_columns(format!("column {}", i + 2), xs, ys))
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_tsv() {
        let input = "0\t1\t2\n\n1\t2.5\t-3\r\n  \n2\t4\t1e-3\n";
        let columns = parse_tsv(Cursor::new(input)).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0], vec![0.0, 1.0, 2.0]);
        assert_eq!(columns[1], vec![1.0, 2.5, 4.0]);
        assert_eq!(columns[2], vec![2.0, -3.0, 0.001]);
    }

    #[test]
    fn test_parse_tsv_skips_unparsable_lines() {
        let input = "x\ty\n1\t2\n3\tfour\n5\t6\n";
        let columns = parse_tsv(Cursor::new(input)).unwrap();
        assert_eq!(columns[0], vec![1.0, 5.0]);
        assert_eq!(columns[1], vec![2.0, 6.0]);
    }

    #[test]
    fn test_parse_tsv_inconsistent_columns() {
        let input = "1\t2\n3\t4\t5\n";
        let err = parse_tsv(Cursor::new(input)).unwrap_err();
        assert!(
            matches!(err, PlotError::InconsistentColumns { line: 1, expected: 2, .. }),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_parse_tsv_nothing_to_plot() {
        assert!(matches!(parse_tsv(Cursor::new("")), Err(PlotError::NothingToPlot)));
        assert!(matches!(parse_tsv(Cursor::new("1\n2\n")), Err(PlotError::NothingToPlot)));
    }

    #[test]
    fn test_bounds_ignore_non_finite() {
        let plot = LinePlot::new("t")
            .series(Series::new("a", vec![(0.0, 1.0), (1.0, f64::NAN), (2.0, -1.0)]))
            .series(Series::new("b", vec![(-1.0, f64::INFINITY), (3.0, 0.5)]));
        assert_eq!(plot.bounds(), Some(((0.0, 3.0), (-1.0, 1.0))));
        assert_eq!(LinePlot::new("empty").bounds(), None);
    }

    #[test]
    fn test_write_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        let columns = vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0], vec![0.0, -1.0, -2.0]];
        tsv_plot("squares", &columns).unwrap().write_svg(&path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("squares"));
        assert!(svg.contains("column 3"));
    }

    #[test]
    fn test_write_svg_empty() {
        let dir = tempfile::tempdir().unwrap();
        let result = LinePlot::new("empty").write_svg(&dir.path().join("empty.svg"));
        assert!(matches!(result, Err(PlotError::NothingToPlot)));
    }
}

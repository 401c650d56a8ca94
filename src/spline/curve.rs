//! Piecewise polynomial transfer curves
//!
//! A curve is described on the non-negative half of the input range as a list
//! of segments, each owning the interval from its start point up to the next
//! segment's start (the last one ends at the saturation ceiling). Negative
//! inputs are handled by odd symmetry, and inputs at or beyond the ceiling
//! saturate.
//!
//! Coefficients are not written by hand: a [`CurveBuilder`] collects linear
//! [`Constraint`]s (values, derivatives, continuity at junctions), and the
//! stacked coefficient vector of all segments is solved in one go.

use super::linalg::{solve, Matrix, SolveError};
use super::polynomial::{derivative_weight, Polynomial};
use thiserror::Error;
use tracing::debug;

/// Solved coefficients smaller than this are rounding noise
const ZERO_THRESHOLD: f64 = 1e-12;

/// Errors while building a curve
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("a curve needs at least one segment")]
    NoSegments,
    #[error("segment start points must begin at 0 and increase strictly below the ceiling {ceiling}")]
    InvalidBreakpoints { ceiling: f64 },
    #[error("constraint refers to segment {segment}, but there are only {count}")]
    UnknownSegment { segment: usize, count: usize },
    #[error("{constraints} constraints given for {unknowns} unknown coefficients")]
    ConstraintCount { constraints: usize, unknowns: usize },
    #[error("invalid curve parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// A linear equation in the unknown segment coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// The `order`-th derivative of `segment` at `x` equals `target`
    /// (`order` 0 is the value itself)
    Value {
        segment: usize,
        x: f64,
        order: usize,
        target: f64,
    },
    /// The `order`-th derivatives of two segments agree at `x`
    Continuity {
        left: usize,
        right: usize,
        x: f64,
        order: usize,
    },
}

impl Constraint {
    pub fn value(segment: usize, x: f64, target: f64) -> Self {
        Constraint::Value {
            segment,
            x,
            order: 0,
            target,
        }
    }

    pub fn slope(segment: usize, x: f64, target: f64) -> Self {
        Constraint::Value {
            segment,
            x,
            order: 1,
            target,
        }
    }

    /// Continuity of value and the first `smoothness` derivatives at `x`
    pub fn smooth_junction(left: usize, right: usize, x: f64, smoothness: usize) -> Vec<Self> {
        (0..=smoothness)
            .map(|order| Constraint::Continuity {
                left,
                right,
                x,
                order,
            })
            .collect()
    }
}

/// One polynomial piece of a curve, valid from `start` up to the next piece
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub poly: Polynomial,
}

/// Collects segment layout and constraints, then solves for coefficients
#[derive(Debug, Clone)]
pub struct CurveBuilder {
    starts: Vec<f64>,
    degrees: Vec<usize>,
    ceiling: f64,
    saturation: f64,
    constraints: Vec<Constraint>,
}

impl CurveBuilder {
    /// Start a curve that saturates at `ceiling`
    pub fn new(ceiling: f64) -> Self {
        Self {
            starts: Vec::new(),
            degrees: Vec::new(),
            ceiling,
            saturation: 1.0,
            constraints: Vec::new(),
        }
    }

    /// Append a segment starting at `start` with a polynomial of `degree`
    pub fn segment(mut self, start: f64, degree: usize) -> Self {
        self.starts.push(start);
        self.degrees.push(degree);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Number of unknown coefficients over all segments
    pub fn unknowns(&self) -> usize {
        self.degrees.iter().map(|d| d + 1).sum()
    }

    fn offsets(&self) -> Vec<usize> {
        let mut offset = 0;
        self.degrees
            .iter()
            .map(|d| {
                let here = offset;
                offset += d + 1;
                here
            })
            .collect()
    }

    fn check_layout(&self) -> Result<(), CurveError> {
        if self.starts.is_empty() {
            return Err(CurveError::NoSegments);
        }
        let increasing = self.starts.windows(2).all(|w| w[0] < w[1]);
        let last = self.starts[self.starts.len() - 1];
        if self.starts[0] != 0.0 || !increasing || last >= self.ceiling {
            return Err(CurveError::InvalidBreakpoints {
                ceiling: self.ceiling,
            });
        }
        let count = self.starts.len();
        for c in &self.constraints {
            let (a, b) = match *c {
                Constraint::Value { segment, .. } => (segment, segment),
                Constraint::Continuity { left, right, .. } => (left, right),
            };
            for segment in [a, b] {
                if segment >= count {
                    return Err(CurveError::UnknownSegment { segment, count });
                }
            }
        }
        Ok(())
    }

    /// Assemble the linear system, one row per constraint
    pub fn system(&self) -> Result<(Matrix, Vec<f64>), CurveError> {
        self.check_layout()?;
        let unknowns = self.unknowns();
        if self.constraints.len() != unknowns {
            return Err(CurveError::ConstraintCount {
                constraints: self.constraints.len(),
                unknowns,
            });
        }

        let offsets = self.offsets();
        let mut matrix = Matrix::zeros(unknowns, unknowns);
        let mut rhs = vec![0.0; unknowns];

        for (r, c) in self.constraints.iter().enumerate() {
            let row = matrix.row_mut(r);
            match *c {
                Constraint::Value {
                    segment,
                    x,
                    order,
                    target,
                } => {
                    for power in 0..=self.degrees[segment] {
                        row[offsets[segment] + power] = derivative_weight(power, order, x);
                    }
                    rhs[r] = target;
                }
                Constraint::Continuity {
                    left,
                    right,
                    x,
                    order,
                } => {
                    for power in 0..=self.degrees[left] {
                        row[offsets[left] + power] += derivative_weight(power, order, x);
                    }
                    for power in 0..=self.degrees[right] {
                        row[offsets[right] + power] -= derivative_weight(power, order, x);
                    }
                }
            }
        }

        Ok((matrix, rhs))
    }

    /// Solve for all coefficients and derive the antiderivative
    pub fn build(self) -> Result<PiecewiseCurve, CurveError> {
        let (matrix, rhs) = self.system()?;
        debug!(unknowns = rhs.len(), "solving curve system\n{}", matrix);
        let mut solution = solve(&matrix, &rhs)?;
        for c in solution.iter_mut().filter(|c| c.abs() < ZERO_THRESHOLD) {
            *c = 0.0;
        }

        let segments = self
            .offsets()
            .into_iter()
            .zip(&self.degrees)
            .zip(&self.starts)
            .map(|((offset, degree), &start)| Segment {
                start,
                poly: Polynomial::new(solution[offset..offset + degree + 1].to_vec()),
            })
            .collect();

        Ok(PiecewiseCurve::new(segments, self.ceiling, self.saturation))
    }
}

/// An odd-symmetric piecewise polynomial curve with a saturated tail
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseCurve {
    segments: Vec<Segment>,
    antiderivative: Vec<Segment>,
    ceiling: f64,
    saturation: f64,
}

impl PiecewiseCurve {
    /// Wrap already solved segments
    ///
    /// The antiderivative pieces are integrated analytically. Their
    /// integration constants are fixed from the ceiling downwards: the last
    /// piece must meet the saturated tail `saturation * x` at the ceiling, and
    /// every other piece must meet its right neighbour at their junction.
    pub fn new(segments: Vec<Segment>, ceiling: f64, saturation: f64) -> Self {
        let mut antiderivative: Vec<Segment> = segments
            .iter()
            .map(|s| Segment {
                start: s.start,
                poly: s.poly.integral(0.0),
            })
            .collect();

        let mut right_end = ceiling;
        let mut right_value = saturation * ceiling;
        for piece in antiderivative.iter_mut().rev() {
            let constant = right_value - piece.poly.eval(right_end);
            piece.poly = piece.poly.with_constant(constant);
            right_end = piece.start;
            right_value = piece.poly.eval(piece.start);
        }

        Self {
            segments,
            antiderivative,
            ceiling,
            saturation,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn antiderivative_segments(&self) -> &[Segment] {
        &self.antiderivative
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Segment start points after the first, i.e. the inner junctions
    pub fn junctions(&self) -> impl Iterator<Item = f64> + '_ {
        self.segments.iter().skip(1).map(|s| s.start)
    }

    /// Index of the segment responsible for a non-negative input below the ceiling
    pub fn segment_index(&self, magnitude: f64) -> usize {
        self.segments
            .iter()
            .rposition(|s| s.start <= magnitude)
            .unwrap_or(0)
    }

    /// Evaluate the curve
    pub fn value(&self, x: f64) -> f64 {
        let (sign, magnitude) = split_sign(x);
        if magnitude >= self.ceiling {
            return sign * self.saturation;
        }
        sign * self.segments[self.segment_index(magnitude)].poly.eval(magnitude)
    }

    /// Evaluate the antiderivative (an even function)
    pub fn antiderivative(&self, x: f64) -> f64 {
        let magnitude = x.abs();
        if magnitude >= self.ceiling {
            return self.saturation * magnitude;
        }
        self.antiderivative[self.segment_index(magnitude)]
            .poly
            .eval(magnitude)
    }

    /// Apply the curve `n` times
    pub fn iterate(&self, x: f64, n: usize) -> f64 {
        (0..n).fold(x, |acc, _| self.value(acc))
    }
}

fn split_sign(x: f64) -> (f64, f64) {
    if x < 0.0 {
        (-1.0, -x)
    } else {
        (1.0, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_piece() -> PiecewiseCurve {
        // Cubic from 0 to 1, quadratic from 1 to 3, flat afterwards
        CurveBuilder::new(3.0)
            .segment(0.0, 3)
            .segment(1.0, 2)
            .constraint(Constraint::value(0, 0.0, 0.0))
            .constraint(Constraint::slope(0, 0.0, 1.0))
            .constraint(Constraint::value(0, 1.0, 0.8))
            .constraints(Constraint::smooth_junction(0, 1, 1.0, 1))
            .constraint(Constraint::value(1, 3.0, 1.0))
            .constraint(Constraint::slope(1, 3.0, 0.0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_constraints_hold() {
        let curve = two_piece();
        let f = &curve.segments()[0].poly;
        let g = &curve.segments()[1].poly;
        assert!(f.eval(0.0).abs() < 1e-9);
        assert!((f.eval_derivative(1, 0.0) - 1.0).abs() < 1e-9);
        assert!((f.eval(1.0) - 0.8).abs() < 1e-9);
        assert!((g.eval(1.0) - 0.8).abs() < 1e-9);
        assert!((f.eval_derivative(1, 1.0) - g.eval_derivative(1, 1.0)).abs() < 1e-9);
        assert!((g.eval(3.0) - 1.0).abs() < 1e-9);
        assert!(g.eval_derivative(1, 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_odd_symmetry_and_saturation() {
        let curve = two_piece();
        for &x in &[0.1, 0.5, 0.99, 1.0, 1.7, 2.9] {
            assert_eq!(curve.value(-x), -curve.value(x));
            assert_eq!(curve.antiderivative(-x), curve.antiderivative(x));
        }
        assert_eq!(curve.value(3.0), 1.0);
        assert_eq!(curve.value(-7.5), -1.0);
        assert_eq!(curve.antiderivative(3.0), 3.0);
        assert_eq!(curve.antiderivative(-7.5), 7.5);
    }

    #[test]
    fn test_antiderivative_continuity() {
        let curve = two_piece();
        let pieces = curve.antiderivative_segments();
        let at_junction_left = pieces[0].poly.eval(1.0);
        let at_junction_right = pieces[1].poly.eval(1.0);
        assert!((at_junction_left - at_junction_right).abs() < 1e-9);
        assert!((pieces[1].poly.eval(3.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_lookup() {
        let curve = two_piece();
        assert_eq!(curve.segment_index(0.0), 0);
        assert_eq!(curve.segment_index(0.999), 0);
        assert_eq!(curve.segment_index(1.0), 1);
        assert_eq!(curve.segment_index(2.5), 1);
        assert_eq!(curve.junctions().collect::<Vec<_>>(), vec![1.0]);
    }

    #[test]
    fn test_iterate() {
        let curve = two_piece();
        assert_eq!(curve.iterate(0.4, 0), 0.4);
        assert_eq!(curve.iterate(0.4, 2), curve.value(curve.value(0.4)));
    }

    #[test]
    fn test_constraint_count_mismatch() {
        let result = CurveBuilder::new(3.0)
            .segment(0.0, 3)
            .constraint(Constraint::value(0, 0.0, 0.0))
            .build();
        assert_eq!(
            result.unwrap_err(),
            CurveError::ConstraintCount {
                constraints: 1,
                unknowns: 4
            }
        );
    }

    #[test]
    fn test_invalid_layout() {
        assert_eq!(CurveBuilder::new(3.0).build().unwrap_err(), CurveError::NoSegments);

        let not_from_zero = CurveBuilder::new(3.0)
            .segment(0.5, 0)
            .constraint(Constraint::value(0, 1.0, 1.0))
            .build();
        assert!(matches!(
            not_from_zero,
            Err(CurveError::InvalidBreakpoints { .. })
        ));

        let past_ceiling = CurveBuilder::new(1.0)
            .segment(0.0, 0)
            .segment(2.0, 0)
            .constraint(Constraint::value(0, 0.0, 0.0))
            .constraint(Constraint::value(1, 2.0, 1.0))
            .build();
        assert!(matches!(
            past_ceiling,
            Err(CurveError::InvalidBreakpoints { .. })
        ));

        let unknown = CurveBuilder::new(3.0)
            .segment(0.0, 0)
            .constraint(Constraint::value(4, 0.0, 0.0))
            .build();
        assert_eq!(
            unknown.unwrap_err(),
            CurveError::UnknownSegment {
                segment: 4,
                count: 1
            }
        );
    }

    #[test]
    fn test_redundant_constraints_are_singular() {
        let result = CurveBuilder::new(3.0)
            .segment(0.0, 1)
            .constraint(Constraint::value(0, 1.0, 1.0))
            .constraint(Constraint::value(0, 1.0, 1.0))
            .build();
        assert!(matches!(result, Err(CurveError::Solve(SolveError::Singular { .. }))));
    }
}

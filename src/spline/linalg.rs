//! Dense linear systems
//!
//! The curve solvers only ever deal with small square systems (a handful of
//! polynomial coefficients), so a plain row-major matrix and Gaussian
//! elimination with partial pivoting is all that is needed.

use std::fmt;
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// Pivots smaller than this are treated as zero
const SINGULAR_EPSILON: f64 = 1e-12;

/// Errors from [`solve`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("right hand side has {got} entries, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("matrix is singular (no usable pivot in column {column})")]
    Singular { column: usize },
}

/// Row-major dense matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a `rows` x `cols` matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from a list of equally long rows
    ///
    /// # Panics
    /// Panics if the rows have different lengths
    ///
    /// # Example
    /// ```
    /// use synthgen::spline::linalg::Matrix;
    ///
    /// let m = Matrix::from_rows(&[&[1.0, 2.0], &[3.0, 4.0]]);
    /// assert_eq!(m[(1, 0)], 3.0);
    /// ```
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "All rows must have the same length");
            data.extend_from_slice(row);
        }
        Self {
            rows: rows.len(),
            cols,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow one row
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Mutably borrow one row
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Multiply by a column vector
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.rows)
            .map(|r| self.row(r).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(a * self.cols + c, b * self.cols + c);
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.data[r * self.cols + c]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let cells: Vec<String> = self.row(r).iter().map(|v| format!("{:>12.6}", v)).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Solve `a * x = b` for `x`
///
/// Uses Gaussian elimination with partial pivoting on a copy of the system.
///
/// # Example
/// ```
/// use synthgen::spline::linalg::{solve, Matrix};
///
/// let a = Matrix::from_rows(&[&[2.0, 1.0], &[1.0, 3.0]]);
/// let x = solve(&a, &[3.0, 5.0]).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve(a: &Matrix, b: &[f64]) -> Result<Vec<f64>, SolveError> {
    if a.rows != a.cols {
        return Err(SolveError::NotSquare {
            rows: a.rows,
            cols: a.cols,
        });
    }
    if b.len() != a.rows {
        return Err(SolveError::DimensionMismatch {
            expected: a.rows,
            got: b.len(),
        });
    }

    let n = a.rows;
    let mut m = a.clone();
    let mut rhs = b.to_vec();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| m[(x, col)].abs().total_cmp(&m[(y, col)].abs()))
            .unwrap_or(col);
        if m[(pivot_row, col)].abs() < SINGULAR_EPSILON {
            return Err(SolveError::Singular { column: col });
        }
        m.swap_rows(col, pivot_row);
        rhs.swap(col, pivot_row);

        let pivot = m[(col, col)];
        for r in col + 1..n {
            let factor = m[(r, col)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in col..n {
                let v = m[(col, c)];
                m[(r, c)] -= factor * v;
            }
            rhs[r] -= factor * rhs[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for r in (0..n).rev() {
        let tail: f64 = (r + 1..n).map(|c| m[(r, c)] * x[c]).sum();
        x[r] = (rhs[r] - tail) / m[(r, r)];
    }

    Ok(x)
}

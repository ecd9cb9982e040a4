//! Minimal dense matrix support for the OLS normal equations.
//!
//! The ADF regression and the VAR fit both solve B = (XᵗX)⁻¹(XᵗY).
//! Matrices here are immutable row-major buffers; `transpose` returns a
//! new matrix rather than aliasing the backing storage.

use crate::error::{FloodcastError, Result};

/// Pivot magnitudes below this are treated as singular.
const PIVOT_EPSILON: f64 = 1e-12;

/// Immutable row-major dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from nested rows, validating a rectangular shape.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(row_count * col_count);
        for row in &rows {
            if row.len() != col_count {
                return Err(FloodcastError::DimensionMismatch {
                    expected: col_count,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: row_count,
            cols: col_count,
            data,
        })
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Transposed copy; the receiver is untouched.
    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }

    /// Matrix product `self * other`.
    pub fn matmul(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(FloodcastError::DimensionMismatch {
                expected: self.cols,
                got: other.rows,
            });
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for r in 0..self.rows {
            for k in 0..self.cols {
                let lhs = self.data[r * self.cols + k];
                if lhs == 0.0 {
                    continue;
                }
                for c in 0..other.cols {
                    out.data[r * other.cols + c] += lhs * other.data[k * other.cols + c];
                }
            }
        }
        Ok(out)
    }

    /// Inverse via Gauss-Jordan elimination with partial pivoting.
    pub fn inverse(&self) -> Result<Matrix> {
        if self.rows != self.cols {
            return Err(FloodcastError::DimensionMismatch {
                expected: self.rows,
                got: self.cols,
            });
        }
        let n = self.rows;
        let mut work = self.data.clone();
        let mut inv = Matrix::identity(n);

        for col in 0..n {
            let mut pivot_row = col;
            let mut pivot_mag = work[col * n + col].abs();
            for r in (col + 1)..n {
                let mag = work[r * n + col].abs();
                if mag > pivot_mag {
                    pivot_row = r;
                    pivot_mag = mag;
                }
            }
            if pivot_mag < PIVOT_EPSILON {
                return Err(FloodcastError::SingularMatrix);
            }
            if pivot_row != col {
                for c in 0..n {
                    work.swap(col * n + c, pivot_row * n + c);
                    inv.data.swap(col * n + c, pivot_row * n + c);
                }
            }

            let pivot = work[col * n + col];
            for c in 0..n {
                work[col * n + c] /= pivot;
                inv.data[col * n + c] /= pivot;
            }
            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = work[r * n + col];
                if factor == 0.0 {
                    continue;
                }
                for c in 0..n {
                    work[r * n + c] -= factor * work[col * n + c];
                    inv.data[r * n + c] -= factor * inv.data[col * n + c];
                }
            }
        }
        Ok(inv)
    }
}

/// Solve the OLS normal equations B = (XᵗX)⁻¹(XᵗY).
///
/// `y` may have multiple columns; each column is a separate regression
/// sharing the design matrix `x`. Errors with `SingularMatrix` when XᵗX
/// is not invertible and `InsufficientData` when the system is
/// under-determined.
pub fn least_squares(x: &Matrix, y: &Matrix) -> Result<Matrix> {
    if x.rows() != y.rows() {
        return Err(FloodcastError::DimensionMismatch {
            expected: x.rows(),
            got: y.rows(),
        });
    }
    if x.rows() < x.cols() {
        return Err(FloodcastError::InsufficientData {
            needed: x.cols(),
            got: x.rows(),
        });
    }
    let xt = x.transpose();
    let xtx = xt.matmul(x)?;
    let xty = xt.matmul(y)?;
    xtx.inverse()?.matmul(&xty)
}

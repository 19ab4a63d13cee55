use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// `data` is public so layer readiness checks can catch ragged rows; the
/// constructors always produce rectangular matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Every entry drawn independently and uniformly from `[0, 1)`.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.gen::<f64>();
            }
        }

        res
    }

    /// Wraps existing rows, rejecting ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(Error::shape(format!(
                "row {i} has {} columns, expected {cols}", row.len()
            )));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a `rows x cols` matrix from a row-major flat buffer.
    pub fn from_flat(rows: usize, cols: usize, flat: &[f64]) -> Result<Matrix> {
        if flat.len() != rows * cols {
            return Err(Error::shape(format!(
                "{} values cannot fill a {rows}x{cols} matrix", flat.len()
            )));
        }
        let data = if cols == 0 {
            vec![Vec::new(); rows]
        } else {
            flat.chunks(cols).map(|row| row.to_vec()).collect()
        };
        Ok(Matrix { rows, cols, data })
    }

    /// Entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

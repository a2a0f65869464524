use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::math::vector::Array1;

/// Dense row-major 2D buffer. Rows are features, columns are samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Array2<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Array2<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self, ShapeError> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(ShapeError {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = self.offset(row, 0);
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            Some(&self.data[self.offset(row, col)])
        } else {
            None
        }
    }

    pub fn column(&self, col: usize) -> Array1<T>
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        let mut values = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            values.push(self[(row, col)].clone());
        }
        Array1::from_vec(values)
    }

    /// Copy column `src_col` of `src` into column `dst_col` of `self`.
    /// Row `i` of the source lands in row `i` of the destination.
    pub fn copy_column_from(&mut self, src: &Array2<T>, src_col: usize, dst_col: usize)
    where
        T: Clone,
    {
        assert_eq!(self.rows, src.rows, "row count mismatch in column copy");
        assert!(
            src_col < src.cols && dst_col < self.cols,
            "column index out of bounds"
        );
        for row in 0..self.rows {
            let value = src[(row, src_col)].clone();
            self[(row, dst_col)] = value;
        }
    }

    /// Build a new matrix from the given source columns, in the order given.
    pub fn select_columns(&self, indices: &[usize]) -> Array2<T>
    where
        T: Clone + Default,
    {
        let mut out = Array2::from_elem((self.rows, indices.len()), T::default());
        for (dst, &src) in indices.iter().enumerate() {
            out.copy_column_from(self, src, dst);
        }
        out
    }

}

impl<T: Clone> Array2<T> {
    pub fn from_elem(shape: (usize, usize), value: T) -> Self {
        let (rows, cols) = shape;
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }
}

impl Array2<f64> {
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self::from_elem(shape, 0.0)
    }

    /// Arithmetic mean across one row. `NaN` when the matrix has no columns.
    pub fn row_mean(&self, row: usize) -> f64 {
        let values = self.row_slice(row);
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl<T> Index<(usize, usize)> for Array2<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

#[derive(Debug, Clone)]
pub struct ShapeError {
    rows: usize,
    cols: usize,
    len: usize,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid shape ({}, {}) for buffer of length {}",
            self.rows, self.cols, self.len
        )
    }
}

impl Error for ShapeError {}

use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use serde::{Serialize, Deserialize};

use crate::error::Error;
use crate::linalg::LinAlg;

mod det;

/// Dense rectangular container of f64 elements in column-major order
/// (the layout the original LAPACK-facing code used, and the layout the
/// bundled nalgebra backend copies without transposition).
///
/// The buffer length always equals `rows * cols`; there is no resizing
/// after construction except through [`Matrix::reshape`], which preserves
/// the element count. Every matrix exclusively owns its buffer: operations
/// that return a matrix hand the caller an owned value, and in-place
/// operations take `&mut self` and never reallocate the primary buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows : usize,
    cols : usize,
    data : Vec<f64>
}

impl Matrix {

    /// Construct a zero-initialized matrix of the given shape.
    /// Panics if `rows * cols` overflows `usize` (programmer error,
    /// same class as allocation failure).
    pub fn new(rows : usize, cols : usize) -> Self {
        let len = rows.checked_mul(cols)
            .expect("matrix dimensions overflow");
        Self { rows, cols, data : vec![0.0; len] }
    }

    /// All-zero matrix; deterministic initial content.
    pub fn zeros(rows : usize, cols : usize) -> Self {
        Self::new(rows, cols)
    }

    /// Identity matrix of order n.
    pub fn identity(n : usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Build a matrix by evaluating `f(row, col)` at every position.
    pub fn from_fn<F : Fn(usize, usize) -> f64>(rows : usize, cols : usize, f : F) -> Self {
        let mut m = Self::new(rows, cols);
        for j in 0..cols {
            for i in 0..rows {
                m[(i, j)] = f(i, j);
            }
        }
        m
    }

    /// Wrap a column-major buffer. Panics unless `data.len() == rows * cols`.
    pub fn from_vec(rows : usize, cols : usize, data : Vec<f64>) -> Self {
        assert!(data.len() == rows.checked_mul(cols).expect("matrix dimensions overflow"));
        Self { rows, cols, data }
    }

    /// Assemble a dim×n sample matrix from n equally-sized column slices.
    pub fn from_columns<S : AsRef<[f64]>>(rows : usize, columns : &[S]) -> Result<Self, Error> {
        let mut data = Vec::with_capacity(rows * columns.len());
        for col in columns {
            let col = col.as_ref();
            if col.len() != rows {
                return Err(Error::ShapeMismatch(rows, 1, col.len(), 1));
            }
            data.extend_from_slice(col);
        }
        Ok(Self { rows, cols : columns.len(), data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Column-major view of the buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..]
    }

    fn apply<F : Fn(f64) -> f64>(&mut self, f : F) {
        for v in self.data.iter_mut() {
            *v = f(*v);
        }
    }

    // Element-wise in-place transforms. Domain errors (acos outside
    // [-1,1], sqrt of a negative, division by zero) are not checked:
    // IEEE NaN/Inf propagate, which is the documented contract.

    /// Drop the fractional part of every element.
    pub fn truncate(&mut self) {
        self.apply(|x| x.trunc());
    }

    pub fn acos(&mut self) {
        self.apply(|x| x.acos());
    }

    pub fn sqrt(&mut self) {
        self.apply(|x| x.sqrt());
    }

    pub fn negate(&mut self) {
        self.apply(|x| -x);
    }

    pub fn exp(&mut self) {
        self.apply(|x| x.exp());
    }

    /// Raise every element to the power `p`.
    pub fn pow(&mut self, p : f64) {
        self.apply(|x| x.powf(p));
    }

    pub fn scale(&mut self, x : f64) {
        self.apply(|v| v * x);
    }

    pub fn divide_by_constant(&mut self, x : f64) {
        self.apply(|v| v / x);
    }

    /// Replace every element e with `x / e`.
    pub fn invert_divide(&mut self, x : f64) {
        self.apply(|v| x / v);
    }

    pub fn add_constant(&mut self, x : f64) {
        self.apply(|v| v + x);
    }

    /// Swap column j with column cols-1-j, in place.
    pub fn flip_columns(&mut self) {
        for j in 0..self.cols / 2 {
            for i in 0..self.rows {
                let k = self.cols - j - 1;
                let tmp = self[(i, j)];
                self[(i, j)] = self[(i, k)];
                self[(i, k)] = tmp;
            }
        }
    }

    /// Remap every element to `(x - min) / (max - min)` using the global
    /// min/max. When max == min the division yields NaN; that is the
    /// documented behavior, not checked here.
    pub fn normalize_unit_range(&mut self) {
        if self.data.is_empty() {
            return;
        }
        let mut min = self.data[0];
        let mut max = self.data[0];
        for &v in self.data.iter() {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        self.apply(|x| (x - min) / (max - min));
    }

    /// Sum of each column, as a 1×cols row.
    pub fn sum_columns(&self) -> Matrix {
        let mut r = Matrix::new(1, self.cols);
        for j in 0..self.cols {
            let mut val = 0.0;
            for i in 0..self.rows {
                val += self[(i, j)];
            }
            r[(0, j)] = val;
        }
        r
    }

    /// Mean of each column, as a 1×cols row.
    pub fn mean_columns(&self) -> Matrix {
        let mut r = self.sum_columns();
        r.divide_by_constant(self.rows as f64);
        r
    }

    /// Sum of each row, as a rows×1 column.
    pub fn sum_rows(&self) -> Matrix {
        let mut r = Matrix::new(self.rows, 1);
        for i in 0..self.rows {
            let mut val = 0.0;
            for j in 0..self.cols {
                val += self[(i, j)];
            }
            r[(i, 0)] = val;
        }
        r
    }

    /// Mean of each row, as a rows×1 column (the "mean sample" when
    /// columns are samples).
    pub fn mean_rows(&self) -> Matrix {
        let mut r = self.sum_rows();
        r.divide_by_constant(self.cols as f64);
        r
    }

    /// 1-indexed row positions of every nonzero element, scanned in
    /// row-major order, as a count×1 column. The result is right-sized;
    /// an empty (0×1) column means no nonzero element was found.
    pub fn find_nonzero_row_indices(&self) -> Matrix {
        let mut found = Vec::new();
        for i in 0..self.rows {
            for j in 0..self.cols {
                if self[(i, j)] != 0.0 {
                    found.push((i + 1) as f64);
                }
            }
        }
        let count = found.len();
        Matrix::from_vec(count, 1, found)
    }

    /// New matrix with `result[j, i] = self[i, j]`.
    pub fn transpose(&self) -> Matrix {
        let mut t = Matrix::new(self.cols, self.rows);
        for i in 0..t.rows {
            for j in 0..t.cols {
                t[(i, j)] = self[(j, i)];
            }
        }
        t
    }

    /// Refill a new shape from this matrix's row-major traversal. The
    /// element count must be preserved. This walks source and destination
    /// coordinates independently; it is not a stride reinterpretation.
    pub fn reshape(&self, new_rows : usize, new_cols : usize) -> Result<Matrix, Error> {
        if new_rows * new_cols != self.rows * self.cols {
            return Err(Error::ShapeMismatch(self.rows, self.cols, new_rows, new_cols));
        }
        let mut r = Matrix::new(new_rows, new_cols);
        for i in 0..new_rows * new_cols {
            let (r1, c1) = (i / new_cols, i % new_cols);
            let (r2, c2) = (i / self.cols, i % self.cols);
            r[(r1, c1)] = self[(r2, c2)];
        }
        Ok(r)
    }

    fn check_same_shape(&self, other : &Matrix) -> Result<(), Error> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(Error::ShapeMismatch(self.rows, self.cols, other.rows, other.cols));
        }
        Ok(())
    }

    /// Element-wise sum, as a new matrix.
    pub fn add(&self, other : &Matrix) -> Result<Matrix, Error> {
        self.check_same_shape(other)?;
        let mut r = self.clone();
        for (a, b) in r.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(r)
    }

    /// Element-wise difference, as a new matrix.
    pub fn subtract(&self, other : &Matrix) -> Result<Matrix, Error> {
        self.check_same_shape(other)?;
        let mut r = self.clone();
        for (a, b) in r.data.iter_mut().zip(other.data.iter()) {
            *a -= b;
        }
        Ok(r)
    }

    /// Element-wise quotient, as a new matrix. Division by zero propagates
    /// Inf/NaN.
    pub fn divide(&self, other : &Matrix) -> Result<Matrix, Error> {
        self.check_same_shape(other)?;
        let mut r = self.clone();
        for (a, b) in r.data.iter_mut().zip(other.data.iter()) {
            *a /= b;
        }
        Ok(r)
    }

    /// Element-wise sum accumulated into self.
    pub fn add_assign_matrix(&mut self, other : &Matrix) -> Result<(), Error> {
        self.check_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(())
    }

    /// Subtract a rows×1 column vector from every column, in place
    /// (mean-centering when `col` carries the row means).
    pub fn subtract_columns(&mut self, col : &Matrix) -> Result<(), Error> {
        if col.rows != self.rows || col.cols != 1 {
            return Err(Error::ShapeMismatch(self.rows, 1, col.rows, col.cols));
        }
        for j in 0..self.cols {
            for i in 0..self.rows {
                self[(i, j)] -= col[(i, 0)];
            }
        }
        Ok(())
    }

    /// Copy of the half-open column range `[from, to)`.
    pub fn copy_columns(&self, from : usize, to : usize) -> Matrix {
        assert!(from <= to && to <= self.cols);
        let data = self.data[from * self.rows .. to * self.rows].to_vec();
        Matrix { rows : self.rows, cols : to - from, data }
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Sample covariance of the columns-as-variables: each column is
    /// centered by its own mean and `C[j, k] = Σ_i Xc[i,j]·Xc[i,k] / (rows - 1)`.
    /// Result is cols×cols.
    pub fn covariance(&self) -> Matrix {
        let means = self.mean_columns();
        let mut centered = self.clone();
        for j in 0..self.cols {
            for i in 0..self.rows {
                centered[(i, j)] -= means[(0, j)];
            }
        }
        let mut r = Matrix::new(self.cols, self.cols);
        for j in 0..self.cols {
            for k in 0..self.cols {
                let mut val = 0.0;
                for i in 0..self.rows {
                    val += centered[(i, j)] * centered[(i, k)];
                }
                r[(j, k)] = val / (self.rows as f64 - 1.0);
            }
        }
        r
    }

    /// New matrix whose column j is this matrix's column `order[(0, j)]`.
    /// `order` must be a 1×cols row of in-range indices.
    pub fn reorder_columns(&self, order : &Matrix) -> Result<Matrix, Error> {
        if order.rows != 1 || order.cols != self.cols {
            return Err(Error::ShapeMismatch(1, self.cols, order.rows, order.cols));
        }
        let mut r = Matrix::new(self.rows, self.cols);
        for j in 0..self.cols {
            let src = order[(0, j)] as usize;
            if src >= self.cols {
                return Err(Error::PreconditionViolation("column order index out of range"));
            }
            for i in 0..self.rows {
                r[(i, j)] = self[(i, src)];
            }
        }
        Ok(r)
    }

    /// Matrix product via the provider. Requires `self.cols == other.rows`.
    pub fn product(&self, other : &Matrix, la : &dyn LinAlg) -> Result<Matrix, Error> {
        if self.cols != other.rows {
            return Err(Error::ShapeMismatch(self.rows, self.cols, other.rows, other.cols));
        }
        la.product(self, other)
    }

    /// LU-based inversion via the provider. Rejects rectangular input up
    /// front; on `SingularMatrix` the contents of self are undefined, so
    /// invert a copy if the original still matters.
    pub fn invert_in_place(&mut self, la : &dyn LinAlg) -> Result<(), Error> {
        if self.rows != self.cols {
            return Err(Error::NotSquare(self.rows, self.cols));
        }
        la.invert(self)
    }

}

impl Index<(usize, usize)> for Matrix {

    type Output = f64;

    fn index(&self, (i, j) : (usize, usize)) -> &f64 {
        &self.data[j * self.rows + i]
    }

}

impl IndexMut<(usize, usize)> for Matrix {

    fn index_mut(&mut self, (i, j) : (usize, usize)) -> &mut f64 {
        &mut self.data[j * self.rows + i]
    }

}

/// Text form mirroring the original stream format: a `rows cols` header
/// line, then one line per row.
impl Display for Matrix {

    fn fmt(&self, f : &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "{} {}", self.rows, self.cols)?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                write!(f, "{} ", self[(i, j)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

}

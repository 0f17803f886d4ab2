use super::Matrix;
use crate::error::Error;

impl Matrix {

    /// Determinant by recursive cofactor expansion along the first active
    /// row. 1×1 and 2×2 are closed-form base cases; larger orders recurse
    /// over row/column index masks, so no minor submatrix is ever
    /// materialized. Cost is factorial in the order — acceptable for the
    /// small matrices this engine targets, and a hard ceiling otherwise.
    pub fn determinant(&self) -> Result<f64, Error> {
        if self.rows() != self.cols() {
            return Err(Error::NotSquare(self.rows(), self.cols()));
        }
        if self.rows() == 0 {
            return Err(Error::EmptyInput);
        }
        let rows : Vec<usize> = (0..self.rows()).collect();
        let cols : Vec<usize> = (0..self.cols()).collect();
        Ok(det_masked(self, &rows, &cols))
    }

    /// Matrix of signed minor determinants in the adjugate convention:
    /// the cofactor of position (i, j) is stored at the transposed
    /// position (j, i). The transposition is load-bearing for
    /// inverse-via-adjugate callers and is preserved exactly.
    pub fn cofactor_matrix(&self) -> Result<Matrix, Error> {
        let n = self.rows();
        if n != self.cols() {
            return Err(Error::NotSquare(self.rows(), self.cols()));
        }
        if n < 2 {
            // adjugate of a 1×1 (or empty) matrix
            return Ok(Matrix::identity(n));
        }
        let mut r = Matrix::new(n, n);
        for i in 0..n {
            for j in 0..n {
                let rows : Vec<usize> = (0..n).filter(|&k| k != i).collect();
                let cols : Vec<usize> = (0..n).filter(|&k| k != j).collect();
                let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                r[(j, i)] = sign * det_masked(self, &rows, &cols);
            }
        }
        Ok(r)
    }

}

/// Determinant of the submatrix selected by the active row/column index
/// lists. The lists always have equal length.
fn det_masked(m : &Matrix, rows : &[usize], cols : &[usize]) -> f64 {
    let n = rows.len();
    if n == 1 {
        return m[(rows[0], cols[0])];
    }
    if n == 2 {
        return m[(rows[0], cols[0])] * m[(rows[1], cols[1])]
             - m[(rows[0], cols[1])] * m[(rows[1], cols[0])];
    }
    let sub_rows = &rows[1..];
    let mut det = 0.0;
    let mut sign = 1.0;
    for (j, &col) in cols.iter().enumerate() {
        let sub_cols : Vec<usize> = cols.iter()
            .enumerate()
            .filter(|(k, _)| *k != j)
            .map(|(_, &c)| c)
            .collect();
        det += sign * m[(rows[0], col)] * det_masked(m, sub_rows, &sub_cols);
        sign = -sign;
    }
    det
}

use nalgebra::{DMatrix, DVector};

use crate::error::Error;
use crate::matrix::Matrix;

/// Result of an eigendecomposition: eigenvalues as an n×1 column and
/// eigenvectors as the columns of an n×n matrix, paired by index (the
/// i-th value belongs to the i-th column).
#[derive(Debug, Clone)]
pub struct Eigen {
    pub values : Matrix,
    pub vectors : Matrix
}

/// Capability interface for the dense-algebra primitives this engine
/// delegates: matrix product, LU-based inversion, and eigendecomposition.
/// The trait is object-safe so the subspace pipeline can be exercised
/// against a mock with hand-computed small-matrix results.
///
/// Implementations may assume `product` is called with agreeing inner
/// dimensions and `invert` with a square target; [`Matrix::product`] and
/// [`Matrix::invert_in_place`] check those contracts before delegating.
pub trait LinAlg {

    /// `a · b`, as a new `a.rows × b.cols` matrix.
    fn product(&self, a : &Matrix, b : &Matrix) -> Result<Matrix, Error>;

    /// Replace `m` with its inverse via LU factorization with partial
    /// pivoting. On `SingularMatrix` the contents of `m` are undefined.
    fn invert(&self, m : &mut Matrix) -> Result<(), Error>;

    /// Eigenvalues and right eigenvectors of a square matrix. A failed
    /// solve (including a genuinely complex spectrum, which this f64
    /// engine cannot represent) reports `SingularMatrix`.
    fn eigen(&self, m : &Matrix) -> Result<Eigen, Error>;

}

/// `a · b⁻¹`, inverting a copy of `b`; neither argument is mutated.
pub fn matrix_divide(a : &Matrix, b : &Matrix, la : &dyn LinAlg) -> Result<Matrix, Error> {
    let mut inv = b.clone();
    inv.invert_in_place(la)?;
    a.product(&inv, la)
}

/// Bundled nalgebra-backed provider. Symmetric input goes through the
/// symmetric eigensolver; non-symmetric input (the LDA ratio matrix)
/// takes real eigenvalues from the Schur form and pairs eigenvectors by
/// inverse iteration on the shifted LU.
pub struct Dense;

fn to_dmatrix(m : &Matrix) -> DMatrix<f64> {
    DMatrix::from_column_slice(m.rows(), m.cols(), m.as_slice())
}

fn from_dmatrix(d : &DMatrix<f64>) -> Matrix {
    Matrix::from_vec(d.nrows(), d.ncols(), d.as_slice().to_vec())
}

fn is_symmetric(d : &DMatrix<f64>, tol : f64) -> bool {
    let n = d.nrows();
    for i in 0..n {
        for j in i + 1..n {
            if (d[(i, j)] - d[(j, i)]).abs() > tol {
                return false;
            }
        }
    }
    true
}

/// One eigenvector of `a` for the (approximate) eigenvalue `lambda`, by a
/// few rounds of inverse iteration with a small diagonal shift off the
/// eigenvalue so the factorization stays usable.
fn inverse_iteration(a : &DMatrix<f64>, lambda : f64, scale : f64, seed : usize) -> Result<DVector<f64>, Error> {
    let n = a.nrows();
    for &eps in [1e-8, 1e-5].iter() {
        let shift = lambda + eps * scale;
        let mut shifted = a.clone();
        for i in 0..n {
            shifted[(i, i)] -= shift;
        }
        let lu = shifted.lu();
        // start vector varied per index so repeated eigenvalues do not
        // all iterate from the same point
        let mut v = DVector::from_fn(n, |i, _| 1.0 + 0.25 * ((i + seed) % n) as f64);
        let mut ok = true;
        for _ in 0..3 {
            match lu.solve(&v) {
                Some(w) => {
                    let norm = w.norm();
                    if norm == 0.0 {
                        ok = false;
                        break;
                    }
                    v = w.unscale(norm);
                },
                None => {
                    ok = false;
                    break;
                }
            }
        }
        if ok {
            return Ok(v);
        }
    }
    Err(Error::SingularMatrix)
}

impl LinAlg for Dense {

    fn product(&self, a : &Matrix, b : &Matrix) -> Result<Matrix, Error> {
        let c = to_dmatrix(a) * to_dmatrix(b);
        Ok(from_dmatrix(&c))
    }

    fn invert(&self, m : &mut Matrix) -> Result<(), Error> {
        let lu = to_dmatrix(m).lu();
        match lu.try_inverse() {
            Some(inv) => {
                *m = from_dmatrix(&inv);
                Ok(())
            },
            None => Err(Error::SingularMatrix)
        }
    }

    fn eigen(&self, m : &Matrix) -> Result<Eigen, Error> {
        if m.rows() != m.cols() {
            return Err(Error::NotSquare(m.rows(), m.cols()));
        }
        let d = to_dmatrix(m);
        let n = d.nrows();
        let scale = d.amax().max(1.0);

        if is_symmetric(&d, 1e-12 * scale) {
            let se = d.symmetric_eigen();
            let values = Matrix::from_vec(n, 1, se.eigenvalues.as_slice().to_vec());
            let vectors = Matrix::from_vec(n, n, se.eigenvectors.as_slice().to_vec());
            return Ok(Eigen { values, vectors });
        }

        let complex = d.complex_eigenvalues();
        let mut values = Matrix::new(n, 1);
        for (i, c) in complex.iter().enumerate() {
            if c.im.abs() > 1e-7 * scale {
                return Err(Error::SingularMatrix);
            }
            values[(i, 0)] = c.re;
        }

        let mut vectors = Matrix::new(n, n);
        for k in 0..n {
            let v = inverse_iteration(&d, values[(k, 0)], scale, k)?;
            for i in 0..n {
                vectors[(i, k)] = v[i];
            }
        }
        Ok(Eigen { values, vectors })
    }

}

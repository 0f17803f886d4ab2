use crate::error::Error;
use crate::linalg::LinAlg;
use crate::matrix::Matrix;

mod lda;

pub use lda::*;

/// Principal component basis of a mean-centered sample matrix (columns are
/// samples). The covariance surrogate `Xc · Xcᵀ` is handed to the provider's
/// eigensolver — the constant covariance divisor is dropped since it does
/// not change the eigenvectors — and the eigenvector rows form the returned
/// transposed basis `W_pca'`.
pub fn pca(xc : &Matrix, la : &dyn LinAlg) -> Result<Matrix, Error> {
    if xc.rows() == 0 || xc.cols() == 0 {
        return Err(Error::EmptyInput);
    }
    let cov = xc.product(&xc.transpose(), la)?;
    let eig = la.eigen(&cov)?;
    Ok(eig.vectors.transpose())
}

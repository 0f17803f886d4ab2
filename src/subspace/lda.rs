use std::collections::HashSet;

use crate::db::DatabaseEntry;
use crate::error::Error;
use crate::linalg::LinAlg;
use crate::matrix::Matrix;

/// Contiguous class runs of the entry list: `(start, end)` column ranges,
/// one per class. Entries must arrive grouped by class; a run count other
/// than `c`, or a class label resurfacing in a later run, is a broken
/// caller contract (silently computing scatter over ungrouped columns
/// would produce wrong results with no error).
fn class_runs(c : usize, entries : &[DatabaseEntry]) -> Result<Vec<(usize, usize)>, Error> {
    let mut runs = Vec::with_capacity(c);
    let mut seen = HashSet::new();
    let mut j = 0;
    while j < entries.len() {
        let class = entries[j].class;
        if !seen.insert(class) {
            return Err(Error::PreconditionViolation("entries are not grouped by class"));
        }
        let mut k = j;
        while k < entries.len() && entries[k].class == class {
            k += 1;
        }
        runs.push((j, k));
        j = k;
    }
    if runs.len() != c {
        return Err(Error::PreconditionViolation("entry runs do not match the class count"));
    }
    Ok(runs)
}

/// Between-class and within-class scatter of the sample matrix `x`
/// (columns are samples, grouped into `c` contiguous class blocks matching
/// `entries`). Returns `(S_b, S_w)`, each `x.rows × x.rows`.
///
/// The global mean is the unweighted average of the class means — an
/// approximation of the true sample mean unless classes are equal-sized.
/// That is the documented behavior of this analysis, kept as-is because
/// "fixing" it to a sample-weighted mean changes numeric output.
pub fn scatter(x : &Matrix, c : usize, entries : &[DatabaseEntry], la : &dyn LinAlg) -> Result<(Matrix, Matrix), Error> {
    if entries.len() != x.cols() {
        return Err(Error::PreconditionViolation("entry list does not parallel the sample columns"));
    }
    if x.cols() == 0 {
        return Err(Error::EmptyInput);
    }
    let runs = class_runs(c, entries)?;

    let classes : Vec<Matrix> = runs.iter()
        .map(|&(j, k)| x.copy_columns(j, k) )
        .collect();
    let means : Vec<Matrix> = classes.iter()
        .map(|block| block.mean_rows() )
        .collect();

    // unweighted mean of the class means
    let mut u = Matrix::new(x.rows(), 1);
    for m in &means {
        u.add_assign_matrix(m)?;
    }
    u.divide_by_constant(c as f64);

    let mut s_b = Matrix::new(x.rows(), x.rows());
    let mut s_w = Matrix::new(x.rows(), x.rows());
    for (mut block, mean) in classes.into_iter().zip(means.iter()) {
        // S_b_i = n_i * (u_i - u)(u_i - u)'
        let d = mean.subtract(&u)?;
        let mut s_b_i = d.product(&d.transpose(), la)?;
        s_b_i.scale(block.cols() as f64);
        s_b.add_assign_matrix(&s_b_i)?;

        // S_w_i = Xc_i * Xc_i', the block mean-centered in place
        block.subtract_columns(mean)?;
        let s_w_i = block.product(&block.transpose(), la)?;
        s_w.add_assign_matrix(&s_w_i)?;
    }
    Ok((s_b, s_w))
}

/// Discriminant projection of a PCA-reduced training set: eigendecompose
/// `J = S_w⁻¹ · S_b` and fold the eigenvector basis back through the PCA
/// basis, `W_lda' = eigenvectors(J)ᵀ · W_pca'`.
///
/// All eigen-columns of `J` are retained, as in the reference analysis;
/// dropping the smallest components is a recorded open question (see
/// DESIGN.md), so callers wanting a truncated discriminant basis slice
/// the result themselves.
pub fn lda(w_pca_tr : &Matrix, p_pca : &Matrix, c : usize, entries : &[DatabaseEntry], la : &dyn LinAlg) -> Result<Matrix, Error> {
    let (s_b, s_w) = scatter(p_pca, c, entries, la)?;

    let mut s_w_inv = s_w;
    s_w_inv.invert_in_place(la)?;
    let j = s_w_inv.product(&s_b, la)?;
    let eig = la.eigen(&j)?;

    let w_fld_tr = eig.vectors.transpose();
    w_fld_tr.product(w_pca_tr, la)
}

use serde::{Serialize, Deserialize};

use crate::error::Error;
use crate::linalg::LinAlg;
use crate::matrix::Matrix;
use crate::subspace;

/// Pluggable distance between column `i` of `a` and column `j` of `b`.
/// Smaller is closer; recognition minimizes this over the stored
/// projections.
pub type DistanceFn = fn(&Matrix, usize, &Matrix, usize) -> f64;

/// City-block distance between two columns.
pub fn dist_l1(a : &Matrix, i : usize, b : &Matrix, j : usize) -> f64 {
    let mut sum = 0.0;
    for k in 0..a.rows() {
        sum += (a[(k, i)] - b[(k, j)]).abs();
    }
    sum
}

/// Euclidean distance between two columns.
pub fn dist_l2(a : &Matrix, i : usize, b : &Matrix, j : usize) -> f64 {
    let mut sum = 0.0;
    for k in 0..a.rows() {
        let d = a[(k, i)] - b[(k, j)];
        sum += d * d;
    }
    sum.sqrt()
}

/// Negated cosine similarity, so that identical directions score lowest
/// (-1) and the minimum-distance loop needs no special casing.
pub fn dist_cos(a : &Matrix, i : usize, b : &Matrix, j : usize) -> f64 {
    let mut dot = 0.0;
    let mut na = 0.0;
    let mut nb = 0.0;
    for k in 0..a.rows() {
        dot += a[(k, i)] * b[(k, j)];
        na += a[(k, i)] * a[(k, i)];
        nb += b[(k, j)] * b[(k, j)];
    }
    -dot / (na.sqrt() * nb.sqrt())
}

/// Immutable pairing of a class label and a display name, one per training
/// sample, parallel to the sample-matrix columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub class : i32,
    pub name : String
}

/// A labeled flattened sample supplied by the corpus collaborator.
/// Samples must arrive pre-sorted so that every class forms one
/// contiguous run.
#[derive(Debug, Clone)]
pub struct LabeledSample {
    pub class : i32,
    pub name : String,
    pub data : Vec<f64>
}

/// Which stored projection basis recognition runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Pca,
    Lda,
    Ica
}

#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    /// Refine the PCA basis with the LDA discriminant projection.
    pub lda : bool
}

impl Default for TrainOptions {

    fn default() -> Self {
        Self { lda : false }
    }

}

/// A trained recognition database: the mean sample, the projection bases,
/// and the labeled projections of every training sample. ICA fields are
/// carried for persistence compatibility and populated by `load`, never
/// by `train`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub num_classes : usize,
    pub num_images : usize,
    /// Subspace dimension: the row count of the stored projections.
    pub num_dimensions : usize,
    pub entries : Vec<DatabaseEntry>,
    pub mean : Matrix,
    pub w_pca_tr : Matrix,
    pub p_pca : Matrix,
    pub w_lda_tr : Option<Matrix>,
    pub p_lda : Option<Matrix>,
    pub w_ica_tr : Option<Matrix>,
    pub p_ica : Option<Matrix>
}

impl Database {

    /// Train a database from a labeled corpus: build the sample matrix,
    /// mean-center it, extract the PCA basis, project the training set,
    /// and optionally refine with LDA.
    ///
    /// Fails with `EmptyInput` for an empty corpus, `ShapeMismatch` when
    /// sample dimensions disagree, and `PreconditionViolation` when the
    /// corpus is not grouped contiguously by class.
    pub fn train(samples : &[LabeledSample], opts : TrainOptions, la : &dyn LinAlg) -> Result<Database, Error> {
        let dim = match samples.first() {
            Some(s) if !s.data.is_empty() => s.data.len(),
            _ => return Err(Error::EmptyInput)
        };
        let columns : Vec<&[f64]> = samples.iter().map(|s| &s.data[..] ).collect();
        let x = Matrix::from_columns(dim, &columns)?;

        let entries : Vec<DatabaseEntry> = samples.iter()
            .map(|s| DatabaseEntry { class : s.class, name : s.name.clone() } )
            .collect();
        let num_classes = count_classes(&entries)?;

        let mean = x.mean_rows();
        let mut xc = x;
        xc.subtract_columns(&mean)?;

        let w_pca_tr = subspace::pca(&xc, la)?;
        let p_pca = w_pca_tr.product(&xc, la)?;

        let (w_lda_tr, p_lda) = if opts.lda {
            let w = subspace::lda(&w_pca_tr, &p_pca, num_classes, &entries, la)?;
            let p = w.product(&xc, la)?;
            (Some(w), Some(p))
        } else {
            (None, None)
        };

        Ok(Database {
            num_classes,
            num_images : entries.len(),
            num_dimensions : p_pca.rows(),
            entries,
            mean,
            w_pca_tr,
            p_pca,
            w_lda_tr,
            p_lda,
            w_ica_tr : None,
            p_ica : None
        })
    }

    /// Classify a flattened query sample: mean-center it, project it
    /// through the selected basis, and return the stored entry at minimum
    /// distance together with that distance. Ties keep the first entry
    /// encountered in stored order.
    pub fn recognize(&self, query : &[f64], space : Space, dist : DistanceFn, la : &dyn LinAlg) -> Result<(&DatabaseEntry, f64), Error> {
        let (w_tr, p) = match space {
            Space::Pca => (&self.w_pca_tr, &self.p_pca),
            Space::Lda => match (&self.w_lda_tr, &self.p_lda) {
                (Some(w), Some(p)) => (w, p),
                _ => return Err(Error::PreconditionViolation("no LDA basis in this database"))
            },
            Space::Ica => match (&self.w_ica_tr, &self.p_ica) {
                (Some(w), Some(p)) => (w, p),
                _ => return Err(Error::PreconditionViolation("no ICA basis in this database"))
            }
        };
        if p.cols() == 0 || self.entries.is_empty() {
            return Err(Error::EmptyInput);
        }
        if query.len() != self.mean.rows() {
            return Err(Error::ShapeMismatch(self.mean.rows(), 1, query.len(), 1));
        }

        let mut q = Matrix::from_vec(query.len(), 1, query.to_vec());
        q.subtract_columns(&self.mean)?;
        let p_q = w_tr.product(&q, la)?;

        let mut best = 0;
        let mut best_dist = dist(&p_q, 0, p, 0);
        for j in 1..p.cols() {
            let d = dist(&p_q, 0, p, j);
            if d < best_dist {
                best = j;
                best_dist = d;
            }
        }
        Ok((&self.entries[best], best_dist))
    }

}

/// Number of contiguous class runs; errors when a class label resurfaces
/// after its run ended (the corpus was not pre-sorted by class).
fn count_classes(entries : &[DatabaseEntry]) -> Result<usize, Error> {
    let mut seen = std::collections::HashSet::new();
    let mut count = 0;
    let mut prev : Option<i32> = None;
    for e in entries {
        if prev != Some(e.class) {
            if !seen.insert(e.class) {
                return Err(Error::PreconditionViolation("entries are not grouped by class"));
            }
            count += 1;
            prev = Some(e.class);
        }
    }
    Ok(count)
}

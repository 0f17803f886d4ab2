/// Dense column-major matrix container: construction, element-wise and
/// algebraic operators, reductions, and the recursive determinant/cofactor
/// engine.
pub mod matrix;

/// Injectable linear-algebra capability (product, LU inversion,
/// eigendecomposition) and the bundled nalgebra-backed `Dense` provider.
pub mod linalg;

/// Subspace training: PCA basis extraction and LDA class-scatter analysis.
pub mod subspace;

/// Trained database of labeled projections, distance functions, and
/// nearest-neighbor recognition.
pub mod db;

/// Matrix stream formats and database persistence.
pub mod io;

mod error;

pub use error::Error;

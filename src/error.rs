use thiserror::Error;

/// Failure conditions across the dense engine and the training/recognition
/// pipeline. Shape and squareness violations are rejected synchronously,
/// before any computation begins; `SingularMatrix` can only be known after
/// the linear algebra provider has run, and any in-place target of a failed
/// inversion is left in an undefined state (invert a copy if that matters).
#[derive(Debug, Error)]
pub enum Error {

    /// Binary operation on incompatible dimensions, a product with
    /// inner-dimension disagreement, or a reshape that changes the
    /// element count. Fields are the two offending shapes.
    #[error("operand shapes do not agree: {0}x{1} vs. {2}x{3}")]
    ShapeMismatch(usize, usize, usize, usize),

    #[error("operation requires a square matrix, got {0}x{1}")]
    NotSquare(usize, usize),

    /// The provider reported a failed factorization or eigensolve
    /// (singular or near-singular input).
    #[error("matrix is singular or near-singular")]
    SingularMatrix,

    /// Training on an empty corpus, or recognition against a database
    /// with no stored projections.
    #[error("empty corpus or training set")]
    EmptyInput,

    /// A caller-side contract was broken (entries not grouped by class,
    /// recognition against a basis that was never trained, ...).
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

}

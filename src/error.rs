use core::fmt;

/// Result alias for `hcluster`.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error taxonomy.
///
/// Every [`Error`] maps onto exactly one kind via [`Error::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong element type or array rank.
    TypeMismatch,
    /// Wrong dimensions: non-square, too few rows, non-binomial length.
    ShapeMismatch,
    /// Unknown name, incompatible method/metric, or a violated numeric precondition.
    DomainViolation,
    /// A linkage matrix fails a structural invariant.
    CorruptStructure,
    /// A companion vector does not match the size implied by a linkage matrix.
    SizeMismatch,
}

/// Structural defect found in a linkage matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum Corruption {
    /// Distance column holds a negative or NaN value.
    NegativeDistance {
        /// Offending value.
        value: f64,
    },
    /// Count column holds a negative or NaN value.
    NegativeCount {
        /// Offending value.
        value: f64,
    },
    /// A cluster id is not an integer in `[0, 2n - 2)`.
    IdOutOfRange {
        /// Offending value.
        value: f64,
    },
    /// A cluster id is consumed by more than one merge.
    IdReused {
        /// The reused id.
        id: usize,
    },
    /// A row references a cluster that is formed by a later row.
    ForwardReference {
        /// The referenced id.
        id: usize,
    },
    /// The count column disagrees with the sizes of the merged children.
    CountMismatch {
        /// Size implied by the children.
        expected: usize,
        /// Value stored in the matrix.
        found: f64,
    },
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corruption::NegativeDistance { value } => {
                write!(f, "distance {value} is negative")
            }
            Corruption::NegativeCount { value } => write!(f, "count {value} is negative"),
            Corruption::IdOutOfRange { value } => {
                write!(f, "cluster index {value} is out of bounds")
            }
            Corruption::IdReused { id } => {
                write!(f, "cluster {id} is merged more than once")
            }
            Corruption::ForwardReference { id } => {
                write!(f, "cluster {id} is used before it is formed")
            }
            Corruption::CountMismatch { expected, found } => {
                write!(f, "count is {found}, children hold {expected}")
            }
        }
    }
}

/// Errors returned by distance, linkage and tree primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input rank or element type is not accepted by the operation.
    TypeMismatch {
        /// Expected kind of input.
        expected: &'static str,
        /// What was found.
        found: String,
    },

    /// Shape mismatch (string description).
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// A condensed vector length is not `d * (d - 1) / 2` for any `d >= 2`.
    InvalidCondensedLength {
        /// Offending length.
        len: usize,
    },

    /// Fewer observations than the operation needs.
    TooFewObservations {
        /// Minimum required.
        required: usize,
        /// Number supplied.
        found: usize,
    },

    /// Metric name not recognised.
    UnknownMetric(String),

    /// Linkage method name not recognised.
    UnknownMethod(String),

    /// Linkage method cannot run on the supplied input.
    IncompatibleMethod {
        /// Method name.
        method: &'static str,
        /// Why it cannot run.
        reason: &'static str,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A column has zero variance where the metric divides by it.
    ZeroVariance {
        /// Column index.
        dimension: usize,
    },

    /// A row has zero norm where the metric divides by it.
    ZeroNorm {
        /// Row index.
        row: usize,
    },

    /// The covariance matrix of the observations cannot be inverted.
    SingularCovariance,

    /// A distance table entry is NaN or infinite.
    NonFiniteDistance {
        /// Condensed index of the entry.
        index: usize,
    },

    /// Linkage matrix fails a structural invariant.
    CorruptLinkage {
        /// Row where the defect was found.
        row: usize,
        /// What is wrong.
        corruption: Corruption,
    },

    /// Companion vector length does not match the linkage.
    SizeMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// Correlation is undefined because one side has zero variance.
    DegenerateCorrelation,
}

impl Error {
    /// Map this error onto the coarse taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::ShapeMismatch { .. }
            | Error::InvalidCondensedLength { .. }
            | Error::TooFewObservations { .. } => ErrorKind::ShapeMismatch,
            Error::UnknownMetric(_)
            | Error::UnknownMethod(_)
            | Error::IncompatibleMethod { .. }
            | Error::InvalidParameter { .. }
            | Error::ZeroVariance { .. }
            | Error::ZeroNorm { .. }
            | Error::SingularCovariance
            | Error::NonFiniteDistance { .. }
            | Error::DegenerateCorrelation => ErrorKind::DomainViolation,
            Error::CorruptLinkage { .. } => ErrorKind::CorruptStructure,
            Error::SizeMismatch { .. } => ErrorKind::SizeMismatch,
        }
    }

    pub(crate) fn corrupt(row: usize, corruption: Corruption) -> Self {
        Error::CorruptLinkage { row, corruption }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {expected}, found {found}")
            }
            Error::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, actual {actual}")
            }
            Error::InvalidCondensedLength { len } => write!(
                f,
                "condensed vector length {len} is not a binomial coefficient n choose 2 for n >= 2"
            ),
            Error::TooFewObservations { required, found } => {
                write!(f, "need at least {required} observations, found {found}")
            }
            Error::UnknownMetric(name) => write!(f, "unknown distance metric '{name}'"),
            Error::UnknownMethod(name) => write!(f, "unknown linkage method '{name}'"),
            Error::IncompatibleMethod { method, reason } => {
                write!(f, "method '{method}' {reason}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::ZeroVariance { dimension } => {
                write!(f, "dimension {dimension} has zero variance")
            }
            Error::ZeroNorm { row } => write!(f, "observation {row} has zero norm"),
            Error::SingularCovariance => write!(f, "covariance matrix is singular"),
            Error::NonFiniteDistance { index } => {
                write!(f, "distance at condensed index {index} is not finite")
            }
            Error::CorruptLinkage { row, corruption } => {
                write!(f, "corrupt linkage matrix at row {row}: {corruption}")
            }
            Error::SizeMismatch { expected, found } => {
                write!(f, "size mismatch: expected {expected} entries, found {found}")
            }
            Error::DegenerateCorrelation => {
                write!(f, "correlation undefined: an input has zero variance")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

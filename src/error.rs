use thiserror::Error;

/// Top-level error type for the brepval validator.
///
/// Errors are fatal conditions: a file that cannot be parsed or geometry the
/// engine cannot even represent. Geometric *defects* are not errors; they
/// are reported as codes in a [`ValidationReport`](crate::validate::ValidationReport).
#[derive(Debug, Error)]
pub enum BrepvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors raised while reading input geometry.
///
/// A parse failure never produces defect codes; the object is rejected
/// outright rather than coerced into "valid".
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Syntax {
        path: String,
        line: usize,
        message: String,
    },

    #[error("unknown file type for {0} (POLY and OFF accepted)")]
    UnknownFormat(String),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("entity not found: {0}")]
    EntityNotFound(String),
}

/// Convenience type alias for results using [`BrepvalError`].
pub type Result<T> = std::result::Result<T, BrepvalError>;

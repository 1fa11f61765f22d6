use thiserror::Error;

/// Errors raised by the normalization engine.
///
/// Absent or malformed *values* never error — they flow through as empty
/// strings or NULLs. Only shape-level violations are fatal: a record that is
/// not an object with a usable id, or a required column missing from an
/// entire batch (the upstream contract changed).
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("content record is not a JSON object")]
    NotAnObject,

    #[error("content record has no usable \"id\" field")]
    MissingId,

    #[error("required column \"{column}\" is absent from every record in the batch")]
    MissingColumn { column: String },
}

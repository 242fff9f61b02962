/// Result alias used throughout the crate.
pub type PsfResult<T> = Result<T, PsfError>;

/// Errors reported by tensor construction and rendering.
///
/// Every error is raised synchronously by the call that detected it. Render calls validate all of
/// their arguments before producing output, so an error never comes with partial results.
#[derive(thiserror::Error, Debug)]
pub enum PsfError {
    /// Malformed coefficient tensor or model shape.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Mismatched column lengths, non-square ROI, out-of-range frame index and similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Cell lookup outside the tensor.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// Any other failure, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PsfError {
    /// Build a [`PsfError::InvalidDimension`].
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`PsfError::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`PsfError::OutOfRange`].
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRange(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

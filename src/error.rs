use thiserror::Error;

/// Result type for grid construction and export.
pub type GridResult<T> = Result<T, GridError>;

#[derive(Error, Debug)]
pub enum GridError {
    /// A per-streak or per-fault-plane list does not match the expected
    /// cardinality. `context` names the axis and keyword involved.
    #[error("list length mismatch for {context}: expected {expected}, got {actual}")]
    ListLengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid streak {index}: {message}")]
    InvalidStreak { index: usize, message: String },

    #[error("invalid throw box [{i1}..{i2}, {j1}..{j2}] for {nx} x {ny} grid")]
    InvalidThrow {
        i1: usize,
        i2: usize,
        j1: usize,
        j2: usize,
        nx: usize,
        ny: usize,
    },

    #[error("property {keyword} has no {scope} value set")]
    MissingProperty {
        keyword: &'static str,
        scope: &'static str,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GridError {
    pub fn list_length_mismatch(
        context: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::ListLengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    pub fn invalid_streak(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidStreak {
            index,
            message: message.into(),
        }
    }
}

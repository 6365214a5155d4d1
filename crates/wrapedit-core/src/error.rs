//! Error types for edit session operations.

use thiserror::Error;

/// Errors that can occur while driving an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A structurally invalid argument was supplied.
    #[error("Bad parameters: {0}")]
    BadParams(String),
    /// A property name is not handled by the edit session.
    #[error("Property not found: {0}")]
    NotFound(String),
    /// The buffer refused an insert or remove.
    #[error("Buffer rejected {operation} of {count} units at offset {offset}")]
    MutationRejected {
        operation: BufferOp,
        offset: usize,
        count: usize,
    },
}

/// The kind of buffer mutation that was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferOp {
    Insert,
    Remove,
}

impl std::fmt::Display for BufferOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferOp::Insert => write!(f, "insert"),
            BufferOp::Remove => write!(f, "remove"),
        }
    }
}

impl EditError {
    /// Create a bad parameters error.
    pub fn bad_params(reason: &str) -> Self {
        EditError::BadParams(reason.to_string())
    }

    /// Create a not found error for a property name.
    pub fn not_found(name: &str) -> Self {
        EditError::NotFound(name.to_string())
    }

    /// Create a rejected insert error.
    pub fn insert_rejected(offset: usize, count: usize) -> Self {
        EditError::MutationRejected {
            operation: BufferOp::Insert,
            offset,
            count,
        }
    }

    /// Create a rejected remove error.
    pub fn remove_rejected(offset: usize, count: usize) -> Self {
        EditError::MutationRejected {
            operation: BufferOp::Remove,
            offset,
            count,
        }
    }

    /// Whether the caller may try another handler for the same request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditError::NotFound(_))
    }
}

/// Result type for edit session operations.
pub type EditResult<T> = Result<T, EditError>;

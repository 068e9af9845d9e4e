//! Error handling for the arbora library
//!
//! This module provides the error type shared by every fallible container
//! operation, along with a crate-wide `Result` alias.

use thiserror::Error;

/// Main error type for the arbora library
#[derive(Error, Debug)]
pub enum ArboraError {
    /// The requested size would exceed the maximum addressable element count
    #[error("capacity exceeded: requested {requested} elements, limit {limit}")]
    CapacityExceeded {
        /// Number of elements the operation would have required
        requested: usize,
        /// Maximum element count supported by the container
        limit: usize,
    },

    /// Memory allocation failures
    #[error("memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// A structural invariant no longer holds
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the violated invariant
        message: String,
    },
}

impl ArboraError {
    /// Create a capacity exceeded error
    pub fn capacity_exceeded(requested: usize, limit: usize) -> Self {
        Self::CapacityExceeded { requested, limit }
    }

    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Allocation failures leave the container in its prior state and a
    /// retry may succeed once memory is available; the other variants do not
    /// become valid by retrying.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::OutOfMemory { .. } => true,
            Self::CapacityExceeded { .. } => false,
            Self::InvalidState { .. } => false,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "capacity",
            Self::OutOfMemory { .. } => "memory",
            Self::InvalidState { .. } => "state",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ArboraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArboraError::capacity_exceeded(10, 5);
        assert_eq!(
            err.to_string(),
            "capacity exceeded: requested 10 elements, limit 5"
        );

        let err = ArboraError::out_of_memory(1024);
        assert_eq!(err.to_string(), "memory allocation failed: requested 1024 bytes");

        let err = ArboraError::invalid_state("root is red");
        assert_eq!(err.to_string(), "invalid state: root is red");
    }

    #[test]
    fn test_error_category() {
        assert_eq!(ArboraError::capacity_exceeded(2, 1).category(), "capacity");
        assert_eq!(ArboraError::out_of_memory(64).category(), "memory");
        assert_eq!(ArboraError::invalid_state("x").category(), "state");
    }

    #[test]
    fn test_recoverable() {
        assert!(ArboraError::out_of_memory(64).is_recoverable());
        assert!(!ArboraError::capacity_exceeded(2, 1).is_recoverable());
        assert!(!ArboraError::invalid_state("x").is_recoverable());
    }
}

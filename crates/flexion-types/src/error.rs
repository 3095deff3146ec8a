//! Error types for the Flexion engine.
//!
//! All crates return `FlexionResult<T>` from fallible operations.
//! Configuration problems found during `init` are logged instead and
//! leave the component inert; only precondition violations surface here.

use thiserror::Error;

/// Unified error type for the Flexion engine.
#[derive(Debug, Error)]
pub enum FlexionError {
    /// No compatible motion state could be bound.
    #[error("No motion state bound to `{0}`")]
    MissingState(String),

    /// The free-motion position buffer was queried before being populated.
    #[error("No free position buffer has been set for this state")]
    NoFreePosition,

    /// An element index was outside the bound state.
    #[error("Index {index} out of bounds for {size} elements")]
    IndexOutOfBounds { index: usize, size: usize },

    /// The block-sparse build protocol was misused.
    #[error("Invalid operator construction: {0}")]
    InvalidOperator(String),

    /// Material parameter is out of valid range.
    #[error("Invalid material parameter: {0}")]
    InvalidMaterial(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Linear solver rejected the assembled operator.
    #[error("Solver error: {0}")]
    Solver(String),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FlexionError {
    /// Shorthand for an out-of-bounds element access.
    pub fn out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Shorthand for a block-sparse protocol violation.
    pub fn invalid_operator(msg: impl Into<String>) -> Self {
        Self::InvalidOperator(msg.into())
    }
}

/// Convenience alias for `Result<T, FlexionError>`.
pub type FlexionResult<T> = Result<T, FlexionError>;

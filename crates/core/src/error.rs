//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable: callers get a distinguishable failure and the
/// state they operated on is untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A basket count was zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// A price was non-positive (or would produce a non-positive sale price).
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A sale asked for more baskets than the stock holds.
    #[error("insufficient stock (requested: {requested}, available: {available})")]
    InsufficientStock { requested: u32, available: usize },

    /// Division, multiplication or rounding could not be performed.
    #[error("arithmetic failure: {0}")]
    ArithmeticFailure(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Shared state could not be accessed (e.g. a poisoned lock).
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn invalid_price(msg: impl Into<String>) -> Self {
        Self::InvalidPrice(msg.into())
    }

    pub fn insufficient_stock(requested: u32, available: usize) -> Self {
        Self::InsufficientStock {
            requested,
            available,
        }
    }

    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::ArithmeticFailure(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure the purchase flow can surface to a caller is one of these
/// variants; web layers map them onto status codes (validation → 400,
/// not-found → 404, out-of-stock → 409, payment/storage → 5xx-class) without
/// needing to parse messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty basket, builder misuse).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced book or its inventory record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested quantity exceeds the locked available quantity.
    /// Carries the title of the offending book.
    #[error("out of stock: '{0}'")]
    OutOfStock(String),

    /// The payment gateway rejected the charge.
    #[error("payment gateway error: {0}")]
    Payment(String),

    /// Storage-layer fault. Anything here aborted the unit of work, so no
    /// partial state was committed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn out_of_stock(title: impl Into<String>) -> Self {
        Self::OutOfStock(title.into())
    }

    pub fn payment(msg: impl Into<String>) -> Self {
        Self::Payment(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

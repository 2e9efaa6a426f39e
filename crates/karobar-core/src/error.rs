//! # Error Types
//!
//! Domain-specific error types for karobar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  karobar-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller re-prompts the user        │
//! │                                                                         │
//! │  Every CoreError is local and recoverable: validation runs strictly    │
//! │  before mutation, so a failed operation leaves the entity store        │
//! │  untouched. Duplicate transactions are NOT an error: they are a        │
//! │  silent no-op, so a retried action is harmless.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, counts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::{ProductId, SaleId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They should be caught
/// and translated to user-facing messages by the dashboard collaborator.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Quantity is zero or negative.
    #[error("Quantity must be a positive whole number")]
    InvalidQuantity,

    /// Selling price is zero or negative.
    #[error("Selling price must be positive")]
    InvalidPrice,

    /// A direct sale needs a client name. Estimate-driven sales carry the
    /// estimate's client instead and skip this check.
    #[error("Client name is required")]
    ClientRequired,

    /// Insufficient stock to record the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Record Sale (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 units in stock"
    /// ```
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// An estimate line item resolved to no product, by id or by name.
    #[error("Estimate item '{0}' could not be matched to a product")]
    ProductNotMatched(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(SaleId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when a field doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a units field that isn't a whole number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

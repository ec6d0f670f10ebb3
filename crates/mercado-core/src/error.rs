//! # Error Types
//!
//! Domain-specific error types for mercado-core.
//!
//! ## Error Layering
//! ```text
//! ValidationError → DbError (mercado-db) → ApiError (apps/api)
//! ```
//!
//! Validation failures are raised at the API boundary before anything
//! touches storage; storage failures (not found, duplicates) carry
//! their own taxonomy in mercado-db's `DbError`.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, limit, etc.)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for
/// early validation before anything touches storage.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., disallowed characters in a product code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

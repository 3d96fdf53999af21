//! Error handling for the Ripple IR layer
//!
//! Every failing operation in the IR returns an [`IrError`]. All variants are
//! recoverable: a failed lookup or out-of-range access leaves the pool,
//! catalog or builder it was issued against untouched.

use thiserror::Error;

/// Result alias used throughout the IR crates
pub type IrResult<T> = Result<T, IrError>;

/// Main IR error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// Index outside `[0, bound)` for a pool, catalog or array
    #[error("{what} index {index} out of bounds (len {bound})")]
    OutOfBounds {
        what: &'static str,
        index: usize,
        bound: usize,
    },

    /// Lookup by name found nothing
    #[error("{what} '{key}' not found")]
    NotFound {
        what: &'static str,
        key: String,
    },

    /// Operation not valid in the container's current state
    #[error("invalid state: {message}")]
    InvalidState { message: String },

    /// Alignment exponent whose boundary does not fit in 64 bits
    #[error("alignment exponent {exponent} is too large")]
    InvalidAlignment { exponent: u32 },

    /// Composite size or an offset does not fit in 64 bits
    #[error("layout of '{name}' overflows 64-bit offsets")]
    LayoutOverflow { name: String },

    #[error("formatting error while rendering IR")]
    Format(#[from] std::fmt::Error),
}

impl IrError {
    /// Create an out-of-bounds error
    pub fn out_of_bounds(what: &'static str, index: usize, bound: usize) -> Self {
        IrError::OutOfBounds { what, index, bound }
    }

    /// Create a not-found error
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        IrError::NotFound { what, key: key.into() }
    }

    /// Create an invalid-state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        IrError::InvalidState { message: message.into() }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, IrError::OutOfBounds { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IrError::NotFound { .. })
    }
}

/// Bounds-checked slice access shared by every pool and container
pub fn checked_get<'a, T>(items: &'a [T], index: usize, what: &'static str) -> IrResult<&'a T> {
    items
        .get(index)
        .ok_or_else(|| IrError::out_of_bounds(what, index, items.len()))
}

/// Mutable counterpart of [`checked_get`]
pub fn checked_get_mut<'a, T>(items: &'a mut [T], index: usize, what: &'static str) -> IrResult<&'a mut T> {
    let bound = items.len();
    items
        .get_mut(index)
        .ok_or_else(|| IrError::out_of_bounds(what, index, bound))
}

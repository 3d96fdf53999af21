//! Ripple IR - Common Handles and Errors
//! 
//! This crate contains the handle types and the error type shared by
//! every component of the Ripple IR layer.

pub mod error;
pub mod types;

pub use error::{IrError, IrResult};
pub use types::*;

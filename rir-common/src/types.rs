//! Handle types used throughout the IR
//!
//! Pools and catalogs hand out these plain indices instead of references.
//! A handle stays valid for as long as the pool that issued it is alive;
//! there is no generation counter, so a handle must not be used against a
//! different pool.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position in the owning pool
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_handle!(
    /// Handle into an `OperandPool`
    OperandId, "op"
);

define_handle!(
    /// Handle into an `ArgOpPool`
    ArgListId, "args"
);

define_handle!(
    /// Handle into a `TypeManager`
    TypeId, "ty"
);

/// Calling convention identifier
///
/// The IR only carries the slot; interpreting it is up to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConventionId(pub u32);

impl fmt::Display for ConventionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cc{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_index() {
        let id = OperandId::new(4);
        assert_eq!(id.index(), 4);
        assert_eq!(OperandId::from(4), id);
        assert!(OperandId::new(1) < OperandId::new(2));
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(OperandId::new(3).to_string(), "op3");
        assert_eq!(ArgListId::new(0).to_string(), "args0");
        assert_eq!(TypeId::new(12).to_string(), "ty12");
        assert_eq!(ConventionId::default().to_string(), "cc0");
    }
}

//! IR Type System
//!
//! Defines the fourteen primitive kinds, the catalog entry [`Type`], and
//! composite types whose member offsets are computed by the layout
//! algorithm in [`layout`].
//!
//! The primitive kinds double as the width tags of immediate operands.

use rir_common::TypeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use self::layout::{align_up, ComplexType, ComplexTypeBuilder};
pub use self::manager::TypeManager;

mod layout;
mod manager;

/// Fixed-width scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimKind {
    I8, I16, I32, I64,
    UI8, UI16, UI32, UI64,
    P16, P32, P64,
    Float, Double,
    Bool,
}

impl PrimKind {
    /// Every kind, in catalog registration order
    pub const ALL: [PrimKind; 14] = [
        PrimKind::I8, PrimKind::I16, PrimKind::I32, PrimKind::I64,
        PrimKind::UI8, PrimKind::UI16, PrimKind::UI32, PrimKind::UI64,
        PrimKind::P16, PrimKind::P32, PrimKind::P64,
        PrimKind::Float, PrimKind::Double,
        PrimKind::Bool,
    ];

    /// Size in bytes
    pub fn size(self) -> u64 {
        match self {
            PrimKind::I8 | PrimKind::UI8 | PrimKind::Bool => 1,
            PrimKind::I16 | PrimKind::UI16 | PrimKind::P16 => 2,
            PrimKind::I32 | PrimKind::UI32 | PrimKind::P32 | PrimKind::Float => 4,
            PrimKind::I64 | PrimKind::UI64 | PrimKind::P64 | PrimKind::Double => 8,
        }
    }

    pub fn bits(self) -> u32 {
        (self.size() * 8) as u32
    }

    /// Mask selecting the low `bits()` bits of a raw 64-bit value
    pub fn mask(self) -> u64 {
        match self.bits() {
            64 => u64::MAX,
            bits => (1u64 << bits) - 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimKind::I8 => "i8",
            PrimKind::I16 => "i16",
            PrimKind::I32 => "i32",
            PrimKind::I64 => "i64",
            PrimKind::UI8 => "ui8",
            PrimKind::UI16 => "ui16",
            PrimKind::UI32 => "ui32",
            PrimKind::UI64 => "ui64",
            PrimKind::P16 => "p16",
            PrimKind::P32 => "p32",
            PrimKind::P64 => "p64",
            PrimKind::Float => "float",
            PrimKind::Double => "double",
            PrimKind::Bool => "bool",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, PrimKind::I8 | PrimKind::I16 | PrimKind::I32 | PrimKind::I64)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, PrimKind::UI8 | PrimKind::UI16 | PrimKind::UI32 | PrimKind::UI64)
    }

    pub fn is_pointer(self) -> bool {
        matches!(self, PrimKind::P16 | PrimKind::P32 | PrimKind::P64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimKind::Float | PrimKind::Double)
    }

    /// Position in [`PrimKind::ALL`]
    pub(crate) fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PrimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PrimKind {
    type Err = rir_common::IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| rir_common::IrError::not_found("primitive type", s))
    }
}

/// Shape of a catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    Primitive(PrimKind),
    Complex(ComplexType),
}

impl From<PrimKind> for TypeKind {
    fn from(kind: PrimKind) -> Self {
        TypeKind::Primitive(kind)
    }
}

impl From<ComplexType> for TypeKind {
    fn from(complex: ComplexType) -> Self {
        TypeKind::Complex(complex)
    }
}

/// A type registered in a [`TypeManager`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    id: TypeId,
    kind: TypeKind,
}

impl Type {
    pub(crate) fn new(id: TypeId, kind: TypeKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        match &self.kind {
            TypeKind::Primitive(kind) => kind.size(),
            TypeKind::Complex(complex) => complex.size(),
        }
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            TypeKind::Primitive(kind) => kind.name(),
            TypeKind::Complex(complex) => complex.name(),
        }
    }

    pub fn as_primitive(&self) -> Option<PrimKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            TypeKind::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexType> {
        match &self.kind {
            TypeKind::Complex(complex) => Some(complex),
            TypeKind::Primitive(_) => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prim_sizes() {
        assert_eq!(PrimKind::I8.size(), 1);
        assert_eq!(PrimKind::Bool.size(), 1);
        assert_eq!(PrimKind::P16.size(), 2);
        assert_eq!(PrimKind::Float.size(), 4);
        assert_eq!(PrimKind::P32.size(), 4);
        assert_eq!(PrimKind::Double.size(), 8);
        assert_eq!(PrimKind::UI64.size(), 8);
    }

    #[test]
    fn test_prim_masks() {
        assert_eq!(PrimKind::UI8.mask(), 0xff);
        assert_eq!(PrimKind::P16.mask(), 0xffff);
        assert_eq!(PrimKind::UI32.mask(), 0xffff_ffff);
        assert_eq!(PrimKind::UI64.mask(), u64::MAX);
    }

    #[test]
    fn test_prim_classification() {
        assert!(PrimKind::I16.is_signed());
        assert!(PrimKind::UI16.is_unsigned());
        assert!(!PrimKind::P64.is_unsigned());
        assert!(PrimKind::P64.is_pointer());
        assert!(PrimKind::Double.is_float());
        assert!(!PrimKind::Bool.is_signed());
    }

    #[test]
    fn test_prim_from_str() {
        assert_eq!("ui32".parse::<PrimKind>(), Ok(PrimKind::UI32));
        assert_eq!("double".parse::<PrimKind>(), Ok(PrimKind::Double));
        assert!("u32".parse::<PrimKind>().unwrap_err().is_not_found());
    }

    #[test]
    fn test_ordinal_matches_all() {
        for (index, kind) in PrimKind::ALL.iter().enumerate() {
            assert_eq!(kind.ordinal(), index);
        }
    }
}

//! Type catalog
//!
//! Owns every [`Type`] and hands out [`TypeId`]s in append order. The
//! primitive kinds are registered once at construction.

use log::trace;
use rir_common::{error::checked_get, IrError, IrResult, TypeId};
use serde::{Deserialize, Serialize};
use crate::types::{PrimKind, Type, TypeKind};

/// Append-only registry of types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeManager {
    types: Vec<Type>,
    prim_ids: [TypeId; 14],
}

impl TypeManager {
    /// Create a catalog with the primitive kinds pre-registered as ids 0..=13
    pub fn new() -> Self {
        let mut manager = Self {
            types: Vec::with_capacity(PrimKind::ALL.len()),
            prim_ids: [TypeId::new(0); 14],
        };
        for kind in PrimKind::ALL {
            let id = manager.append(kind);
            manager.prim_ids[kind.ordinal()] = id;
        }
        manager
    }

    /// Register a type and return its id
    pub fn append(&mut self, kind: impl Into<TypeKind>) -> TypeId {
        let id = TypeId::new(self.types.len());
        let ty = Type::new(id, kind.into());
        trace!("type {} registered as {}", ty.name(), id);
        self.types.push(ty);
        id
    }

    pub fn get(&self, id: TypeId) -> IrResult<&Type> {
        checked_get(&self.types, id.index(), "type")
    }

    /// Size in bytes of a registered type
    pub fn size_of(&self, id: TypeId) -> IrResult<u64> {
        self.get(id).map(Type::size)
    }

    /// Linear scan by display name
    pub fn get_id(&self, name: &str) -> Option<TypeId> {
        self.types.iter().find(|ty| ty.name() == name).map(Type::id)
    }

    pub fn get_by_name(&self, name: &str) -> IrResult<&Type> {
        self.types
            .iter()
            .find(|ty| ty.name() == name)
            .ok_or_else(|| IrError::not_found("type", name))
    }

    /// Cached id of a primitive kind
    pub fn primitive_id(&self, kind: PrimKind) -> TypeId {
        self.prim_ids[kind.ordinal()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.types.iter()
    }
}

impl Default for TypeManager {
    fn default() -> Self {
        Self::new()
    }
}

//! Composite type layout
//!
//! Computes member offsets and total size for composite types. Each member
//! is aligned to `min(member_size, 2^align_exp)` and the total size is padded
//! to `min(max_member_size, 2^align_exp)`. This matches the C layout of a
//! struct whose maximum alignment is capped at `2^align_exp` (GCC's
//! `aligned`/`pack` attributes).
//!
//! Member sizes come from the [`TypeManager`] passed in by the caller, so
//! nested composites are laid out with the same rule applied to their
//! already-computed size.

use log::{debug, trace};
use rir_common::{
    error::{checked_get, checked_get_mut},
    IrError, IrResult, TypeId,
};
use serde::{Deserialize, Serialize};
use crate::types::TypeManager;

/// Round `offset` up to the next multiple of `align`
///
/// A zero alignment leaves the offset unchanged. `None` if the result does
/// not fit in a `u64`.
pub fn align_up(offset: u64, align: u64) -> Option<u64> {
    if align == 0 {
        return Some(offset);
    }
    offset.checked_next_multiple_of(align)
}

fn overflow(name: &str) -> IrError {
    IrError::LayoutOverflow { name: name.to_string() }
}

/// Composite type with computed member offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexType {
    name: String,
    size: u64,
    align_exp: u32,
    members: Vec<TypeId>,
    offsets: Vec<u64>,
}

impl ComplexType {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total size in bytes, including trailing padding
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn align_exp(&self) -> u32 {
        self.align_exp
    }

    /// Maximum alignment boundary in bytes (`2^align_exp`)
    pub fn align(&self) -> u64 {
        1u64 << self.align_exp
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member_type_id(&self, index: usize) -> IrResult<TypeId> {
        checked_get(&self.members, index, "member").copied()
    }

    pub fn member_offset(&self, index: usize) -> IrResult<u64> {
        checked_get(&self.offsets, index, "member").copied()
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Members paired with their offsets, in declaration order
    pub fn members(&self) -> impl Iterator<Item = (TypeId, u64)> + '_ {
        self.members.iter().copied().zip(self.offsets.iter().copied())
    }
}

/// Staging area for a composite type's member list
#[derive(Debug, Clone, Default)]
pub struct ComplexTypeBuilder {
    members: Vec<TypeId>,
}

impl ComplexTypeBuilder {
    pub fn new() -> Self {
        Self { members: Vec::new() }
    }

    pub fn append(&mut self, type_id: TypeId) -> &mut Self {
        self.members.push(type_id);
        self
    }

    pub fn get(&mut self, index: usize) -> IrResult<&mut TypeId> {
        checked_get_mut(&mut self.members, index, "member")
    }

    pub fn replace(&mut self, index: usize, type_id: TypeId) -> IrResult<&mut Self> {
        *self.get(index)? = type_id;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Run the layout algorithm and freeze the member list
    ///
    /// # Errors
    /// Returns error if:
    /// - `2^align_exp` does not fit in 64 bits
    /// - a member id is not registered in `manager`
    /// - an offset or the total size overflows `u64`
    pub fn build(self, name: impl Into<String>, align_exp: u32, manager: &TypeManager) -> IrResult<ComplexType> {
        let name = name.into();
        let max_align = 1u64
            .checked_shl(align_exp)
            .ok_or(IrError::InvalidAlignment { exponent: align_exp })?;

        let mut offsets = Vec::with_capacity(self.members.len());
        let mut cur_offset = 0u64;
        let mut max_member_size = 0u64;

        for &member in &self.members {
            let member_size = manager.size_of(member)?;
            max_member_size = max_member_size.max(member_size);

            let member_align = member_size.min(max_align);
            cur_offset = align_up(cur_offset, member_align).ok_or_else(|| overflow(&name))?;
            trace!("{name}: member {member} (size {member_size}) at offset {cur_offset}");
            offsets.push(cur_offset);

            cur_offset = cur_offset.checked_add(member_size).ok_or_else(|| overflow(&name))?;
        }

        let struct_align = max_member_size.min(max_align);
        let size = align_up(cur_offset, struct_align).ok_or_else(|| overflow(&name))?;
        debug!("layout of {name}: size {size}, align 2^{align_exp}, offsets {offsets:?}");

        Ok(ComplexType {
            name,
            size,
            align_exp,
            members: self.members,
            offsets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimKind;
    use pretty_assertions::assert_eq;

    fn build(manager: &TypeManager, name: &str, align_exp: u32, members: &[TypeId]) -> ComplexType {
        let mut builder = ComplexTypeBuilder::new();
        for &member in members {
            builder.append(member);
        }
        builder.build(name, align_exp, manager).expect("Should calculate layout")
    }

    /// struct myType {
    ///     unsigned char ui8_1; int i32_2; unsigned int ui32_3; long long i64_4;
    ///     unsigned char ui8_5; int i32_6; unsigned char ui8_7; int i32_8;
    ///     unsigned long long ui64_9; bool bool_10;
    /// } __attribute__((aligned(8)));
    fn my_type(manager: &TypeManager) -> ComplexType {
        let id = |kind| manager.primitive_id(kind);
        build(manager, "myType", 3, &[
            id(PrimKind::UI8),
            id(PrimKind::I32),
            id(PrimKind::UI32),
            id(PrimKind::I64),
            id(PrimKind::UI8),
            id(PrimKind::I32),
            id(PrimKind::UI8),
            id(PrimKind::I32),
            id(PrimKind::UI64),
            id(PrimKind::Bool),
        ])
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 4), Some(0));
        assert_eq!(align_up(1, 4), Some(4));
        assert_eq!(align_up(4, 4), Some(4));
        assert_eq!(align_up(13, 8), Some(16));
        assert_eq!(align_up(7, 1), Some(7));
        assert_eq!(align_up(7, 0), Some(7));
        assert_eq!(align_up(u64::MAX, 1), Some(u64::MAX));
        assert_eq!(align_up(u64::MAX - 2, 8), None);
    }

    fn try_build(manager: &TypeManager, name: &str, align_exp: u32, members: &[TypeId]) -> IrResult<ComplexType> {
        let mut builder = ComplexTypeBuilder::new();
        for &member in members {
            builder.append(member);
        }
        builder.build(name, align_exp, manager)
    }

    #[test]
    fn test_nested_doubling_overflows() {
        let mut manager = TypeManager::new();
        let mut inner = manager.primitive_id(PrimKind::UI64);
        let mut level = 0;
        let err = loop {
            level += 1;
            match try_build(&manager, &format!("level{level}"), 3, &[inner, inner]) {
                Ok(layout) => {
                    assert_eq!(layout.size(), 8u64 << level);
                    inner = manager.append(layout);
                }
                Err(err) => break err,
            }
        };

        // level60 is exactly 2^63 bytes; two of those no longer fit
        assert_eq!(level, 61);
        assert_eq!(err, IrError::LayoutOverflow { name: "level61".to_string() });
        assert_eq!(manager.len(), 14 + 60);
    }

    #[test]
    fn test_final_alignment_overflows() {
        let mut manager = TypeManager::new();
        let byte = manager.primitive_id(PrimKind::UI8);
        let wide = manager.primitive_id(PrimKind::UI64);

        // Packed types of size 2, 4, ..., 2^63
        let mut powers = Vec::new();
        let mut half = byte;
        for level in 0..63 {
            let layout = try_build(&manager, &format!("p{level}"), 0, &[half, half]).unwrap();
            half = manager.append(layout);
            powers.push(half);
        }
        assert_eq!(manager.size_of(half), Ok(1 << 63));

        // Largest first, then one byte: packed, ends exactly at u64::MAX
        let mut members: Vec<TypeId> = powers.iter().rev().copied().collect();
        members.push(byte);
        let full = try_build(&manager, "full", 0, &members).unwrap();
        assert_eq!(full.size(), u64::MAX);

        // Padding the end to 8 bytes has nowhere to go
        assert_eq!(
            try_build(&manager, "padded", 3, &members).unwrap_err(),
            IrError::LayoutOverflow { name: "padded".to_string() }
        );

        // Neither has aligning for one more ui64
        members.push(wide);
        let err = try_build(&manager, "tail", 3, &members).unwrap_err();
        assert_eq!(err, IrError::LayoutOverflow { name: "tail".to_string() });
    }

    #[test]
    fn test_native_struct_layout() {
        let manager = TypeManager::new();
        let layout = my_type(&manager);

        // offsetof/sizeof of the C struct above on x86-64
        assert_eq!(layout.offsets(), &[0, 4, 8, 16, 24, 28, 32, 36, 40, 48]);
        assert_eq!(layout.size(), 56);
        assert_eq!(layout.member_count(), 10);
        assert_eq!(layout.align(), 8);
    }

    #[test]
    fn test_nested_struct_layout() {
        let mut manager = TypeManager::new();
        let inner = manager.append(my_type(&manager));
        let id = |kind| manager.primitive_id(kind);

        // struct myType2 {
        //     myType myType_1; unsigned int ui32_2; bool bool_3; myType myType_4;
        //     bool bool_5; unsigned long long ui64_6; unsigned char ui8_7;
        // } __attribute__((aligned(8)));
        let outer = build(&manager, "myType2", 3, &[
            inner,
            id(PrimKind::UI32),
            id(PrimKind::Bool),
            inner,
            id(PrimKind::Bool),
            id(PrimKind::UI64),
            id(PrimKind::UI8),
        ]);

        assert_eq!(outer.offsets(), &[0, 56, 60, 64, 120, 128, 136]);
        assert_eq!(outer.size(), 144);
        assert_eq!(outer.member_type_id(3), Ok(inner));
    }

    #[test]
    fn test_alignment_cap() {
        let manager = TypeManager::new();
        let id = |kind| manager.primitive_id(kind);

        // Like #pragma pack(4)
        let packed = build(&manager, "packed4", 2, &[id(PrimKind::UI8), id(PrimKind::I64)]);
        assert_eq!(packed.offsets(), &[0, 4]);
        assert_eq!(packed.size(), 12);

        // Byte alignment removes all padding
        let bytes = build(&manager, "packed1", 0, &[id(PrimKind::UI8), id(PrimKind::Double), id(PrimKind::I16)]);
        assert_eq!(bytes.offsets(), &[0, 1, 9]);
        assert_eq!(bytes.size(), 11);
    }

    #[test]
    fn test_layout_invariants() {
        let manager = TypeManager::new();
        let layout = my_type(&manager);
        let max_align = layout.align();

        let mut previous = 0;
        let mut max_member = 0;
        for (member, offset) in layout.members() {
            let size = manager.size_of(member).unwrap();
            max_member = max_member.max(size);
            assert!(offset >= previous);
            assert_eq!(offset % size.min(max_align), 0);
            previous = offset;
        }
        assert_eq!(layout.size() % max_member.min(max_align), 0);
    }

    #[test]
    fn test_empty_struct() {
        let manager = TypeManager::new();
        let empty = build(&manager, "empty", 3, &[]);
        assert_eq!(empty.size(), 0);
        assert_eq!(empty.member_count(), 0);
    }

    #[test]
    fn test_zero_sized_member() {
        let mut manager = TypeManager::new();
        let empty = manager.append(build(&manager, "empty", 3, &[]));
        let id = |kind| manager.primitive_id(kind);

        let layout = build(&manager, "holder", 3, &[id(PrimKind::UI8), empty, id(PrimKind::I16)]);
        assert_eq!(layout.offsets(), &[0, 1, 2]);
        assert_eq!(layout.size(), 4);
    }

    #[test]
    fn test_unknown_member_error() {
        let manager = TypeManager::new();
        let mut builder = ComplexTypeBuilder::new();
        builder.append(TypeId::new(99));

        let err = builder.build("bad", 3, &manager).unwrap_err();
        assert_eq!(err, IrError::OutOfBounds { what: "type", index: 99, bound: 14 });
    }

    #[test]
    fn test_alignment_exponent_too_large() {
        let manager = TypeManager::new();
        let err = ComplexTypeBuilder::new().build("huge", 64, &manager).unwrap_err();
        assert_eq!(err, IrError::InvalidAlignment { exponent: 64 });
    }

    #[test]
    fn test_builder_edit_in_place() {
        let manager = TypeManager::new();
        let mut builder = ComplexTypeBuilder::new();
        builder
            .append(manager.primitive_id(PrimKind::UI8))
            .append(manager.primitive_id(PrimKind::UI8));

        *builder.get(1).unwrap() = manager.primitive_id(PrimKind::I32);
        assert!(builder.get(2).unwrap_err().is_out_of_bounds());
        assert!(builder.replace(5, manager.primitive_id(PrimKind::I8)).is_err());
        assert_eq!(builder.len(), 2);

        let layout = builder.build("edited", 3, &manager).unwrap();
        assert_eq!(layout.offsets(), &[0, 4]);
        assert_eq!(layout.size(), 8);
    }

    #[test]
    fn test_member_access_out_of_bounds() {
        let manager = TypeManager::new();
        let layout = my_type(&manager);
        assert!(layout.member_offset(10).unwrap_err().is_out_of_bounds());
        assert!(layout.member_type_id(10).unwrap_err().is_out_of_bounds());
        assert_eq!(layout.member_offset(9), Ok(48));
    }
}

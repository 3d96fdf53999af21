//! Textual rendering support
//!
//! Containers only hold handles, so printing them needs the pools and the
//! type catalog the handles point into. [`RenderContext`] bundles those
//! borrows. Rendering never mutates anything, so printing the same
//! container twice yields identical text.

use rir_common::IrResult;
use crate::ir::{ArgOpPool, Instruction, OperandPool};
use crate::types::TypeManager;

/// Shared borrows needed to resolve handles while printing
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub types: &'a TypeManager,
    pub operands: &'a OperandPool,
    pub arg_lists: &'a ArgOpPool,
}

impl<'a> RenderContext<'a> {
    pub fn new(types: &'a TypeManager, operands: &'a OperandPool, arg_lists: &'a ArgOpPool) -> Self {
        Self { types, operands, arg_lists }
    }
}

/// Read access to an ordered run of instructions
pub trait IrSlice {
    fn ins_count(&self) -> usize;

    /// Instruction at a flat index
    fn ins(&self, index: usize) -> IrResult<&Instruction>;
}

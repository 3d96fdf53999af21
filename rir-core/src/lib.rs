//! Ripple IR - Core
//! 
//! This crate provides the in-memory intermediate representation consumed by
//! later compiler stages:
//! - IR: operands and their pools, instructions, fragments, basic blocks,
//!   functions, declarations and programs, plus their staged builders
//! - Types: the primitive type catalog and the composite layout algorithm
//!
//! Everything is addressed by handle. Pools and the type catalog own their
//! objects; containers store handles, and rendering resolves them through a
//! [`ir::RenderContext`].

pub mod ir;
pub mod types;

pub use rir_common::{ArgListId, ConventionId, IrError, IrResult, OperandId, TypeId};
pub use types::{ComplexType, ComplexTypeBuilder, PrimKind, Type, TypeKind, TypeManager};
pub use ir::{
    Operand, Immediate, SymbolScope, OperandPool, ArgOpPool,
    Opcode, Instruction, Slot, CallArgs,
    IrFragment, IrFragmentBuilder,
    Argument, IrBasicBlock, IrBasicBlockBuilder,
    FuncDecl, IrFuncDeclTab,
    IrFunction, IrFunctionBuilder,
    IrProgram, IrSlice, RenderContext,
};

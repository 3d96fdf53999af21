//! SSA Intermediate Representation
//!
//! Operands live in pools and are referenced by handle. Instructions name
//! their operands by handle, and containers nest as
//! fragment → basic block → function → program.
//!
//! ## Architecture
//!
//! The module is structured as follows:
//! - `values` - Operand and immediate representations
//! - `pool` - Operand and argument-list pools
//! - `ops` - Opcodes
//! - `instructions` - Three-slot IR instructions
//! - `render` - Render context and the `IrSlice` read interface
//! - `fragment` - Frozen instruction runs and their builder
//! - `blocks` - Basic block management
//! - `decl` - Function declarations and the declaration table
//! - `function` - Function definitions
//! - `program` - Functions plus declarations

// Public exports - clean API surface
pub use self::values::{Operand, Immediate, SymbolScope, MAX_ARG_NESTING};
pub use self::pool::{OperandPool, ArgOpPool};
pub use self::ops::Opcode;
pub use self::instructions::{Instruction, Slot, CallArgs};
pub use self::render::{RenderContext, IrSlice};
pub use self::fragment::{IrFragment, IrFragmentBuilder};
pub use self::blocks::{Argument, IrBasicBlock, IrBasicBlockBuilder};
pub use self::decl::{FuncDecl, IrFuncDeclTab};
pub use self::function::{IrFunction, IrFunctionBuilder};
pub use self::program::IrProgram;

// Internal modules
mod values;
mod pool;
mod ops;
mod instructions;
mod render;
mod fragment;
mod blocks;
mod decl;
mod function;
mod program;

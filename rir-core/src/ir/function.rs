//! IR Function Representation
//!
//! A function is a declaration plus an ordered list of basic blocks. The
//! first block is the entry block.

use log::trace;
use rir_common::{error::checked_get, ConventionId, IrError, IrResult, TypeId};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use crate::ir::{Argument, FuncDecl, Instruction, IrBasicBlock, IrSlice, RenderContext};

/// IR Function
///
/// Serializes as its declaration and blocks; the flat-index caches are
/// recomputed on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FunctionParts")]
pub struct IrFunction {
    decl: FuncDecl,
    blocks: Box<[IrBasicBlock]>,
    /// Flat index of each block's first instruction
    #[serde(skip_serializing)]
    starts: Box<[usize]>,
    #[serde(skip_serializing)]
    ins_count: usize,
}

#[derive(Deserialize)]
struct FunctionParts {
    decl: FuncDecl,
    blocks: Vec<IrBasicBlock>,
}

impl From<FunctionParts> for IrFunction {
    fn from(parts: FunctionParts) -> Self {
        IrFunction::assemble(parts.decl, parts.blocks)
    }
}

impl IrFunction {
    fn assemble(decl: FuncDecl, blocks: Vec<IrBasicBlock>) -> Self {
        let mut starts = Vec::with_capacity(blocks.len());
        let mut ins_count = 0;
        for block in &blocks {
            starts.push(ins_count);
            ins_count += block.ins_count();
        }
        IrFunction {
            decl,
            blocks: blocks.into_boxed_slice(),
            starts: starts.into_boxed_slice(),
            ins_count,
        }
    }

    pub fn decl(&self) -> &FuncDecl {
        &self.decl
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, index: usize) -> IrResult<&IrBasicBlock> {
        checked_get(&self.blocks, index, "basic block")
    }

    pub fn block_by_name(&self, name: &str) -> IrResult<&IrBasicBlock> {
        self.blocks
            .iter()
            .find(|b| b.name() == name)
            .ok_or_else(|| IrError::not_found("basic block", name))
    }

    pub fn blocks(&self) -> &[IrBasicBlock] {
        &self.blocks
    }

    pub fn entry_block(&self) -> Option<&IrBasicBlock> {
        self.blocks.first()
    }

    /// Every instruction in block order
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|b| b.iter())
    }

    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
        write!(out, "def ")?;
        self.decl.render(ctx, out)?;
        writeln!(out, " {{")?;
        for block in self.blocks.iter() {
            block.render(ctx, out)?;
        }
        writeln!(out, "}}")?;
        Ok(())
    }

    pub fn render_to_string(&self, ctx: &RenderContext<'_>) -> IrResult<String> {
        let mut out = String::new();
        self.render(ctx, &mut out)?;
        Ok(out)
    }
}

impl IrSlice for IrFunction {
    fn ins_count(&self) -> usize {
        self.ins_count
    }

    fn ins(&self, index: usize) -> IrResult<&Instruction> {
        if index >= self.ins_count {
            return Err(IrError::out_of_bounds("instruction", index, self.ins_count));
        }
        // Last block starting at or before `index`; empty blocks share a start
        // with their successor, so take the rightmost match.
        let block = self.starts.partition_point(|&start| start <= index).saturating_sub(1);
        let start = checked_get(&self.starts, block, "block start")?;
        checked_get(&self.blocks, block, "basic block")?.ins(index - start)
    }
}

/// Staging area for a function
#[derive(Debug, Clone)]
pub struct IrFunctionBuilder {
    decl: FuncDecl,
    blocks: Vec<IrBasicBlock>,
}

impl IrFunctionBuilder {
    /// Start a function with no parameters, no return type and convention 0
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            decl: FuncDecl::new(name, None, ConventionId::default()),
            blocks: Vec::new(),
        }
    }

    pub fn from_decl(decl: FuncDecl) -> Self {
        Self { decl, blocks: Vec::new() }
    }

    pub fn decl(&self) -> &FuncDecl {
        &self.decl
    }

    pub fn decl_mut(&mut self) -> &mut FuncDecl {
        &mut self.decl
    }

    pub fn append_arg(&mut self, arg: Argument) -> &mut Self {
        self.decl.args.push(arg);
        self
    }

    pub fn set_ret(&mut self, ret: Option<TypeId>) -> &mut Self {
        self.decl.ret = ret;
        self
    }

    pub fn set_convention(&mut self, convention: ConventionId) -> &mut Self {
        self.decl.convention = convention;
        self
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, index: usize) -> IrResult<&IrBasicBlock> {
        checked_get(&self.blocks, index, "basic block")
    }

    pub fn append_block(&mut self, block: IrBasicBlock) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Swap the block at `index`; the builder is left as it was on failure
    pub fn replace_block(&mut self, index: usize, block: IrBasicBlock) -> IrResult<&mut Self> {
        let count = self.blocks.len();
        let slot = self.blocks.get_mut(index).ok_or_else(|| {
            IrError::invalid_state(format!(
                "cannot replace block {index} of @{}: only {count} blocks appended",
                self.decl.name
            ))
        })?;
        *slot = block;
        Ok(self)
    }

    pub fn build(self) -> IrFunction {
        let function = IrFunction::assemble(self.decl, self.blocks);
        trace!(
            "function @{} frozen with {} blocks, {} instructions",
            function.name(),
            function.block_count(),
            function.ins_count
        );
        function
    }
}

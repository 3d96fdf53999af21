//! IR Fragments
//!
//! A fragment is a flat, frozen run of instructions. It is produced once by
//! an [`IrFragmentBuilder`] and never changes afterwards.

use log::trace;
use rir_common::{
    error::{checked_get, checked_get_mut},
    IrResult,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use crate::ir::{Instruction, IrSlice, RenderContext};

/// Immutable instruction sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrFragment {
    instructions: Box<[Instruction]>,
}

impl IrFragment {
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    /// One instruction per line, indented four spaces
    ///
    /// Lines are written whole: if an instruction fails to render, `out`
    /// holds exactly the lines before it.
    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
        for ins in self.instructions.iter() {
            let line = ins.render_to_string(ctx)?;
            writeln!(out, "    {line}")?;
        }
        Ok(())
    }
}

impl IrSlice for IrFragment {
    fn ins_count(&self) -> usize {
        self.instructions.len()
    }

    fn ins(&self, index: usize) -> IrResult<&Instruction> {
        checked_get(&self.instructions, index, "instruction")
    }
}

/// Staging area for a fragment
#[derive(Debug, Clone, Default)]
pub struct IrFragmentBuilder {
    instructions: Vec<Instruction>,
}

impl IrFragmentBuilder {
    pub fn new() -> Self {
        Self { instructions: Vec::new() }
    }

    pub fn append(&mut self, ins: Instruction) -> &mut Self {
        self.instructions.push(ins);
        self
    }

    /// Mutable access for in-place edits before `build`
    pub fn get(&mut self, index: usize) -> IrResult<&mut Instruction> {
        checked_get_mut(&mut self.instructions, index, "instruction")
    }

    pub fn replace(&mut self, index: usize, ins: Instruction) -> IrResult<&mut Self> {
        *self.get(index)? = ins;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Freeze the staged instructions
    pub fn build(self) -> IrFragment {
        trace!("fragment frozen with {} instructions", self.instructions.len());
        IrFragment {
            instructions: self.instructions.into_boxed_slice(),
        }
    }
}

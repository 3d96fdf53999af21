//! Basic Block Management
//!
//! A basic block is a labelled fragment with optional block parameters.
//! `br` and `goto` name blocks by their label.

use log::trace;
use rir_common::{
    error::{checked_get, checked_get_mut},
    IrResult, TypeId,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use crate::ir::{Instruction, IrFragment, IrFragmentBuilder, IrSlice, RenderContext};

/// Typed, named parameter of a block or function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub type_id: TypeId,
    pub name: String,
}

impl Argument {
    pub fn new(type_id: TypeId, name: impl Into<String>) -> Self {
        Self { type_id, name: name.into() }
    }

    /// `type %name`
    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
        let ty = ctx.types.get(self.type_id)?;
        write!(out, "{} %{}", ty.name(), self.name)?;
        Ok(())
    }
}

/// Write `a, b, c` for a list of arguments
pub(crate) fn render_args(args: &[Argument], ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 { write!(out, ", ")?; }
        arg.render(ctx, out)?;
    }
    Ok(())
}

/// Basic Block - a labelled straight-line run of instructions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrBasicBlock {
    name: String,
    fragment: IrFragment,
    args: Box<[Argument]>,
}

impl IrBasicBlock {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fragment(&self) -> &IrFragment {
        &self.fragment
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn arg(&self, index: usize) -> IrResult<&Argument> {
        checked_get(&self.args, index, "block parameter")
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.fragment.iter()
    }

    /// Whether the last instruction ends the block
    pub fn has_terminator(&self) -> bool {
        self.fragment
            .as_slice()
            .last()
            .is_some_and(|ins| ins.opcode().is_terminator())
    }

    /// `label(type %p, ...):` followed by the instructions
    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
        write!(out, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(out, "(")?;
            render_args(&self.args, ctx, out)?;
            write!(out, ")")?;
        }
        writeln!(out, ":")?;
        self.fragment.render(ctx, out)
    }
}

impl IrSlice for IrBasicBlock {
    fn ins_count(&self) -> usize {
        self.fragment.ins_count()
    }

    fn ins(&self, index: usize) -> IrResult<&Instruction> {
        self.fragment.ins(index)
    }
}

/// Staging area for a basic block
#[derive(Debug, Clone, Default)]
pub struct IrBasicBlockBuilder {
    fragment: IrFragmentBuilder,
    args: Vec<Argument>,
}

impl IrBasicBlockBuilder {
    pub fn new() -> Self {
        Self {
            fragment: IrFragmentBuilder::new(),
            args: Vec::new(),
        }
    }

    pub fn ins_count(&self) -> usize {
        self.fragment.len()
    }

    pub fn append_ins(&mut self, ins: Instruction) -> &mut Self {
        self.fragment.append(ins);
        self
    }

    pub fn get_ins(&mut self, index: usize) -> IrResult<&mut Instruction> {
        self.fragment.get(index)
    }

    pub fn replace_ins(&mut self, index: usize, ins: Instruction) -> IrResult<&mut Self> {
        self.fragment.replace(index, ins)?;
        Ok(self)
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn append_arg(&mut self, arg: Argument) -> &mut Self {
        self.args.push(arg);
        self
    }

    pub fn get_arg(&mut self, index: usize) -> IrResult<&mut Argument> {
        checked_get_mut(&mut self.args, index, "block parameter")
    }

    pub fn replace_arg(&mut self, index: usize, arg: Argument) -> IrResult<&mut Self> {
        *self.get_arg(index)? = arg;
        Ok(self)
    }

    /// Freeze the staged instructions and parameters under `name`
    pub fn build(self, name: impl Into<String>) -> IrBasicBlock {
        let name = name.into();
        trace!("block {name} frozen with {} parameters", self.args.len());
        IrBasicBlock {
            name,
            fragment: self.fragment.build(),
            args: self.args.into_boxed_slice(),
        }
    }
}

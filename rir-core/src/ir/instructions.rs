//! IR Instructions
//!
//! An instruction is an opcode plus three operand slots:
//!
//! ```text
//! dest = op src1, src2
//! ```
//!
//! `br` reads the same slots as condition, if-label and else-label. An unused
//! slot points at an `Empty` operand. Instructions hold only handles, so they
//! are `Copy` and blocks store them by value.

use rir_common::{ArgListId, IrResult, OperandId};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use crate::ir::{Opcode, Operand, RenderContext};

/// Operand slot of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Dest,
    Src1,
    Src2,
}

/// Argument list attached to a `call`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallArgs {
    /// An `ArgList` operand in the operand pool
    Operand(OperandId),
    /// An entry in the argument-list pool
    Pooled(ArgListId),
}

/// IR Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    opcode: Opcode,
    dest: OperandId,
    src1: OperandId,
    src2: OperandId,
    args: Option<CallArgs>,
}

impl Instruction {
    pub fn new(opcode: Opcode, dest: OperandId, src1: OperandId, src2: OperandId) -> Self {
        Self { opcode, dest, src1, src2, args: None }
    }

    /// `br cond, if_label, else_label`
    pub fn branch(condition: OperandId, if_label: OperandId, else_label: OperandId) -> Self {
        Self::new(Opcode::Br, condition, if_label, else_label)
    }

    pub fn with_call_args(mut self, args: CallArgs) -> Self {
        self.args = Some(args);
        self
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn operand(&self, slot: Slot) -> OperandId {
        match slot {
            Slot::Dest => self.dest,
            Slot::Src1 => self.src1,
            Slot::Src2 => self.src2,
        }
    }

    pub fn set_operand(&mut self, slot: Slot, id: OperandId) {
        match slot {
            Slot::Dest => self.dest = id,
            Slot::Src1 => self.src1 = id,
            Slot::Src2 => self.src2 = id,
        }
    }

    pub fn set_opcode(&mut self, opcode: Opcode) {
        self.opcode = opcode;
    }

    pub fn dest(&self) -> OperandId { self.dest }
    pub fn src1(&self) -> OperandId { self.src1 }
    pub fn src2(&self) -> OperandId { self.src2 }

    // Slot aliases for `br`
    pub fn condition(&self) -> OperandId { self.dest }
    pub fn if_label(&self) -> OperandId { self.src1 }
    pub fn else_label(&self) -> OperandId { self.src2 }

    pub fn call_args(&self) -> Option<CallArgs> {
        self.args
    }

    pub fn set_call_args(&mut self, args: Option<CallArgs>) {
        self.args = args;
    }

    /// Write the textual form of this instruction
    ///
    /// `br` prints as `br cond, if, else`; everything else as
    /// `dest = op src1, src2, [args]`. Slots holding `Empty` are omitted.
    /// Output is streamed, so on error `out` may end in a partial line; use
    /// [`render_to_string`](Self::render_to_string) to get all or nothing.
    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
        let pool = ctx.operands;

        let slots = if self.opcode == Opcode::Br {
            [Some(self.dest), Some(self.src1), Some(self.src2)]
        } else {
            if !pool.is_empty_operand(self.dest)? {
                pool.render(self.dest, out)?;
                write!(out, " = ")?;
            }
            [Some(self.src1), Some(self.src2), None]
        };

        write!(out, "{}", self.opcode)?;
        let mut first = true;
        for id in slots.into_iter().flatten() {
            if pool.is_empty_operand(id)? {
                continue;
            }
            write!(out, "{}", if first { " " } else { ", " })?;
            pool.render(id, out)?;
            first = false;
        }

        if let Some(args) = self.args {
            write!(out, "{}", if first { " " } else { ", " })?;
            match args {
                CallArgs::Operand(id) => {
                    let operand = pool.get(id)?;
                    if let Operand::ArgList(_) = operand {
                        operand.render(pool, out)?;
                    } else {
                        write!(out, "[")?;
                        operand.render(pool, out)?;
                        write!(out, "]")?;
                    }
                }
                CallArgs::Pooled(id) => ctx.arg_lists.render(id, pool, out)?,
            }
        }
        Ok(())
    }

    pub fn render_to_string(&self, ctx: &RenderContext<'_>) -> IrResult<String> {
        let mut out = String::new();
        self.render(ctx, &mut out)?;
        Ok(out)
    }
}

//! Operand arenas
//!
//! [`OperandPool`] owns every operand and hands out [`OperandId`]s in append
//! order. [`ArgOpPool`] owns by-value operand lists used as call arguments.
//! Neither pool ever removes or mutates an entry, so a handle stays valid
//! for the pool's whole lifetime.

use log::trace;
use rir_common::{error::checked_get, ArgListId, IrResult, OperandId};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use crate::ir::Operand;

/// Arena of operands addressed by handle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperandPool {
    operands: Vec<Operand>,
}

impl OperandPool {
    pub fn new() -> Self {
        Self { operands: Vec::new() }
    }

    /// Take ownership of `operand` and return its handle
    pub fn append(&mut self, operand: impl Into<Operand>) -> OperandId {
        let id = OperandId::new(self.operands.len());
        let operand = operand.into();
        trace!("operand {id} = {operand:?}");
        self.operands.push(operand);
        id
    }

    pub fn get(&self, id: OperandId) -> IrResult<&Operand> {
        checked_get(&self.operands, id.index(), "operand")
    }

    /// Whether `id` names the `Empty` operand
    pub fn is_empty_operand(&self, id: OperandId) -> IrResult<bool> {
        self.get(id).map(Operand::is_empty)
    }

    /// Write the textual form of the operand behind `id`
    pub fn render(&self, id: OperandId, out: &mut dyn Write) -> IrResult<()> {
        self.get(id)?.render_nested(self, out, &mut vec![id])
    }

    pub fn render_to_string(&self, id: OperandId) -> IrResult<String> {
        let mut out = String::new();
        self.render(id, &mut out)?;
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.operands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperandId, &Operand)> {
        self.operands
            .iter()
            .enumerate()
            .map(|(index, operand)| (OperandId::new(index), operand))
    }
}

/// Arena of by-value argument lists
///
/// Used for call argument lists built directly from values instead of from
/// pooled operand handles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgOpPool {
    lists: Vec<Vec<Operand>>,
}

impl ArgOpPool {
    pub fn new() -> Self {
        Self { lists: Vec::new() }
    }

    pub fn append_arg(&mut self, list: Vec<Operand>) -> ArgListId {
        let id = ArgListId::new(self.lists.len());
        trace!("argument list {id} with {} operands", list.len());
        self.lists.push(list);
        id
    }

    pub fn get_arg(&self, id: ArgListId) -> IrResult<&[Operand]> {
        checked_get(&self.lists, id.index(), "argument list").map(Vec::as_slice)
    }

    /// Write `[a, b, ...]`; handles inside the list resolve through `operands`
    pub fn render(&self, id: ArgListId, operands: &OperandPool, out: &mut dyn Write) -> IrResult<()> {
        let list = self.get_arg(id)?;
        write!(out, "[")?;
        for (i, arg) in list.iter().enumerate() {
            if i > 0 { write!(out, ", ")?; }
            arg.render(operands, out)?;
        }
        write!(out, "]")?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

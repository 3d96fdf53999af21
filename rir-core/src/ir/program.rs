//! IR Program
//!
//! Top-level container: every defined function plus the declaration table
//! used to resolve calls, including calls to functions defined elsewhere.

use log::debug;
use rir_common::{IrError, IrResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use crate::ir::{FuncDecl, Instruction, IrFuncDeclTab, IrFunction, IrSlice, RenderContext};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IrProgram {
    functions: Vec<IrFunction>,
    decls: IrFuncDeclTab,
}

impl IrProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a defined function and register its signature
    ///
    /// A forward declaration of the same name is overwritten by the
    /// function's own signature. Defining a name twice is an error.
    pub fn add_function(&mut self, function: IrFunction) -> IrResult<()> {
        if self.functions.iter().any(|f| f.name() == function.name()) {
            return Err(IrError::invalid_state(format!(
                "function @{} is already defined",
                function.name()
            )));
        }
        if self.decls.replace(function.decl().clone()).is_some() {
            debug!("definition of @{} supersedes its declaration", function.name());
        }
        self.functions.push(function);
        Ok(())
    }

    /// Declare a function without a body; first declaration wins
    pub fn declare(&mut self, decl: FuncDecl) -> bool {
        self.decls.append(decl)
    }

    pub fn function(&self, name: &str) -> IrResult<&IrFunction> {
        self.functions
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| IrError::not_found("function", name))
    }

    pub fn functions(&self) -> &[IrFunction] {
        &self.functions
    }

    pub fn decls(&self) -> &IrFuncDeclTab {
        &self.decls
    }

    /// Defined functions in order, separated by a blank line
    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
        for (i, function) in self.functions.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            function.render(ctx, out)?;
        }
        Ok(())
    }

    pub fn render_to_string(&self, ctx: &RenderContext<'_>) -> IrResult<String> {
        let mut out = String::new();
        self.render(ctx, &mut out)?;
        Ok(out)
    }
}

impl IrSlice for IrProgram {
    fn ins_count(&self) -> usize {
        self.functions.iter().map(|f| f.ins_count()).sum()
    }

    fn ins(&self, index: usize) -> IrResult<&Instruction> {
        let mut rest = index;
        for function in &self.functions {
            if rest < function.ins_count() {
                return function.ins(rest);
            }
            rest -= function.ins_count();
        }
        Err(IrError::out_of_bounds("instruction", index, self.ins_count()))
    }
}

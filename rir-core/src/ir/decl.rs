//! Function Declarations
//!
//! A declaration is a function signature: name, parameters, return type and
//! calling convention. The table maps names to signatures so call sites can
//! be resolved without the callee's body.

use log::debug;
use rir_common::{ConventionId, IrError, IrResult, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;
use crate::ir::blocks::render_args;
use crate::ir::{Argument, RenderContext};

/// Function signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    pub args: Vec<Argument>,
    /// `None` for functions returning nothing
    pub ret: Option<TypeId>,
    pub convention: ConventionId,
}

impl FuncDecl {
    pub fn new(name: impl Into<String>, ret: Option<TypeId>, convention: ConventionId) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            ret,
            convention,
        }
    }

    pub fn with_arg(mut self, arg: Argument) -> Self {
        self.args.push(arg);
        self
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// `@name(type %p, ...) -> ret`
    pub fn render(&self, ctx: &RenderContext<'_>, out: &mut dyn Write) -> IrResult<()> {
        write!(out, "@{}(", self.name)?;
        render_args(&self.args, ctx, out)?;
        write!(out, ")")?;
        if let Some(ret) = self.ret {
            write!(out, " -> {}", ctx.types.get(ret)?.name())?;
        }
        Ok(())
    }
}

/// Name to signature table
///
/// Iteration follows insertion order. Only the declarations are serialized;
/// the name index is rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "DeclList")]
pub struct IrFuncDeclTab {
    decls: Vec<FuncDecl>,
    #[serde(skip_serializing)]
    by_name: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct DeclList {
    decls: Vec<FuncDecl>,
}

impl From<DeclList> for IrFuncDeclTab {
    fn from(list: DeclList) -> Self {
        let mut tab = IrFuncDeclTab::new();
        for decl in list.decls {
            tab.append(decl);
        }
        tab
    }
}

impl IrFuncDeclTab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> IrResult<&FuncDecl> {
        self.by_name
            .get(name)
            .and_then(|&index| self.decls.get(index))
            .ok_or_else(|| IrError::not_found("function declaration", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Insert a declaration unless one with the same name exists
    ///
    /// Returns `false` and keeps the existing entry on a duplicate name.
    pub fn append(&mut self, decl: FuncDecl) -> bool {
        if self.by_name.contains_key(&decl.name) {
            debug!("declaration @{} already present, keeping the first", decl.name);
            return false;
        }
        self.by_name.insert(decl.name.clone(), self.decls.len());
        self.decls.push(decl);
        true
    }

    /// Insert or overwrite, returning the previous declaration
    pub fn replace(&mut self, decl: FuncDecl) -> Option<FuncDecl> {
        match self.by_name.get(&decl.name) {
            Some(&index) => Some(std::mem::replace(&mut self.decls[index], decl)),
            None => {
                self.append(decl);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FuncDecl> {
        self.decls.iter()
    }
}

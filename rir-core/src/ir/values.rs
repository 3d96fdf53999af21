//! IR Operand Representations
//!
//! Defines the values that instruction slots refer to: immediates, symbols,
//! block labels and argument lists. Operands live in an
//! [`OperandPool`](crate::ir::OperandPool) and are referenced by handle.

use rir_common::{IrError, IrResult, OperandId};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use crate::ir::OperandPool;
use crate::types::PrimKind;

/// Deepest chain of nested argument lists the renderer follows
pub const MAX_ARG_NESTING: usize = 64;

/// Scope of a symbol reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolScope {
    Global,
    Local,
    Builtin,
}

impl SymbolScope {
    pub fn prefix(self) -> char {
        match self {
            SymbolScope::Global => '@',
            SymbolScope::Local | SymbolScope::Builtin => '%',
        }
    }
}

/// Immediate constant: a width tag plus raw bits
///
/// The tag alone decides how `bits` is read. Constructors store the value
/// zero-extended into the low bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Immediate {
    kind: PrimKind,
    bits: u64,
}

impl Immediate {
    pub fn from_raw(kind: PrimKind, bits: u64) -> Self {
        Self { kind, bits }
    }

    pub fn i8(value: i8) -> Self { Self::from_raw(PrimKind::I8, value as u8 as u64) }
    pub fn i16(value: i16) -> Self { Self::from_raw(PrimKind::I16, value as u16 as u64) }
    pub fn i32(value: i32) -> Self { Self::from_raw(PrimKind::I32, value as u32 as u64) }
    pub fn i64(value: i64) -> Self { Self::from_raw(PrimKind::I64, value as u64) }
    pub fn ui8(value: u8) -> Self { Self::from_raw(PrimKind::UI8, value as u64) }
    pub fn ui16(value: u16) -> Self { Self::from_raw(PrimKind::UI16, value as u64) }
    pub fn ui32(value: u32) -> Self { Self::from_raw(PrimKind::UI32, value as u64) }
    pub fn ui64(value: u64) -> Self { Self::from_raw(PrimKind::UI64, value) }
    pub fn ptr16(addr: u16) -> Self { Self::from_raw(PrimKind::P16, addr as u64) }
    pub fn ptr32(addr: u32) -> Self { Self::from_raw(PrimKind::P32, addr as u64) }
    pub fn ptr64(addr: u64) -> Self { Self::from_raw(PrimKind::P64, addr) }
    pub fn float(value: f32) -> Self { Self::from_raw(PrimKind::Float, value.to_bits() as u64) }
    pub fn double(value: f64) -> Self { Self::from_raw(PrimKind::Double, value.to_bits()) }
    pub fn bool(value: bool) -> Self { Self::from_raw(PrimKind::Bool, value as u64) }

    pub fn kind(&self) -> PrimKind {
        self.kind
    }

    pub fn raw(&self) -> u64 {
        self.bits
    }

    /// Raw bits masked to the tag's width
    pub fn as_u64(&self) -> u64 {
        self.bits & self.kind.mask()
    }

    /// Raw bits sign-extended from the tag's width
    pub fn as_i64(&self) -> i64 {
        let shift = 64 - self.kind.bits();
        ((self.bits << shift) as i64) >> shift
    }

    /// Floating-point value; `float` is widened
    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            PrimKind::Float => Some(f32::from_bits(self.bits as u32) as f64),
            PrimKind::Double => Some(f64::from_bits(self.bits)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        self.as_u64() != 0
    }

    /// Write the literal form of this constant
    pub fn render(&self, out: &mut dyn Write) -> IrResult<()> {
        match self.kind {
            PrimKind::I8 => {
                let ch = self.as_u64() as u8 as char;
                write!(out, "'{}'", ch.escape_default())?;
            }
            PrimKind::I16 | PrimKind::I32 | PrimKind::I64 => write!(out, "{}", self.as_i64())?,
            PrimKind::UI8 | PrimKind::UI16 | PrimKind::UI32 | PrimKind::UI64 => {
                write!(out, "{}", self.as_u64())?
            }
            PrimKind::P16 | PrimKind::P32 | PrimKind::P64 => match self.as_u64() {
                0 => write!(out, "null")?,
                addr => write!(out, "{addr:#x}")?,
            },
            PrimKind::Float => write!(out, "{:?}f", f32::from_bits(self.bits as u32))?,
            PrimKind::Double => write!(out, "{:?}", f64::from_bits(self.bits))?,
            PrimKind::Bool => write!(out, "{}", self.as_bool())?,
        }
        Ok(())
    }
}

/// IR Operand - what an instruction slot refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// Unused slot
    Empty,

    /// Constant value
    Immediate(Immediate),

    /// Named value: global symbol, local SSA value or builtin
    Symbol {
        scope: SymbolScope,
        name: String,
    },

    /// Basic block label
    Label(String),

    /// Call argument list
    ArgList(Vec<OperandId>),
}

impl Operand {
    pub fn global(name: impl Into<String>) -> Self {
        Operand::Symbol { scope: SymbolScope::Global, name: name.into() }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Operand::Symbol { scope: SymbolScope::Local, name: name.into() }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Operand::Symbol { scope: SymbolScope::Builtin, name: name.into() }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Operand::Label(name.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Operand::Empty)
    }

    /// Write the textual form, resolving nested argument lists through `pool`
    ///
    /// An argument list that reaches itself, or nests deeper than
    /// [`MAX_ARG_NESTING`], is an `InvalidState` error.
    pub fn render(&self, pool: &OperandPool, out: &mut dyn Write) -> IrResult<()> {
        self.render_nested(pool, out, &mut Vec::new())
    }

    /// `active` holds the handles currently being expanded, outermost first
    pub(crate) fn render_nested(
        &self,
        pool: &OperandPool,
        out: &mut dyn Write,
        active: &mut Vec<OperandId>,
    ) -> IrResult<()> {
        match self {
            Operand::Empty => {}
            Operand::Immediate(imm) => imm.render(out)?,
            Operand::Symbol { scope, name } => write!(out, "{}{name}", scope.prefix())?,
            Operand::Label(name) => write!(out, "{name}")?,
            Operand::ArgList(args) => {
                write!(out, "[")?;
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 { write!(out, ", ")?; }
                    if active.contains(&arg) {
                        return Err(IrError::invalid_state(format!("argument list {arg} contains itself")));
                    }
                    if active.len() >= MAX_ARG_NESTING {
                        return Err(IrError::invalid_state(format!(
                            "argument lists nested deeper than {MAX_ARG_NESTING}"
                        )));
                    }
                    active.push(arg);
                    pool.get(arg)?.render_nested(pool, out, active)?;
                    active.pop();
                }
                write!(out, "]")?;
            }
        }
        Ok(())
    }
}

impl From<Immediate> for Operand {
    fn from(imm: Immediate) -> Self {
        Operand::Immediate(imm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render_imm(imm: Immediate) -> String {
        let mut out = String::new();
        imm.render(&mut out).unwrap();
        out
    }

    #[test]
    fn test_signed_immediates() {
        assert_eq!(render_imm(Immediate::i32(-7)), "-7");
        assert_eq!(render_imm(Immediate::i16(i16::MIN)), "-32768");
        assert_eq!(render_imm(Immediate::i64(1 << 40)), "1099511627776");
        assert_eq!(Immediate::i32(-1).as_i64(), -1);
    }

    #[test]
    fn test_unsigned_immediates_are_masked() {
        assert_eq!(render_imm(Immediate::from_raw(PrimKind::UI8, 0x1ff)), "255");
        assert_eq!(render_imm(Immediate::from_raw(PrimKind::UI16, 0xdead_beef)), "48879");
        assert_eq!(render_imm(Immediate::from_raw(PrimKind::UI32, u64::MAX)), "4294967295");
        assert_eq!(render_imm(Immediate::ui64(u64::MAX)), "18446744073709551615");
    }

    #[test]
    fn test_pointer_immediates() {
        assert_eq!(render_imm(Immediate::ptr64(0)), "null");
        assert_eq!(render_imm(Immediate::ptr32(0x1000)), "0x1000");
        assert_eq!(render_imm(Immediate::from_raw(PrimKind::P16, 0x1_0000)), "null");
    }

    #[test]
    fn test_float_bool_char_immediates() {
        assert_eq!(render_imm(Immediate::float(1.5)), "1.5f");
        assert_eq!(render_imm(Immediate::double(2.0)), "2.0");
        assert_eq!(render_imm(Immediate::bool(true)), "true");
        assert_eq!(render_imm(Immediate::bool(false)), "false");
        assert_eq!(render_imm(Immediate::i8(b'a' as i8)), "'a'");
        assert_eq!(render_imm(Immediate::i8(b'\n' as i8)), "'\\n'");
    }

    #[test]
    fn test_immediate_readers() {
        assert_eq!(Immediate::float(0.25).as_f64(), Some(0.25));
        assert_eq!(Immediate::double(-3.5).as_f64(), Some(-3.5));
        assert_eq!(Immediate::i32(3).as_f64(), None);
        assert_eq!(Immediate::i8(-2).raw(), 0xfe);
        assert_eq!(Immediate::i8(-2).as_i64(), -2);
    }

    #[test]
    fn test_symbol_and_label_rendering() {
        let pool = OperandPool::new();
        let mut out = String::new();
        Operand::global("fib").render(&pool, &mut out).unwrap();
        out.push(' ');
        Operand::local("n").render(&pool, &mut out).unwrap();
        out.push(' ');
        Operand::builtin("sp").render(&pool, &mut out).unwrap();
        out.push(' ');
        Operand::label("else0").render(&pool, &mut out).unwrap();
        out.push('|');
        Operand::Empty.render(&pool, &mut out).unwrap();
        out.push('|');
        assert_eq!(out, "@fib %n %sp else0||");
    }
}

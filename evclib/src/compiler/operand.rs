use crate::ast::{Expr, ExprKind};
use crate::bytecode::{EvArg, EvCmd, encode, opcode};
use crate::diagnostic::Span;
use crate::error::{CompileErrorKind, CompileResult};
use crate::symbol::{ValueKind, Variable};

use super::CompilationContext;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Operand {
    Number(f64),
    Text(String),
    Bool(bool),
    Storage(ValueKind, u32),
}

impl Operand {
    fn describe(&self) -> String {
        match self {
            Operand::Number(_) => "number".to_string(),
            Operand::Text(_) => "string".to_string(),
            Operand::Bool(_) => "boolean".to_string(),
            Operand::Storage(kind, _) => format!("`{kind}` variable"),
        }
    }
}

impl CompilationContext<'_> {
    pub(super) fn lookup_variable(&self, parts: &[String], span: Span) -> CompileResult<Variable> {
        self.scopes.resolve::<Variable>(parts).cloned().ok_or_else(|| {
            self.error(
                CompileErrorKind::UnresolvedSymbol,
                format!("Unknown variable `{}`", parts.join("::")),
                span,
            )
        })
    }

    pub(super) fn operand(&self, expr: &Expr) -> CompileResult<Operand> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Operand::Number(*n)),
            ExprKind::Str(s) => Ok(Operand::Text(s.clone())),
            ExprKind::Bool(b) => Ok(Operand::Bool(*b)),
            ExprKind::Name(name) => {
                let var = self.lookup_variable(&name.parts, name.span)?;
                if var.is_const {
                    return Ok(match var.kind {
                        ValueKind::Boolean => Operand::Bool(var.const_value != 0),
                        _ => Operand::Number(f64::from(var.const_value)),
                    });
                }
                match var.storage {
                    Some(slot) => Ok(Operand::Storage(var.kind, slot)),
                    None => Err(self.error(
                        CompileErrorKind::UnsupportedConstruct,
                        format!("Variable `{}` has no storage", var.name),
                        expr.span,
                    )),
                }
            }
            ExprKind::Call(_) => Err(self.error(
                CompileErrorKind::UnsupportedConstruct,
                "Calls cannot be nested inside other expressions",
                expr.span,
            )),
        }
    }

    pub(super) fn operand_arg(&mut self, operand: Operand, span: Span) -> CompileResult<EvArg> {
        Ok(match operand {
            Operand::Number(n) => EvArg::Value(encode(n)),
            Operand::Bool(b) => EvArg::Value(encode(if b { 1.0 } else { 0.0 })),
            Operand::Text(s) => EvArg::String(self.labels.intern(&s)),
            Operand::Storage(kind, slot) => self.storage_arg(kind, slot, span)?,
        })
    }

    pub(super) fn storage_arg(&self, kind: ValueKind, slot: u32, span: Span) -> CompileResult<EvArg> {
        match kind {
            ValueKind::Integer | ValueKind::Float => Ok(EvArg::Work(slot)),
            ValueKind::Flag => Ok(EvArg::Flag(slot)),
            ValueKind::SysFlag => Ok(EvArg::SysFlag(slot)),
            other => Err(self.error(
                CompileErrorKind::UnsupportedConstruct,
                format!("`{other}` values have no storage form"),
                span,
            )),
        }
    }

    pub(super) fn emit_store(
        &mut self,
        label: u32,
        kind: ValueKind,
        slot: u32,
        operand: Operand,
        span: Span,
    ) -> CompileResult<()> {
        let cmd = match (kind, &operand) {
            (ValueKind::Integer | ValueKind::Float, Operand::Number(n)) => {
                EvCmd::new(opcode::LDVAL, vec![EvArg::Work(slot), EvArg::Value(encode(*n))])
            }
            (ValueKind::Integer | ValueKind::Float, Operand::Storage(src, from))
                if src.is_numeric() =>
            {
                EvCmd::new(opcode::LDWK, vec![EvArg::Work(slot), EvArg::Work(*from)])
            }
            (ValueKind::Flag, Operand::Bool(b)) => {
                let op = if *b { opcode::FLAG_SET } else { opcode::FLAG_RESET };
                EvCmd::new(op, vec![EvArg::Flag(slot)])
            }
            (ValueKind::SysFlag, Operand::Bool(b)) => {
                let op = if *b {
                    opcode::SYSFLAG_SET
                } else {
                    opcode::SYSFLAG_RESET
                };
                EvCmd::new(op, vec![EvArg::SysFlag(slot)])
            }
            (ValueKind::Boolean, _) => {
                return Err(self.error(
                    CompileErrorKind::UnsupportedConstruct,
                    "`bool` values cannot be stored; use `flag` or `sysflag`",
                    span,
                ));
            }
            (ValueKind::String | ValueKind::NumberEnum, _) => {
                return Err(self.error(
                    CompileErrorKind::UnsupportedConstruct,
                    format!("`{kind}` values cannot be stored"),
                    span,
                ));
            }
            _ => {
                return Err(self.error(
                    CompileErrorKind::TypeMismatch,
                    format!("Cannot store a {} into `{kind}` storage", operand.describe()),
                    span,
                ));
            }
        };
        self.labels.push(label, cmd);
        Ok(())
    }
}

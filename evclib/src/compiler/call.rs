use crate::ast::CallExpr;
use crate::bytecode::registers::SCWK_ANSWER;
use crate::bytecode::{EvArg, EvCmd, opcode};
use crate::diagnostic::Span;
use crate::error::{CompileErrorKind, CompileResult};
use crate::symbol::{ArgDescriptor, ArgStorage, Callee, Command, Function, ValueKind, Variable};

use super::CompilationContext;
use super::operand::Operand;

#[derive(Debug, Clone)]
pub(super) enum CallDest {
    // a command result still lands in SCWK_ANSWER
    Discard,
    Into(Variable),
    Answer,
}

enum Resolved {
    Command(Command),
    Function(Function),
}

impl Resolved {
    fn name(&self) -> &str {
        match self {
            Resolved::Command(cmd) => &cmd.name,
            Resolved::Function(func) => &func.name,
        }
    }

    fn ret(&self) -> Option<&ArgDescriptor> {
        match self {
            Resolved::Command(cmd) => cmd.ret.as_ref(),
            Resolved::Function(func) => func.ret.as_ref(),
        }
    }

    fn params(&self) -> Vec<&ArgDescriptor> {
        let args = match self {
            Resolved::Command(cmd) => &cmd.args,
            Resolved::Function(func) => &func.args,
        };
        args.iter().filter(|a| !a.is_return_slot()).collect()
    }
}

impl CompilationContext<'_> {
    pub(super) fn lower_call(&mut self, call: &CallExpr, dest: &CallDest, label: u32) -> CompileResult<()> {
        let resolved = match self.scopes.resolve_callee(&call.callee.parts) {
            Some(Callee::Command(cmd)) => Resolved::Command(cmd.clone()),
            Some(Callee::Function(func)) => Resolved::Function(func.clone()),
            None => {
                return Err(self.error(
                    CompileErrorKind::UnresolvedSymbol,
                    format!("Unknown command or function `{}`", call.callee.text()),
                    call.callee.span,
                ));
            }
        };
        self.check_return(&resolved, dest, call.span)?;

        let params = resolved.params();
        if params.len() != call.args.len() {
            return Err(self.error(
                CompileErrorKind::TypeMismatch,
                format!(
                    "`{}` expects {} argument(s), found {}",
                    resolved.name(),
                    params.len(),
                    call.args.len()
                ),
                call.span,
            ));
        }

        match &resolved {
            Resolved::Command(cmd) => self.lower_command_call(cmd, call, dest, label),
            Resolved::Function(func) => self.lower_function_call(func, call, dest, label),
        }
    }

    fn check_return(&self, callee: &Resolved, dest: &CallDest, span: Span) -> CompileResult<()> {
        let Some(ret) = callee.ret() else {
            return Ok(());
        };
        let ok = match dest {
            CallDest::Discard => true,
            CallDest::Into(var) => var.kind == ret.kind,
            CallDest::Answer => ret.kind.is_numeric(),
        };
        if ok {
            return Ok(());
        }
        let expected = match dest {
            CallDest::Into(var) => var.kind.to_string(),
            _ => "a number".to_string(),
        };
        Err(self.error(
            CompileErrorKind::TypeMismatch,
            format!("`{}` returns `{}`, expected {expected}", callee.name(), ret.kind),
            span,
        ))
    }

    fn lower_command_call(
        &mut self,
        cmd: &Command,
        call: &CallExpr,
        dest: &CallDest,
        label: u32,
    ) -> CompileResult<()> {
        let params = cmd.args.iter().filter(|a| !a.is_return_slot());
        let mut args = Vec::with_capacity(call.args.len() + 1);
        for (expr, desc) in call.args.iter().zip(params) {
            let operand = self.operand(expr)?;
            self.check_command_arg(cmd, desc, &operand, expr.span)?;
            args.push(self.operand_arg(operand, expr.span)?);
        }

        let ret_arg = match dest {
            CallDest::Into(var) => {
                let Some(slot) = var.storage else {
                    return Err(self.error(
                        CompileErrorKind::UnsupportedConstruct,
                        format!("Variable `{}` has no storage", var.name),
                        call.span,
                    ));
                };
                self.storage_arg(var.kind, slot, call.span)?
            }
            CallDest::Discard | CallDest::Answer => EvArg::Work(SCWK_ANSWER),
        };
        let at = cmd
            .args
            .iter()
            .position(ArgDescriptor::is_return_slot)
            .unwrap_or(0)
            .min(args.len());
        args.insert(at, ret_arg);

        self.labels.push(label, EvCmd::new(cmd.opcode, args));
        Ok(())
    }

    // strings go only to `str` parameters and vice versa
    fn check_command_arg(
        &self,
        cmd: &Command,
        desc: &ArgDescriptor,
        operand: &Operand,
        span: Span,
    ) -> CompileResult<()> {
        let is_text = matches!(operand, Operand::Text(_));
        if is_text == (desc.kind == ValueKind::String) {
            return Ok(());
        }
        Err(self.error(
            CompileErrorKind::TypeMismatch,
            format!(
                "Argument `{}` of `{}` is `{}`",
                desc.name, cmd.name, desc.type_name
            ),
            span,
        ))
    }

    fn lower_function_call(
        &mut self,
        func: &Function,
        call: &CallExpr,
        dest: &CallDest,
        label: u32,
    ) -> CompileResult<()> {
        if !matches!(dest, CallDest::Discard) {
            return Err(self.error(
                CompileErrorKind::UnsupportedConstruct,
                format!("Function `{}` cannot be used as a value", func.name),
                call.span,
            ));
        }
        let params = func.args.iter().filter(|a| !a.is_return_slot());
        for (expr, desc) in call.args.iter().zip(params) {
            let Some(ArgStorage::Fixed(slot)) = desc.storage else {
                return Err(self.error(
                    CompileErrorKind::UnsupportedConstruct,
                    format!("Parameter `{}` of `{}` has no storage", desc.name, func.name),
                    expr.span,
                ));
            };
            let operand = self.operand(expr)?;
            self.emit_store(label, desc.kind, slot, operand, expr.span)?;
        }
        let target = self.labels.intern(&func.label);
        self.labels
            .push(label, EvCmd::new(opcode::CALL, vec![EvArg::String(target)]));
        Ok(())
    }
}

use tracing::warn;

use crate::ast::{Assign, AssignOp, Expr, ExprKind};
use crate::error::{CompileErrorKind, CompileResult};
use crate::symbol::Variable;

use super::CompilationContext;
use super::call::CallDest;

impl CompilationContext<'_> {
    pub(super) fn open_assign(&mut self, assign: &Assign) -> CompileResult<()> {
        let Some(label) = self.current_label() else {
            return Ok(());
        };
        let var = self.lookup_variable(&assign.target.parts, assign.target.span)?;
        if var.is_const {
            return Err(self.error(
                CompileErrorKind::TypeMismatch,
                format!("Cannot assign to const `{}`", var.name),
                assign.span,
            ));
        }
        if assign.op != AssignOp::Set {
            warn!(
                variable = %var.name,
                op = assign.op.symbol(),
                line = assign.span.line,
                "compound assignment is not supported; statement skipped"
            );
            self.skip_calls = true;
            return Ok(());
        }
        self.lower_rhs(var, &assign.value, label)
    }

    pub(super) fn lower_rhs(&mut self, target: Variable, value: &Expr, label: u32) -> CompileResult<()> {
        if let ExprKind::Call(_) = &value.kind {
            self.call_dest = CallDest::Into(target);
            return Ok(());
        }
        let Some(slot) = target.storage else {
            return Err(self.error(
                CompileErrorKind::UnsupportedConstruct,
                format!("Variable `{}` has no storage", target.name),
                value.span,
            ));
        };
        let operand = self.operand(value)?;
        self.emit_store(label, target.kind, slot, operand, value.span)
    }
}

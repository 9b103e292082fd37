use tracing::warn;

use crate::ast::{Comparison, ExprKind};
use crate::bytecode::registers::SCWK_ANSWER;
use crate::bytecode::{EvArg, EvCmd, encode, opcode};
use crate::error::CompileResult;

use super::CompilationContext;
use super::call::CallDest;
use super::operand::Operand;

// Each `if`/`elif` arm fills a fresh child of the current label, reached by
// a conditional jump from it. An `else` body falls through in the current
// label. Once the statement closes, the enclosing block continues in one more
// child ("after"). Arm bodies never jump to it.
impl CompilationContext<'_> {
    pub(super) fn open_branch(&mut self) {
        if let Some(label) = self.current_label() {
            self.pending_branch = Some(self.labels.new_child_label(label));
        }
    }

    pub(super) fn close_if(&mut self) {
        if let Some(top) = self.current_label() {
            let after = self.labels.new_child_label(top);
            if let Some(frame) = self.frames.last_mut() {
                frame.label = after;
            }
        }
    }

    pub(super) fn open_comparison(&mut self, cmp: &Comparison) -> CompileResult<()> {
        self.jump = None;
        let right = match &cmp.right.kind {
            ExprKind::Call(_) => None,
            _ => match self.operand(&cmp.right)? {
                Operand::Number(n) => Some(encode(n)),
                _ => None,
            },
        };
        let Some(right) = right else {
            warn!(line = cmp.span.line, "comparison right side must be a number; branch not lowered");
            self.skip_calls = true;
            return Ok(());
        };

        let left = match &cmp.left.kind {
            ExprKind::Call(_) => {
                self.call_dest = CallDest::Answer;
                Some(EvArg::Work(SCWK_ANSWER))
            }
            _ => match self.operand(&cmp.left)? {
                Operand::Storage(kind, slot) if kind.is_numeric() => Some(EvArg::Work(slot)),
                _ => None,
            },
        };
        match left {
            Some(left) => self.jump = Some((left, right)),
            None => warn!(
                line = cmp.span.line,
                "comparison left side must be a numeric variable or call; branch not lowered"
            ),
        }
        Ok(())
    }

    // runs after a call on the left has been lowered into SCWK_ANSWER
    pub(super) fn close_comparison(&mut self, cmp: &Comparison) {
        self.call_dest = CallDest::Discard;
        self.skip_calls = false;
        let (Some((left, right)), Some(target), Some(label)) =
            (self.jump.take(), self.pending_branch, self.current_label())
        else {
            return;
        };
        let mnemonic = self.labels.intern(cmp.op.mnemonic());
        let cmd = EvCmd::new(
            opcode::IFVAL_JUMP,
            vec![left, EvArg::String(mnemonic), EvArg::Value(right), EvArg::String(target)],
        );
        self.labels.push(label, cmd);
    }
}

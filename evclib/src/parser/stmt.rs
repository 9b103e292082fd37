use crate::ast::{
    Assign, AssignOp, Block, CallExpr, Comparator, Comparison, CondBranch, Expr, ExprKind,
    IfBlock, QualName, Stmt,
};
use crate::token::TokenKind;

use super::{Parser, unescape};

impl Parser {
    pub(super) fn parse_block(&mut self, open_err: &str) -> Option<Block> {
        let open = self.expect(TokenKind::LBrace, open_err)?;
        let mut stmts = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize_stmt(),
            }
        }
        let close = self.expect(TokenKind::RBrace, "Expected `}` after block")?;
        Some(Block {
            stmts,
            span: open.span.merge(close.span),
        })
    }

    fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.current().kind {
            TokenKind::KwConst => return self.parse_var_decl().map(Stmt::Var),
            kind if kind.is_type() => return self.parse_var_decl().map(Stmt::Var),
            TokenKind::LBrace => return self.parse_block("Expected `{`").map(Stmt::Block),
            TokenKind::KwIf => return self.parse_if().map(Stmt::If),
            TokenKind::Ident => {}
            _ => {
                self.error_here_expected("Expected statement");
                self.bump();
                return None;
            }
        }

        // `Named x ...` declares a variable of a user-named type.
        if self.peek_kind(1) == TokenKind::Ident {
            return self.parse_var_decl().map(Stmt::Var);
        }

        let name = self.expect_qual_name("Expected identifier")?;
        if self.at(TokenKind::LParen) {
            let call = self.parse_call_rest(name)?;
            self.expect(TokenKind::Semi, "Expected `;` after call")?;
            return Some(Stmt::Call(call));
        }

        let op = match self.current().kind {
            TokenKind::Assign => AssignOp::Set,
            TokenKind::PlusAssign => AssignOp::Add,
            TokenKind::MinusAssign => AssignOp::Sub,
            TokenKind::StarAssign => AssignOp::Mul,
            TokenKind::SlashAssign => AssignOp::Div,
            _ => {
                self.error_here_expected("Expected `(` or an assignment operator after identifier");
                return None;
            }
        };
        self.bump();
        let value = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi, "Expected `;` after assignment")?;
        let span = name.span.merge(end.span);
        Some(Stmt::Assign(Assign {
            target: name,
            op,
            value,
            span,
        }))
    }

    fn parse_if(&mut self) -> Option<IfBlock> {
        let start = self.expect(TokenKind::KwIf, "Expected `if`")?;
        let mut branches = Vec::new();
        let cond = self.parse_comparison()?;
        let body = self.parse_block("Expected `{` before if body")?;
        let mut span = start.span.merge(body.span);
        branches.push(CondBranch { cond, body });

        while self.at(TokenKind::KwElif) {
            self.bump();
            let cond = self.parse_comparison()?;
            let body = self.parse_block("Expected `{` before elif body")?;
            span = span.merge(body.span);
            branches.push(CondBranch { cond, body });
        }

        let else_body = if self.at(TokenKind::KwElse) {
            self.bump();
            let body = self.parse_block("Expected `{` before else body")?;
            span = span.merge(body.span);
            Some(body)
        } else {
            None
        };

        Some(IfBlock {
            branches,
            else_body,
            span,
        })
    }

    fn parse_comparison(&mut self) -> Option<Comparison> {
        let left = self.parse_expr()?;
        let op = match self.current().kind {
            TokenKind::EqEq => Comparator::Eq,
            TokenKind::Neq => Comparator::Ne,
            TokenKind::Lte => Comparator::Le,
            TokenKind::Gte => Comparator::Ge,
            TokenKind::Lt => Comparator::Lt,
            TokenKind::Gt => Comparator::Gt,
            _ => {
                self.error_here_expected("Expected comparison operator");
                return None;
            }
        };
        self.bump();
        let right = self.parse_expr()?;
        let span = left.span.merge(right.span);
        Some(Comparison {
            left,
            op,
            right,
            span,
        })
    }

    pub(super) fn parse_expr(&mut self) -> Option<Expr> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Minus | TokenKind::Number => {
                let negative = if self.at(TokenKind::Minus) {
                    self.bump();
                    true
                } else {
                    false
                };
                let num = self.expect(TokenKind::Number, "Expected number after `-`")?;
                let Ok(value) = num.lexeme.parse::<f64>() else {
                    self.diagnostics
                        .error(format!("Invalid number literal `{}`", num.lexeme), num.span);
                    return None;
                };
                Some(Expr {
                    kind: ExprKind::Number(if negative { -value } else { value }),
                    span: tok.span.merge(num.span),
                })
            }
            TokenKind::StringLit => {
                self.bump();
                let raw = &tok.lexeme[1..tok.lexeme.len() - 1];
                let text = match unescape(raw) {
                    Ok(text) => text,
                    Err(escape) => {
                        self.diagnostics.error(
                            format!("Invalid escape sequence `{escape}` in string literal"),
                            tok.span,
                        );
                        return None;
                    }
                };
                Some(Expr {
                    kind: ExprKind::Str(text),
                    span: tok.span,
                })
            }
            TokenKind::KwTrue | TokenKind::KwFalse => {
                self.bump();
                Some(Expr {
                    kind: ExprKind::Bool(tok.kind == TokenKind::KwTrue),
                    span: tok.span,
                })
            }
            TokenKind::Ident => {
                let name = self.expect_qual_name("Expected identifier")?;
                if self.at(TokenKind::LParen) {
                    let call = self.parse_call_rest(name)?;
                    let span = call.span;
                    return Some(Expr {
                        kind: ExprKind::Call(call),
                        span,
                    });
                }
                let span = name.span;
                Some(Expr {
                    kind: ExprKind::Name(name),
                    span,
                })
            }
            _ => {
                self.error_here_expected("Expected expression");
                None
            }
        }
    }

    fn parse_call_rest(&mut self, callee: QualName) -> Option<CallExpr> {
        self.expect(TokenKind::LParen, "Expected `(` after callee")?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                if self.at(TokenKind::Comma) {
                    self.error_here_expected("Expected expression before `,` in call");
                    return None;
                }
                args.push(self.parse_expr()?);
                if self.at(TokenKind::Comma) {
                    self.bump();
                    if self.at(TokenKind::RParen) {
                        self.error_here_expected("Trailing comma is not allowed in call arguments");
                        return None;
                    }
                    continue;
                }
                break;
            }
        }
        let close = self.expect(TokenKind::RParen, "Expected `)` after call arguments")?;
        let span = callee.span.merge(close.span);
        Some(CallExpr { callee, args, span })
    }
}

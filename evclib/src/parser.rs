use crate::ast::{Program, QualName, TypeRef};
use crate::diagnostic::DiagnosticBag;
use crate::lexer::lex;
use crate::token::{Token, TokenKind};

mod decl;
mod stmt;

#[derive(Debug, Clone)]
pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
    diagnostics: DiagnosticBag,
}

impl Parser {
    pub fn parse_source(source: &str) -> (Program, DiagnosticBag) {
        let (tokens, mut diagnostics) = lex(source);
        let mut parser = Parser {
            tokens,
            idx: 0,
            diagnostics: DiagnosticBag::new(),
        };
        let program = parser.parse_program();
        diagnostics.extend(parser.diagnostics);
        (program, diagnostics)
    }

    fn parse_program(&mut self) -> Program {
        let entries = self.parse_entries(TokenKind::Eof);
        Program { entries }
    }

    fn expect_qual_name(&mut self, message: &str) -> Option<QualName> {
        let first = self.expect_ident(message)?;
        let mut span = first.span;
        let mut parts = vec![first.lexeme];
        while self.at(TokenKind::ColonColon) {
            self.bump();
            let part = self.expect_ident("Expected identifier after `::`")?;
            span = span.merge(part.span);
            parts.push(part.lexeme);
        }
        Some(QualName { parts, span })
    }

    fn expect_type(&mut self, message: &str) -> Option<TypeRef> {
        let ty = match self.current().kind {
            TokenKind::TyFlag => TypeRef::Flag,
            TokenKind::TySysFlag => TypeRef::SysFlag,
            TokenKind::TyInt => TypeRef::Int,
            TokenKind::TyFloat => TypeRef::Float,
            TokenKind::TyBool => TypeRef::Bool,
            TokenKind::TyStr => TypeRef::Str,
            TokenKind::Ident => TypeRef::Named(self.current().lexeme.clone()),
            _ => {
                self.error_here_expected(message);
                return None;
            }
        };
        self.bump();
        Some(ty)
    }

    fn expect_integer(&mut self, message: &str) -> Option<i64> {
        let negative = if self.at(TokenKind::Minus) {
            self.bump();
            true
        } else {
            false
        };
        if !self.at(TokenKind::Number) {
            self.error_here_expected(message);
            return None;
        }
        let tok = self.bump();
        match tok.lexeme.parse::<i64>() {
            Ok(v) if negative => Some(-v),
            Ok(v) => Some(v),
            Err(_) => {
                self.diagnostics.error(
                    format!("{message}; found non-integer `{}`", tok.lexeme),
                    tok.span,
                );
                None
            }
        }
    }

    fn expect_ident(&mut self, message: &str) -> Option<Token> {
        if self.at(TokenKind::Ident) {
            return Some(self.bump());
        }
        self.error_here_expected(message);
        None
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        if self.at(kind) {
            return Some(self.bump());
        }
        self.error_here_expected(message);
        None
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[(self.idx + offset).min(last)].kind
    }

    fn current(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.idx.min(last)]
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
        token
    }

    fn synchronize_stmt(&mut self) {
        while !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Semi) {
                self.bump();
                return;
            }
            if self.at(TokenKind::RBrace) {
                return;
            }
            match self.current().kind {
                TokenKind::KwConst | TokenKind::KwIf => return,
                kind if kind.is_type() => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn synchronize_toplevel(&mut self) {
        while !self.at(TokenKind::Eof) {
            match self.current().kind {
                TokenKind::KwImport
                | TokenKind::KwFrom
                | TokenKind::KwNamespace
                | TokenKind::KwCommand
                | TokenKind::KwFunc
                | TokenKind::KwConst => return,
                TokenKind::RBrace => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn error_here_expected(&mut self, message: &str) {
        let found = match self.current().kind {
            TokenKind::Eof => "EOF".to_string(),
            _ => format!("`{}`", self.current().lexeme),
        };
        self.diagnostics
            .error(format!("{message}; found {found}"), self.current().span);
    }
}

pub(crate) fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let decoded = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some(c @ ('"' | '\'' | '\\')) => c,
            Some(other) => return Err(format!("\\{other}")),
            None => return Err("\\".to_string()),
        };
        out.push(decoded);
    }
    Ok(out)
}

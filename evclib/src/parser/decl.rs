use crate::ast::{
    ArgDecl, CommandDecl, Entry, FunctionDecl, ImportDecl, ImportKind, NamespaceDecl,
    SpecifierKw, StorageRef, TypeRef, VarDecl,
};
use crate::token::TokenKind;

use super::Parser;

impl Parser {
    pub(super) fn parse_entries(&mut self, terminator: TokenKind) -> Vec<Entry> {
        let mut entries = Vec::new();
        while !self.at(terminator) && !self.at(TokenKind::Eof) {
            let parsed = match self.current().kind {
                TokenKind::KwImport => self.parse_import().map(Entry::Import),
                TokenKind::KwFrom => self.parse_from_import().map(Entry::Import),
                TokenKind::KwNamespace => self.parse_namespace().map(Entry::Namespace),
                TokenKind::KwCommand => self.parse_command().map(Entry::Command),
                TokenKind::KwFunc => self.parse_function().map(Entry::Function),
                TokenKind::KwConst | TokenKind::Ident => self.parse_var_decl().map(Entry::Variable),
                kind if kind.is_type() => self.parse_var_decl().map(Entry::Variable),
                _ => {
                    self.error_here_expected(
                        "Expected top-level declaration (`import`, `from`, `namespace`, `command`, `func` or a variable)",
                    );
                    self.bump();
                    None
                }
            };
            match parsed {
                Some(entry) => entries.push(entry),
                None => self.synchronize_toplevel(),
            }
        }
        entries
    }

    fn parse_import(&mut self) -> Option<ImportDecl> {
        let start = self.expect(TokenKind::KwImport, "Expected `import`")?;
        let module = self.expect_ident("Expected module name after `import`")?;
        let end = self.expect(TokenKind::Semi, "Expected `;` after import")?;
        Some(ImportDecl {
            module: module.lexeme,
            kind: ImportKind::Module,
            span: start.span.merge(end.span),
        })
    }

    fn parse_from_import(&mut self) -> Option<ImportDecl> {
        let start = self.expect(TokenKind::KwFrom, "Expected `from`")?;
        let module = self.expect_ident("Expected module name after `from`")?;
        self.expect(TokenKind::KwImport, "Expected `import` after module name")?;
        let kind = if self.at(TokenKind::Star) {
            self.bump();
            ImportKind::Wildcard
        } else {
            self.expect(TokenKind::LBrace, "Expected `*` or `{` after `import`")?;
            let mut names = Vec::new();
            loop {
                let name = self.expect_ident("Expected imported name")?;
                names.push(name.lexeme);
                if self.at(TokenKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
            self.expect(TokenKind::RBrace, "Expected `}` after imported names")?;
            ImportKind::Names(names)
        };
        let end = self.expect(TokenKind::Semi, "Expected `;` after import")?;
        Some(ImportDecl {
            module: module.lexeme,
            kind,
            span: start.span.merge(end.span),
        })
    }

    fn parse_namespace(&mut self) -> Option<NamespaceDecl> {
        let start = self.expect(TokenKind::KwNamespace, "Expected `namespace`")?;
        let name = self.expect_ident("Expected namespace name")?;
        self.expect(TokenKind::LBrace, "Expected `{` after namespace name")?;
        let entries = self.parse_entries(TokenKind::RBrace);
        let end = self.expect(TokenKind::RBrace, "Expected `}` after namespace body")?;
        Some(NamespaceDecl {
            name: name.lexeme,
            entries,
            span: start.span.merge(end.span),
        })
    }

    fn parse_command(&mut self) -> Option<CommandDecl> {
        let start = self.expect(TokenKind::KwCommand, "Expected `command`")?;
        let name = self.expect_qual_name("Expected command name after `command`")?;
        self.expect(TokenKind::LParen, "Expected `(` after command name")?;
        let opcode = self.expect_integer("Expected integer opcode")?;
        let mut args = Vec::new();
        while self.at(TokenKind::Comma) {
            self.bump();
            args.push(self.parse_arg_decl()?);
        }
        self.expect(TokenKind::RParen, "Expected `)` after command arguments")?;
        let ret = self.parse_return_type()?;
        let end = self.expect(TokenKind::Semi, "Expected `;` after command declaration")?;
        Some(CommandDecl {
            name,
            opcode,
            args,
            ret,
            span: start.span.merge(end.span),
        })
    }

    fn parse_function(&mut self) -> Option<FunctionDecl> {
        let start = self.expect(TokenKind::KwFunc, "Expected `func`")?;
        let specifier = match self.current().kind {
            TokenKind::KwEntry => {
                self.bump();
                Some(SpecifierKw::Entry)
            }
            TokenKind::KwCommon => {
                self.bump();
                Some(SpecifierKw::Common)
            }
            _ => None,
        };
        let name = self.expect_qual_name("Expected function name after `func`")?;
        self.expect(TokenKind::LParen, "Expected `(` after function name")?;
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_arg_decl()?);
                if self.at(TokenKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, "Expected `)` after function arguments")?;
        let ret = self.parse_return_type()?;
        let body = self.parse_block("Expected `{` before function body")?;
        let span = start.span.merge(body.span);
        Some(FunctionDecl {
            specifier,
            name,
            args,
            ret,
            body,
            span,
        })
    }

    fn parse_return_type(&mut self) -> Option<Option<TypeRef>> {
        if !self.at(TokenKind::Arrow) {
            return Some(None);
        }
        self.bump();
        self.expect_type("Expected return type after `->`").map(Some)
    }

    fn parse_arg_decl(&mut self) -> Option<ArgDecl> {
        let start = self.current().span;
        let ty = self.expect_type("Expected argument type")?;
        let name = self.expect_ident("Expected argument name")?;
        let mut span = start.merge(name.span);
        let storage = if self.at(TokenKind::At) {
            self.bump();
            if self.at(TokenKind::KwReturn) {
                span = span.merge(self.bump().span);
                Some(StorageRef::Return)
            } else {
                let slot_span = self.current().span;
                let slot = self.expect_integer("Expected storage slot or `return` after `@`")?;
                span = span.merge(slot_span);
                Some(StorageRef::Slot(slot))
            }
        } else {
            None
        };
        Some(ArgDecl {
            ty,
            name: name.lexeme,
            storage,
            span,
        })
    }

    pub(super) fn parse_var_decl(&mut self) -> Option<VarDecl> {
        let start = self.current().span;
        let is_const = if self.at(TokenKind::KwConst) {
            self.bump();
            true
        } else {
            false
        };
        let ty = self.expect_type("Expected variable type")?;
        let name = self.expect_qual_name("Expected variable name")?;
        let storage = if self.at(TokenKind::At) {
            self.bump();
            Some(self.expect_integer("Expected storage slot after `@`")?)
        } else {
            None
        };
        let value = if self.at(TokenKind::Assign) {
            self.bump();
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.expect(TokenKind::Semi, "Expected `;` after variable declaration")?;
        Some(VarDecl {
            is_const,
            ty,
            name,
            storage,
            value,
            span: start.merge(end.span),
        })
    }
}

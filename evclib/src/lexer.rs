use crate::diagnostic::{DiagnosticBag, Span, Stage};
use crate::token::{Token, TokenKind};

pub fn lex(source: &str) -> (Vec<Token>, DiagnosticBag) {
    let mut lexer = Lexer::new(source);
    while lexer.skip_trivia() {
        lexer.lex_token();
    }
    let eof = lexer.mark().span_to(lexer.idx);
    lexer.tokens.push(Token::new(TokenKind::Eof, "", eof));
    (lexer.tokens, lexer.diagnostics)
}

#[derive(Clone, Copy)]
struct Mark {
    idx: usize,
    line: usize,
    col: usize,
}

impl Mark {
    fn span_to(self, end: usize) -> Span {
        Span::new(self.idx, end, self.line, self.col)
    }
}

struct Lexer {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    diagnostics: DiagnosticBag,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            idx: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            diagnostics: DiagnosticBag::for_stage(Stage::Lex),
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            idx: self.idx,
            line: self.line,
            col: self.col,
        }
    }

    fn lex_token(&mut self) {
        let at = self.mark();
        let Some(c) = self.bump() else {
            return;
        };

        if c == '_' || c.is_ascii_alphabetic() {
            self.eat_while(|ch| ch == '_' || ch.is_ascii_alphanumeric());
            let kind = TokenKind::keyword(&self.text_from(at)).unwrap_or(TokenKind::Ident);
            self.emit(kind, at);
            return;
        }
        if c.is_ascii_digit() {
            self.lex_number(at);
            return;
        }

        match c {
            '"' | '\'' => self.lex_string(c, at),
            '(' => self.emit(TokenKind::LParen, at),
            ')' => self.emit(TokenKind::RParen, at),
            '{' => self.emit(TokenKind::LBrace, at),
            '}' => self.emit(TokenKind::RBrace, at),
            ',' => self.emit(TokenKind::Comma, at),
            ';' => self.emit(TokenKind::Semi, at),
            '@' => self.emit(TokenKind::At, at),
            ':' => self.require_second(':', TokenKind::ColonColon, at, "Unexpected ':'. Did you mean '::'?"),
            '+' => self.require_second(
                '=',
                TokenKind::PlusAssign,
                at,
                "Unexpected '+'. Arithmetic is not supported; did you mean '+='?",
            ),
            '/' => self.require_second('=', TokenKind::SlashAssign, at, "Unexpected '/'. Did you mean '/='?"),
            '!' => self.require_second('=', TokenKind::Neq, at, "Unexpected '!'. Did you mean '!='?"),
            '*' => self.with_eq(TokenKind::Star, TokenKind::StarAssign, at),
            '=' => self.with_eq(TokenKind::Assign, TokenKind::EqEq, at),
            '<' => self.with_eq(TokenKind::Lt, TokenKind::Lte, at),
            '>' => self.with_eq(TokenKind::Gt, TokenKind::Gte, at),
            '-' => {
                let kind = if self.eat('>') {
                    TokenKind::Arrow
                } else if self.eat('=') {
                    TokenKind::MinusAssign
                } else {
                    TokenKind::Minus
                };
                self.emit(kind, at);
            }
            _ => self
                .diagnostics
                .error(format!("Unexpected character '{c}'"), at.span_to(self.idx)),
        }
    }

    fn with_eq(&mut self, plain: TokenKind, with_eq: TokenKind, at: Mark) {
        let kind = if self.eat('=') { with_eq } else { plain };
        self.emit(kind, at);
    }

    fn require_second(&mut self, second: char, kind: TokenKind, at: Mark, message: &str) {
        if self.eat(second) {
            self.emit(kind, at);
        } else {
            self.diagnostics.error(message, at.span_to(self.idx));
        }
    }

    fn lex_number(&mut self, at: Mark) {
        self.eat_while(|ch| ch.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|ch| ch.is_ascii_digit()) {
            self.bump();
            self.eat_while(|ch| ch.is_ascii_digit());
        }
        self.emit(TokenKind::Number, at);
    }

    fn lex_string(&mut self, quote: char, at: Mark) {
        loop {
            match self.peek() {
                Some(ch) if ch == quote => {
                    self.bump();
                    self.emit(TokenKind::StringLit, at);
                    return;
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some('\n') | None => break,
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.diagnostics
            .error("Unterminated string literal", at.span_to(self.idx));
    }

    fn skip_trivia(&mut self) -> bool {
        loop {
            self.eat_while(char::is_whitespace);
            match (self.peek(), self.peek_at(1)) {
                (Some('/'), Some('/')) => self.eat_while(|ch| ch != '\n'),
                (Some('/'), Some('*')) => self.skip_block_comment(),
                (None, _) => return false,
                _ => return true,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let at = self.mark();
        self.bump();
        self.bump();
        while self.peek().is_some() {
            if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                self.bump();
                self.bump();
                return;
            }
            self.bump();
        }
        self.diagnostics
            .error("Unterminated block comment", at.span_to(self.idx));
    }

    fn emit(&mut self, kind: TokenKind, at: Mark) {
        let lexeme = self.text_from(at);
        self.tokens
            .push(Token::new(kind, lexeme, at.span_to(self.idx)));
    }

    fn text_from(&self, at: Mark) -> String {
        self.chars[at.idx..self.idx].iter().collect()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            return true;
        }
        false
    }

    fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while self.peek().is_some_and(&mut pred) {
            self.bump();
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = *self.chars.get(self.idx)?;
        self.idx += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.idx + offset).copied()
    }
}

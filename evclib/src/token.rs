use crate::diagnostic::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Ident,
    Number,
    StringLit,
    KwImport,
    KwFrom,
    KwNamespace,
    KwCommand,
    KwFunc,
    KwEntry,
    KwCommon,
    KwConst,
    KwReturn,
    KwIf,
    KwElif,
    KwElse,
    KwTrue,
    KwFalse,
    TyFlag,
    TySysFlag,
    TyInt,
    TyFloat,
    TyBool,
    TyStr,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,
    ColonColon,
    At,
    Star,
    Arrow,
    Minus,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    EqEq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("import", TokenKind::KwImport),
    ("from", TokenKind::KwFrom),
    ("namespace", TokenKind::KwNamespace),
    ("command", TokenKind::KwCommand),
    ("func", TokenKind::KwFunc),
    ("entry", TokenKind::KwEntry),
    ("common", TokenKind::KwCommon),
    ("const", TokenKind::KwConst),
    ("return", TokenKind::KwReturn),
    ("if", TokenKind::KwIf),
    ("elif", TokenKind::KwElif),
    ("else", TokenKind::KwElse),
    ("true", TokenKind::KwTrue),
    ("false", TokenKind::KwFalse),
    ("flag", TokenKind::TyFlag),
    ("sysflag", TokenKind::TySysFlag),
    ("int", TokenKind::TyInt),
    ("float", TokenKind::TyFloat),
    ("bool", TokenKind::TyBool),
    ("str", TokenKind::TyStr),
];

impl TokenKind {
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            TokenKind::TyFlag
                | TokenKind::TySysFlag
                | TokenKind::TyInt
                | TokenKind::TyFloat
                | TokenKind::TyBool
                | TokenKind::TyStr
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }
}

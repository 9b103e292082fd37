use evclib::lexer::lex;
use evclib::token::TokenKind;

fn kinds(src: &str) -> Vec<TokenKind> {
    let (tokens, diags) = lex(src);
    assert!(
        diags.is_empty(),
        "expected no diagnostics, got: {:?}",
        diags.as_slice()
    );
    tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_keywords_and_types() {
    let got = kinds(
        "import from namespace command func entry common const return if elif else true false flag sysflag int float bool str",
    );
    let want = vec![
        TokenKind::KwImport,
        TokenKind::KwFrom,
        TokenKind::KwNamespace,
        TokenKind::KwCommand,
        TokenKind::KwFunc,
        TokenKind::KwEntry,
        TokenKind::KwCommon,
        TokenKind::KwConst,
        TokenKind::KwReturn,
        TokenKind::KwIf,
        TokenKind::KwElif,
        TokenKind::KwElse,
        TokenKind::KwTrue,
        TokenKind::KwFalse,
        TokenKind::TyFlag,
        TokenKind::TySysFlag,
        TokenKind::TyInt,
        TokenKind::TyFloat,
        TokenKind::TyBool,
        TokenKind::TyStr,
        TokenKind::Eof,
    ];
    assert_eq!(got, want);
}

#[test]
fn lexes_operators_and_punctuation() {
    let got = kinds("( ) { } , ; :: @ * -> - = += -= *= /= == != < <= > >=");
    let want = vec![
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::Comma,
        TokenKind::Semi,
        TokenKind::ColonColon,
        TokenKind::At,
        TokenKind::Star,
        TokenKind::Arrow,
        TokenKind::Minus,
        TokenKind::Assign,
        TokenKind::PlusAssign,
        TokenKind::MinusAssign,
        TokenKind::StarAssign,
        TokenKind::SlashAssign,
        TokenKind::EqEq,
        TokenKind::Neq,
        TokenKind::Lt,
        TokenKind::Lte,
        TokenKind::Gt,
        TokenKind::Gte,
        TokenKind::Eof,
    ];
    assert_eq!(got, want);
}

#[test]
fn lexes_numbers_with_optional_fraction() {
    let (tokens, diags) = lex("5 3.25 42");
    assert!(diags.is_empty());
    let numbers: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Number)
        .map(|t| t.lexeme.as_str())
        .collect();
    assert_eq!(numbers, vec!["5", "3.25", "42"]);
}

#[test]
fn lexes_strings_with_either_quote() {
    let (tokens, diags) = lex(r#"'single' "double" 'it\'s'"#);
    assert!(diags.is_empty(), "{:?}", diags.as_slice());
    let strings: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringLit)
        .map(|t| t.lexeme.as_str())
        .collect();
    assert_eq!(strings, vec!["'single'", "\"double\"", r"'it\'s'"]);
}

#[test]
fn skips_line_and_block_comments() {
    let got = kinds("int // trailing\n/* block\n comment */ x");
    assert_eq!(got, vec![TokenKind::TyInt, TokenKind::Ident, TokenKind::Eof]);
}

#[test]
fn tracks_line_and_column() {
    let (tokens, _) = lex("func\n  bar");
    assert_eq!((tokens[0].span.line, tokens[0].span.col), (1, 1));
    assert_eq!((tokens[1].span.line, tokens[1].span.col), (2, 3));
}

#[test]
fn reports_unterminated_string() {
    let (_tokens, diags) = lex("'open");
    assert_eq!(diags.len(), 1);
    assert!(diags.as_slice()[0].message.contains("Unterminated string"));
}

#[test]
fn reports_unterminated_block_comment() {
    let (_tokens, diags) = lex("/* never closed");
    assert!(diags.as_slice()[0].message.contains("Unterminated block comment"));
}

#[test]
fn rejects_bare_plus_and_single_colon() {
    let (_tokens, diags) = lex("a + b : c");
    assert_eq!(diags.len(), 2);
    assert!(diags.as_slice()[0].message.contains("'+'"));
    assert!(diags.as_slice()[1].message.contains("'::'"));
}

#[test]
fn reports_unknown_characters() {
    let (_tokens, diags) = lex("int x = 5 % 2;");
    assert!(diags.as_slice()[0].message.contains("Unexpected character '%'"));
}

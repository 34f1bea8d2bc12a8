//! Unit tests for the lexer module.
//!
//! Covers keywords, identifiers, literals with escapes, operators,
//! comments, position tracking and the unrecognised-input error.

use super::{
    lexer::{tokenize, unescape},
    tokens::TokenKind,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, Some("test.tiny".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("fn extern ret i32 i8"),
        vec![
            TokenKind::Fn,
            TokenKind::Extern,
            TokenKind::Ret,
            TokenKind::I32,
            TokenKind::I8,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _under fnord ret2", None).unwrap();

    assert!(tokens[..5]
        .iter()
        .all(|token| token.kind == TokenKind::Identifier));
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "_under");
    assert_eq!(tokens[3].value, "fnord");
    assert_eq!(tokens[4].value, "ret2");
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 0 2147483647", None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].value, "2147483647");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds(":= : = , -> + - * / ( ) { }"),
        vec![
            TokenKind::ShortDec,
            TokenKind::Colon,
            TokenKind::Assignment,
            TokenKind::Comma,
            TokenKind::Arrow,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_without_whitespace() {
    assert_eq!(
        kinds("x:=a-b->c"),
        vec![
            TokenKind::Identifier,
            TokenKind::ShortDec,
            TokenKind::Identifier,
            TokenKind::Dash,
            TokenKind::Identifier,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_string_keeps_raw_contents() {
    let tokens = tokenize(r#""a\nb" "q\"uote""#, None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, r"a\nb");
    assert_eq!(tokens[1].value, r#"q\"uote"#);
}

#[test]
fn test_unescape() {
    assert_eq!(unescape(r"a\nb"), b"a\nb");
    assert_eq!(unescape(r"tab\there"), b"tab\there");
    assert_eq!(unescape(r#"q\"uote"#), b"q\"uote");
    assert_eq!(unescape(r"\x41\\"), b"A\\");
    assert_eq!(unescape(r"\q"), b"\\q");
}

#[test]
fn test_unescape_produces_single_bytes() {
    // High bytes stay one byte and NUL does not end the literal.
    assert_eq!(unescape(r"\xff"), vec![0xffu8]);
    assert_eq!(unescape(r"a\0b"), vec![b'a', 0, b'b']);
    assert_eq!(unescape("é"), "é".as_bytes());
}

#[test]
fn test_tokenize_comments() {
    assert_eq!(
        kinds("x // everything here is skipped := 5\ny"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]
    );
}

#[test]
fn test_token_positions() {
    let source = "fn main() -> i32 {\n    ret 42\n}";
    let tokens = tokenize(source, Some("pos.tiny".to_string())).unwrap();

    let main = &tokens[1];
    assert_eq!(main.value, "main");
    assert_eq!(main.span.start.line, 1);
    assert_eq!(main.span.start.column, 4);
    assert_eq!(main.span.end.column, 8);
    assert_eq!(main.span.start.file.as_str(), "pos.tiny");

    let ret = tokens.iter().find(|token| token.kind == TokenKind::Ret).unwrap();
    assert_eq!(ret.span.start.line, 2);
    assert_eq!(ret.span.start.column, 5);

    let number = tokens.iter().find(|token| token.kind == TokenKind::Number).unwrap();
    assert_eq!(number.span.start.line, 2);
    assert_eq!(number.span.start.column, 9);

    let close = &tokens[tokens.len() - 2];
    assert_eq!(close.kind, TokenKind::CloseCurly);
    assert_eq!(close.span.start.line, 3);
    assert_eq!(close.span.start.column, 1);
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("x := 5 @ 3", None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().line, 1);
    assert_eq!(error.get_position().column, 8);
}

#[test]
fn test_unterminated_string() {
    let error = tokenize("\"never closed", None).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
}

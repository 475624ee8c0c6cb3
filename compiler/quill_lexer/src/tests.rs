use pretty_assertions::assert_eq;
use quill_ir::TokenKind::{self, *};

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    match lex(source) {
        Ok(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
        Err(err) => panic!("lex failed: {err}"),
    }
}

fn name(s: &str) -> TokenKind {
    Name(s.to_owned())
}

#[test]
fn simple_assignment() {
    assert_eq!(
        kinds("a = 1 + b"),
        vec![name("a"), Eq, Int(1), Plus, name("b"), Newline, Eof]
    );
}

#[test]
fn keywords_and_names_with_keyword_prefix() {
    assert_eq!(
        kinds("if iffy is not None"),
        vec![If, name("iffy"), Is, Not, None, Newline, Eof]
    );
}

#[test]
fn blocks_produce_indent_and_dedent() {
    let source = "def f(x):\n    if x:\n        return 1\n    return 2\ny = 3\n";
    assert_eq!(
        kinds(source),
        vec![
            Def, name("f"), LParen, name("x"), RParen, Colon, Newline,
            Indent, If, name("x"), Colon, Newline,
            Indent, Return, Int(1), Newline,
            Dedent, Return, Int(2), Newline,
            Dedent, name("y"), Eq, Int(3), Newline,
            Eof,
        ]
    );
}

#[test]
fn unterminated_block_is_closed_at_eof() {
    assert_eq!(
        kinds("while x:\n  pass"),
        vec![While, name("x"), Colon, Newline, Indent, Pass, Newline, Dedent, Eof]
    );
}

#[test]
fn blank_lines_and_comments_are_ignored() {
    let source = "a = 1\n\n   # indented comment\n\nb = 2  # trailing\n";
    assert_eq!(
        kinds(source),
        vec![name("a"), Eq, Int(1), Newline, name("b"), Eq, Int(2), Newline, Eof]
    );
}

#[test]
fn newlines_inside_brackets_are_ignored() {
    let source = "x = (1,\n        2)\n";
    assert_eq!(
        kinds(source),
        vec![name("x"), Eq, LParen, Int(1), Comma, Int(2), RParen, Newline, Eof]
    );
}

#[test]
fn line_continuation_joins_lines() {
    assert_eq!(
        kinds("x = 1 + \\\n    2\n"),
        vec![name("x"), Eq, Int(1), Plus, Int(2), Newline, Eof]
    );
}

#[test]
fn string_escapes() {
    assert_eq!(
        kinds(r#"s = 'it\'s' + "a\tb\n""#),
        vec![
            name("s"),
            Eq,
            Str("it's".into()),
            Plus,
            Str("a\tb\n".into()),
            Newline,
            Eof
        ]
    );
}

#[test]
fn operators() {
    assert_eq!(
        kinds("a // b % c <= d != e == f ... ~g"),
        vec![
            name("a"), SlashSlash, name("b"), Percent, name("c"), LtEq, name("d"),
            NotEq, name("e"), EqEq, name("f"), Ellipsis, Tilde, name("g"), Newline, Eof,
        ]
    );
}

#[test]
fn intrinsic_names_are_plain_identifiers() {
    assert_eq!(
        kinds("__intrinsic__int_add2(1, 2)"),
        vec![name("__intrinsic__int_add2"), LParen, Int(1), Comma, Int(2), RParen, Newline, Eof]
    );
}

#[test]
fn inconsistent_dedent_is_rejected() {
    let err = lex("if x:\n    a\n  b\n");
    assert!(matches!(
        err,
        Err(LexError {
            kind: LexErrorKind::InconsistentDedent,
            ..
        })
    ));
}

#[test]
fn min_int_magnitude_has_its_own_token() {
    assert_eq!(
        kinds("x = -9223372036854775808"),
        vec![name("x"), Eq, Minus, IntMinMagnitude, Newline, Eof]
    );
    assert_eq!(
        kinds("9223372036854775807"),
        vec![Int(i64::MAX), Newline, Eof]
    );
}

#[test]
fn errors() {
    assert!(matches!(
        lex("x = 'abc"),
        Err(LexError { kind: LexErrorKind::UnterminatedString, .. })
    ));
    assert!(matches!(
        lex("x = 9223372036854775809"),
        Err(LexError { kind: LexErrorKind::IntegerTooLarge, .. })
    ));
    assert!(matches!(
        lex("x = $"),
        Err(LexError { kind: LexErrorKind::UnexpectedCharacter('$'), .. })
    ));
    assert!(matches!(
        lex(r"x = '\q'"),
        Err(LexError { kind: LexErrorKind::InvalidEscape('q'), .. })
    ));
}

//! Lexer for Quill.
//!
//! Two stages: logos scans raw tokens (skipping blanks, comments and
//! backslash line continuations), then a layout pass turns line structure
//! into `Newline` / `Indent` / `Dedent` tokens using an [`IndentStack`].
//! Newlines inside brackets never reach the parser.

mod error;
mod indent;

use logos::Logos;
use quill_ir::{Span, Token, TokenKind};

pub use error::{LexError, LexErrorKind};
use indent::{IndentChange, IndentStack};

/// Raw token from logos, before escape processing and layout.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    #[regex(r"\\[ \t\r]*\n", logos::skip)]
    LineContinuation,

    #[token("\n")]
    Newline,

    #[token("and")]
    And,
    #[token("as")]
    As,
    #[token("break")]
    Break,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("def")]
    Def,
    #[token("del")]
    Del,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("except")]
    Except,
    #[token("False")]
    False,
    #[token("for")]
    For,
    #[token("global")]
    Global,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("None")]
    None,
    #[token("nonlocal")]
    Nonlocal,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("pass")]
    Pass,
    #[token("raise")]
    Raise,
    #[token("return")]
    Return,
    #[token("True")]
    True,
    #[token("try")]
    Try,
    #[token("while")]
    While,
    #[token("yield")]
    Yield,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("//")]
    SlashSlash,
    #[token("%")]
    Percent,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    Str,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,
}

/// Lex `source` into a token vector ending in `Eof`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut indents = IndentStack::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();
        let raw = result.map_err(|()| unrecognized(slice, span))?;

        if raw == RawToken::Newline {
            if indents.tracking_indent() && !indents.at_line_start() {
                tokens.push(Token::new(TokenKind::Newline, span));
                indents.new_line();
            }
            continue;
        }

        if indents.at_line_start() && indents.tracking_indent() {
            let column = column_of(source, span.start as usize);
            match indents.process_indent(column) {
                Ok(IndentChange::Indent) => tokens.push(Token::new(TokenKind::Indent, span)),
                Ok(IndentChange::Dedent(count)) => {
                    tokens.extend((0..count).map(|_| Token::new(TokenKind::Dedent, span)));
                }
                Ok(IndentChange::Same) => {}
                Err(()) => return Err(LexError::new(LexErrorKind::InconsistentDedent, span)),
            }
            indents.consumed_content();
        }

        match raw {
            RawToken::LParen | RawToken::LBracket | RawToken::LBrace => indents.open_bracket(),
            RawToken::RParen | RawToken::RBracket | RawToken::RBrace => indents.close_bracket(),
            _ => {}
        }
        tokens.push(Token::new(convert_token(raw, slice, span)?, span));
    }

    let end = Span::from_range(source.len()..source.len());
    if !indents.at_line_start() {
        tokens.push(Token::new(TokenKind::Newline, end));
    }
    for _ in 0..indents.close_all() {
        tokens.push(Token::new(TokenKind::Dedent, end));
    }
    tokens.push(Token::new(TokenKind::Eof, end));
    tracing::debug!(count = tokens.len(), "lexed");
    Ok(tokens)
}

fn unrecognized(slice: &str, span: Span) -> LexError {
    let kind = match slice.chars().next() {
        Some('"' | '\'') => LexErrorKind::UnterminatedString,
        Some(c) => LexErrorKind::UnexpectedCharacter(c),
        None => LexErrorKind::UnexpectedCharacter('\0'),
    };
    LexError::new(kind, span)
}

/// Visual column of byte `offset`, with tabs advancing to the next
/// multiple of eight.
fn column_of(source: &str, offset: usize) -> usize {
    let line_start = source[..offset].rfind('\n').map_or(0, |p| p + 1);
    source[line_start..offset].chars().fold(0, |col, c| match c {
        '\t' => (col / 8 + 1) * 8,
        _ => col + 1,
    })
}

fn convert_token(raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, LexError> {
    Ok(match raw {
        RawToken::Int => match slice.parse::<i64>() {
            Ok(value) => TokenKind::Int(value),
            Err(_) if slice.parse::<u64>() == Ok(i64::MIN.unsigned_abs()) => {
                TokenKind::IntMinMagnitude
            }
            Err(_) => return Err(LexError::new(LexErrorKind::IntegerTooLarge, span)),
        },
        RawToken::Str => TokenKind::Str(unescape(&slice[1..slice.len() - 1], span)?),
        RawToken::Name => TokenKind::Name(slice.to_owned()),
        RawToken::And => TokenKind::And,
        RawToken::As => TokenKind::As,
        RawToken::Break => TokenKind::Break,
        RawToken::Class => TokenKind::Class,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Def => TokenKind::Def,
        RawToken::Del => TokenKind::Del,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::Except => TokenKind::Except,
        RawToken::False => TokenKind::False,
        RawToken::For => TokenKind::For,
        RawToken::Global => TokenKind::Global,
        RawToken::If => TokenKind::If,
        RawToken::In => TokenKind::In,
        RawToken::Is => TokenKind::Is,
        RawToken::None => TokenKind::None,
        RawToken::Nonlocal => TokenKind::Nonlocal,
        RawToken::Not => TokenKind::Not,
        RawToken::Or => TokenKind::Or,
        RawToken::Pass => TokenKind::Pass,
        RawToken::Raise => TokenKind::Raise,
        RawToken::Return => TokenKind::Return,
        RawToken::True => TokenKind::True,
        RawToken::Try => TokenKind::Try,
        RawToken::While => TokenKind::While,
        RawToken::Yield => TokenKind::Yield,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::SlashSlash => TokenKind::SlashSlash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        // Trivia never reaches conversion.
        RawToken::Comment | RawToken::LineContinuation | RawToken::Newline => {
            return Err(LexError::new(LexErrorKind::UnexpectedCharacter('\n'), span))
        }
    })
}

/// Process escape sequences in a string literal body.
fn unescape(body: &str, span: Span) -> Result<String, LexError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => return Err(LexError::new(LexErrorKind::InvalidEscape(other), span)),
            None => return Err(LexError::new(LexErrorKind::UnterminatedString, span)),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests;

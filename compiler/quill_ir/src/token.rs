//! Token types produced by `quill_lexer`.

use super::Span;
use std::fmt;

/// A token with its span in the source.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds.
///
/// `Newline`, `Indent` and `Dedent` are layout tokens synthesized from line
/// structure; every other kind maps to a run of source text.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Identifier, including `__intrinsic__*` and `__builtin__*` names.
    Name(String),
    /// Decimal integer literal.
    Int(i64),
    /// `9223372036854775808`, the magnitude of `i64::MIN`. Only unary minus
    /// may consume it.
    IntMinMagnitude,
    /// String literal with escapes already processed.
    Str(String),

    // Keywords
    And,
    As,
    Break,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    False,
    For,
    Global,
    If,
    In,
    Is,
    None,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    True,
    Try,
    While,
    Yield,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Ellipsis,
    Eq,
    Plus,
    Minus,
    Star,
    SlashSlash,
    Percent,
    Tilde,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,

    // Layout
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    /// Source spelling for fixed tokens, `None` for tokens carrying data.
    pub fn spelling(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Name(_) | TokenKind::Int(_) | TokenKind::Str(_) => return None,
            TokenKind::IntMinMagnitude => "9223372036854775808",
            TokenKind::And => "and",
            TokenKind::As => "as",
            TokenKind::Break => "break",
            TokenKind::Class => "class",
            TokenKind::Continue => "continue",
            TokenKind::Def => "def",
            TokenKind::Del => "del",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::Except => "except",
            TokenKind::False => "False",
            TokenKind::For => "for",
            TokenKind::Global => "global",
            TokenKind::If => "if",
            TokenKind::In => "in",
            TokenKind::Is => "is",
            TokenKind::None => "None",
            TokenKind::Nonlocal => "nonlocal",
            TokenKind::Not => "not",
            TokenKind::Or => "or",
            TokenKind::Pass => "pass",
            TokenKind::Raise => "raise",
            TokenKind::Return => "return",
            TokenKind::True => "True",
            TokenKind::Try => "try",
            TokenKind::While => "while",
            TokenKind::Yield => "yield",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Eq => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::SlashSlash => "//",
            TokenKind::Percent => "%",
            TokenKind::Tilde => "~",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Eof => "end of file",
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Name(name) => write!(f, "identifier `{name}`"),
            TokenKind::Int(value) => write!(f, "integer `{value}`"),
            TokenKind::IntMinMagnitude => write!(f, "integer `{}`", i64::MIN.unsigned_abs()),
            TokenKind::Str(_) => write!(f, "string literal"),
            TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Eof => {
                f.write_str(self.spelling().unwrap_or_default())
            }
            other => write!(f, "`{}`", other.spelling().unwrap_or_default()),
        }
    }
}

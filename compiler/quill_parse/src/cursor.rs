//! Token cursor with single-token lookahead.

use quill_ir::{Span, Token, TokenKind};

use crate::{PResult, ParseError, ParseErrorKind};

pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
};

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Current token. Past the end of the stream this is a synthesized
    /// `Eof`, so an input missing its terminator still parses to an error
    /// rather than an out-of-bounds read.
    #[inline]
    pub(crate) fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    #[inline]
    pub(crate) fn kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub(crate) fn span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn peek_kind(&self) -> &'a TokenKind {
        self.tokens.get(self.pos + 1).map_or(&EOF.kind, |t| &t.kind)
    }

    #[inline]
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> PResult<Span> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(kind.to_string()))
        }
    }

    pub(crate) fn expect_name(&mut self) -> PResult<String> {
        match self.kind() {
            TokenKind::Name(name) => {
                self.advance();
                Ok(name.clone())
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: self.kind().clone(),
            },
            self.span(),
        )
    }
}

//! Recursive-descent parser for Quill.
//!
//! Consumes the token vector produced by `quill_lexer` (which already
//! carries `Newline`/`Indent`/`Dedent` layout tokens) and builds the
//! statement tree from `quill_ir::ast`. [`fold`] then simplifies constant
//! integer arithmetic before the tree reaches the HIR generator.
//!
//! List displays `[a, b]` are sugar for `list((a, b))`.

mod cursor;
mod error;
pub mod fold;
mod grammar;

use quill_ir::ast::Stmt;
use quill_ir::Token;

use cursor::Cursor;
pub use error::{ParseError, ParseErrorKind};
pub use fold::fold;

type PResult<T> = Result<T, ParseError>;

/// Parse a whole module.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(tokens: &[Token]) -> Result<Vec<Stmt>, ParseError> {
    let mut parser = Parser::new(tokens);
    let body = parser.parse_module()?;
    tracing::debug!(statements = body.len(), "parsed module");
    Ok(body)
}

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }
}

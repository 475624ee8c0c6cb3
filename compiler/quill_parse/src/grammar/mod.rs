//! Grammar productions, split by statements and expressions.

mod expr;
mod stmt;

use quill_ir::TokenKind;

/// Whether `kind` can begin an expression. Used to tell a trailing comma
/// (`x = 1,`) from a continued tuple, and a bare `return`/`yield` from one
/// with a value.
fn starts_expression(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Name(_)
            | TokenKind::Int(_)
            | TokenKind::Str(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::None
            | TokenKind::Ellipsis
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Tilde
            | TokenKind::Not
    )
}

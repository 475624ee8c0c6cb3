//! Expression productions, lowest precedence first.
//!
//! ```text
//! test       := or_test ['if' or_test 'else' test]
//! or_test    := and_test ('or' and_test)*
//! and_test   := not_test ('and' not_test)*
//! not_test   := 'not' not_test | comparison
//! comparison := arith (comp_op arith)*
//! arith      := term (('+' | '-') term)*
//! term       := factor (('*' | '//' | '%') factor)*
//! factor     := '-' INT_MIN_MAGNITUDE | ('+' | '-' | '~') factor | postfix
//! postfix    := atom ('(' args ')' | '[' testlist ']' | '.' NAME)*
//! ```

use quill_ir::ast::{BinaryOp, Expr, Literal, LogicalOp, RelationOp, UnaryOp};
use quill_ir::TokenKind;
use quill_stack::with_stack_headroom;

use super::starts_expression;
use crate::{PResult, ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    /// `yield_expr | testlist`
    pub(crate) fn parse_testlist_or_yield(&mut self) -> PResult<Expr> {
        if self.cursor.check(&TokenKind::Yield) {
            self.parse_yield()
        } else {
            self.parse_testlist()
        }
    }

    fn parse_yield(&mut self) -> PResult<Expr> {
        self.cursor.expect(&TokenKind::Yield)?;
        if starts_expression(self.cursor.kind()) {
            Ok(Expr::Yield(Some(Box::new(self.parse_testlist()?))))
        } else {
            Ok(Expr::Yield(None))
        }
    }

    /// One expression, or a tuple when a comma follows.
    pub(crate) fn parse_testlist(&mut self) -> PResult<Expr> {
        let first = self.parse_test()?;
        if !self.cursor.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.cursor.eat(&TokenKind::Comma) {
            if !starts_expression(self.cursor.kind()) {
                break;
            }
            items.push(self.parse_test()?);
        }
        Ok(Expr::Tuple(items))
    }

    pub(crate) fn parse_test(&mut self) -> PResult<Expr> {
        with_stack_headroom(|| {
            let expr = self.parse_or()?;
            if !self.cursor.eat(&TokenKind::If) {
                return Ok(expr);
            }
            let cond = self.parse_or()?;
            self.cursor.expect(&TokenKind::Else)?;
            let else_expr = self.parse_test()?;
            Ok(Expr::Conditional {
                cond: Box::new(cond),
                then_expr: Box::new(expr),
                else_expr: Box::new(else_expr),
            })
        })
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.cursor.eat(&TokenKind::Or) {
            let rhs = self.parse_and()?;
            lhs = Expr::Logical {
                op: LogicalOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_not()?;
        while self.cursor.eat(&TokenKind::And) {
            let rhs = self.parse_not()?;
            lhs = Expr::Logical {
                op: LogicalOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> PResult<Expr> {
        if self.cursor.eat(&TokenKind::Not) {
            let operand = with_stack_headroom(|| self.parse_not())?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> PResult<Expr> {
        let first = self.parse_arith()?;
        let mut operands = vec![first];
        let mut ops = Vec::new();
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Lt => RelationOp::Lt,
                TokenKind::Gt => RelationOp::Gt,
                TokenKind::LtEq => RelationOp::Le,
                TokenKind::GtEq => RelationOp::Ge,
                TokenKind::EqEq => RelationOp::Eq,
                TokenKind::NotEq => RelationOp::Ne,
                TokenKind::Is if self.cursor.peek_kind() == &TokenKind::Not => {
                    self.cursor.advance();
                    RelationOp::IsNot
                }
                TokenKind::Is => RelationOp::Is,
                _ => break,
            };
            self.cursor.advance();
            ops.push(op);
            operands.push(self.parse_arith()?);
        }
        if ops.is_empty() {
            Ok(operands.swap_remove(0))
        } else {
            Ok(Expr::Relation { operands, ops })
        }
    }

    fn parse_arith(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.cursor.advance();
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_term(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.cursor.kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::SlashSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.cursor.advance();
            let rhs = self.parse_factor()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_factor(&mut self) -> PResult<Expr> {
        let op = match self.cursor.kind() {
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Tilde => UnaryOp::Inv,
            _ => return self.parse_postfix(),
        };
        self.cursor.advance();
        if op == UnaryOp::Neg && self.cursor.eat(&TokenKind::IntMinMagnitude) {
            return Ok(Expr::int(i64::MIN));
        }
        let operand = with_stack_headroom(|| self.parse_factor())?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.cursor.kind() {
                TokenKind::LParen => {
                    self.cursor.advance();
                    let args = self.parse_comma_list(&TokenKind::RParen)?;
                    expr = Expr::call(expr, args);
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.parse_testlist()?;
                    self.cursor.expect(&TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let member = self.cursor.expect_name()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        member,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Comma-separated expressions up to and including `close`; a trailing
    /// comma is allowed.
    fn parse_comma_list(&mut self, close: &TokenKind) -> PResult<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            items.push(self.parse_test()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }

    fn parse_atom(&mut self) -> PResult<Expr> {
        let token = self.cursor.current();
        let expr = match &token.kind {
            TokenKind::Name(name) => Expr::Name(name.clone()),
            TokenKind::Int(value) => Expr::int(*value),
            TokenKind::True => Expr::Literal(Literal::Bool(true)),
            TokenKind::False => Expr::Literal(Literal::Bool(false)),
            TokenKind::None => Expr::Literal(Literal::None),
            TokenKind::Ellipsis => Expr::Literal(Literal::Ellipsis),
            TokenKind::Str(_) => return Ok(self.parse_strings()),
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBracket => {
                self.cursor.advance();
                let items = self.parse_comma_list(&TokenKind::RBracket)?;
                return Ok(Expr::call(Expr::name("list"), vec![Expr::Tuple(items)]));
            }
            TokenKind::LBrace => return self.parse_dict(),
            TokenKind::IntMinMagnitude => {
                return Err(ParseError::new(ParseErrorKind::IntegerTooLarge, token.span))
            }
            _ => return Err(self.cursor.unexpected("expression")),
        };
        self.cursor.advance();
        Ok(expr)
    }

    /// Adjacent string literals concatenate.
    fn parse_strings(&mut self) -> Expr {
        let mut value = String::new();
        while let TokenKind::Str(part) = self.cursor.kind() {
            value.push_str(part);
            self.cursor.advance();
        }
        Expr::str(value)
    }

    /// `()`, `(yield ...)`, `(expr)` or a parenthesised tuple.
    fn parse_paren(&mut self) -> PResult<Expr> {
        self.cursor.expect(&TokenKind::LParen)?;
        if self.cursor.eat(&TokenKind::RParen) {
            return Ok(Expr::Tuple(Vec::new()));
        }
        if self.cursor.check(&TokenKind::Yield) {
            let expr = self.parse_yield()?;
            self.cursor.expect(&TokenKind::RParen)?;
            return Ok(expr);
        }
        let first = self.parse_test()?;
        if self.cursor.eat(&TokenKind::RParen) {
            return Ok(first);
        }
        self.cursor.expect(&TokenKind::Comma)?;
        let mut items = vec![first];
        items.extend(self.parse_comma_list(&TokenKind::RParen)?);
        Ok(Expr::Tuple(items))
    }

    fn parse_dict(&mut self) -> PResult<Expr> {
        self.cursor.expect(&TokenKind::LBrace)?;
        let mut entries = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            let key = self.parse_test()?;
            self.cursor.expect(&TokenKind::Colon)?;
            let value = self.parse_test()?;
            entries.push((key, value));
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Expr::Dict(entries))
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

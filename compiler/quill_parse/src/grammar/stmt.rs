//! Statement productions.

use quill_ir::ast::{ClassDef, ExceptClause, Expr, FunctionDef, Param, Pattern, Stmt};
use quill_ir::{Span, TokenKind};
use quill_stack::with_stack_headroom;

use super::starts_expression;
use crate::{PResult, ParseError, ParseErrorKind, Parser};

impl Parser<'_> {
    pub(crate) fn parse_module(&mut self) -> PResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.cursor.check(&TokenKind::Eof) {
            if self.cursor.eat(&TokenKind::Newline) {
                continue;
            }
            self.parse_statement(&mut body)?;
        }
        Ok(body)
    }

    fn parse_statement(&mut self, out: &mut Vec<Stmt>) -> PResult<()> {
        with_stack_headroom(|| {
            let stmt = match self.cursor.kind() {
                TokenKind::If => self.parse_if()?,
                TokenKind::While => self.parse_while()?,
                TokenKind::For => self.parse_for()?,
                TokenKind::Try => self.parse_try()?,
                TokenKind::Def => Stmt::Def(self.parse_def()?),
                TokenKind::Class => Stmt::Class(self.parse_class()?),
                _ => return self.parse_simple_line(out),
            };
            out.push(stmt);
            Ok(())
        })
    }

    /// `small (';' small)* [';'] Newline`
    fn parse_simple_line(&mut self, out: &mut Vec<Stmt>) -> PResult<()> {
        loop {
            out.push(self.parse_small_statement()?);
            if !self.cursor.eat(&TokenKind::Semicolon) || self.cursor.check(&TokenKind::Newline)
            {
                break;
            }
        }
        self.cursor.expect(&TokenKind::Newline)?;
        Ok(())
    }

    fn parse_small_statement(&mut self) -> PResult<Stmt> {
        match self.cursor.kind() {
            TokenKind::Pass => {
                self.cursor.advance();
                Ok(Stmt::Pass)
            }
            TokenKind::Break => {
                self.cursor.advance();
                Ok(Stmt::Break)
            }
            TokenKind::Continue => {
                self.cursor.advance();
                Ok(Stmt::Continue)
            }
            TokenKind::Return => {
                self.cursor.advance();
                if starts_expression(self.cursor.kind()) {
                    Ok(Stmt::Return(Some(self.parse_testlist()?)))
                } else {
                    Ok(Stmt::Return(None))
                }
            }
            TokenKind::Raise => {
                self.cursor.advance();
                Ok(Stmt::Raise(self.parse_test()?))
            }
            TokenKind::Del => {
                self.cursor.advance();
                let span = self.cursor.span();
                let target = self.parse_testlist()?;
                let pattern = to_pattern(target, span)
                    .map_err(|_| ParseError::new(ParseErrorKind::InvalidDeleteTarget, span))?;
                Ok(Stmt::Del(pattern))
            }
            TokenKind::Global => {
                self.cursor.advance();
                Ok(Stmt::Global(self.parse_name_list()?))
            }
            TokenKind::Nonlocal => {
                self.cursor.advance();
                Ok(Stmt::Nonlocal(self.parse_name_list()?))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_name_list(&mut self) -> PResult<Vec<String>> {
        let mut names = vec![self.cursor.expect_name()?];
        while self.cursor.eat(&TokenKind::Comma) {
            names.push(self.cursor.expect_name()?);
        }
        Ok(names)
    }

    /// An expression, or an assignment chain `t1 = t2 = value`.
    fn parse_expression_statement(&mut self) -> PResult<Stmt> {
        let mut span = self.cursor.span();
        let first = self.parse_testlist_or_yield()?;
        if !self.cursor.check(&TokenKind::Eq) {
            return Ok(Stmt::Expr(first));
        }
        let mut targets = Vec::new();
        let mut value = first;
        while self.cursor.eat(&TokenKind::Eq) {
            targets.push(to_pattern(value, span)?);
            span = self.cursor.span();
            value = self.parse_testlist_or_yield()?;
        }
        Ok(Stmt::Assign { targets, value })
    }

    /// `':' (simple_line | Newline Indent statement+ Dedent)`
    fn parse_suite(&mut self) -> PResult<Vec<Stmt>> {
        self.cursor.expect(&TokenKind::Colon)?;
        let mut body = Vec::new();
        if !self.cursor.eat(&TokenKind::Newline) {
            self.parse_simple_line(&mut body)?;
            return Ok(body);
        }
        self.cursor.expect(&TokenKind::Indent)?;
        while !self.cursor.eat(&TokenKind::Dedent) {
            if self.cursor.check(&TokenKind::Eof) {
                return Err(self.cursor.unexpected("dedent"));
            }
            self.parse_statement(&mut body)?;
        }
        Ok(body)
    }

    // Compound statements

    fn parse_if(&mut self) -> PResult<Stmt> {
        // `if` or `elif`
        self.cursor.advance();
        let cond = self.parse_test()?;
        let then_body = self.parse_suite()?;
        let else_body = match self.cursor.kind() {
            TokenKind::Elif => vec![self.parse_if()?],
            TokenKind::Else => {
                self.cursor.advance();
                self.parse_suite()?
            }
            _ => Vec::new(),
        };
        Ok(Stmt::If {
            cond,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> PResult<Stmt> {
        self.cursor.expect(&TokenKind::While)?;
        let cond = self.parse_test()?;
        let body = self.parse_suite()?;
        Ok(Stmt::While { cond, body })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        self.cursor.expect(&TokenKind::For)?;
        let span = self.cursor.span();
        let target = to_pattern(self.parse_testlist()?, span)?;
        self.cursor.expect(&TokenKind::In)?;
        let iter = self.parse_testlist()?;
        let body = self.parse_suite()?;
        Ok(Stmt::For { target, iter, body })
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        let span = self.cursor.expect(&TokenKind::Try)?;
        let body = self.parse_suite()?;
        let mut handlers = Vec::new();
        while self.cursor.eat(&TokenKind::Except) {
            let mut kind = None;
            let mut binding = None;
            if !self.cursor.check(&TokenKind::Colon) {
                kind = Some(self.parse_test()?);
                if self.cursor.eat(&TokenKind::As) {
                    binding = Some(self.cursor.expect_name()?);
                }
            }
            let body = self.parse_suite()?;
            handlers.push(ExceptClause {
                kind,
                binding,
                body,
            });
        }
        if handlers.is_empty() {
            return Err(ParseError::new(ParseErrorKind::TryWithoutExcept, span));
        }
        Ok(Stmt::Try { body, handlers })
    }

    fn parse_def(&mut self) -> PResult<FunctionDef> {
        self.cursor.expect(&TokenKind::Def)?;
        let name = self.cursor.expect_name()?;
        self.cursor.expect(&TokenKind::LParen)?;
        let mut params: Vec<Param> = Vec::new();
        let mut rest = None;
        while !self.cursor.check(&TokenKind::RParen) {
            if self.cursor.eat(&TokenKind::Star) {
                rest = Some(self.cursor.expect_name()?);
                self.cursor.eat(&TokenKind::Comma);
                break;
            }
            let span = self.cursor.span();
            let param_name = self.cursor.expect_name()?;
            let default = if self.cursor.eat(&TokenKind::Eq) {
                Some(self.parse_test()?)
            } else {
                if params.iter().any(|p| p.default.is_some()) {
                    return Err(ParseError::new(ParseErrorKind::NonDefaultAfterDefault, span));
                }
                None
            };
            params.push(Param {
                name: param_name,
                default,
            });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        let body = self.parse_suite()?;
        Ok(FunctionDef {
            name,
            params,
            rest,
            body,
        })
    }

    fn parse_class(&mut self) -> PResult<ClassDef> {
        self.cursor.expect(&TokenKind::Class)?;
        let name = self.cursor.expect_name()?;
        let mut base = None;
        if self.cursor.eat(&TokenKind::LParen) {
            if !self.cursor.check(&TokenKind::RParen) {
                base = Some(self.parse_test()?);
            }
            self.cursor.expect(&TokenKind::RParen)?;
        }
        let body = self.parse_suite()?;
        Ok(ClassDef { name, base, body })
    }
}

/// Reinterpret an already-parsed expression as an assignment target.
fn to_pattern(expr: Expr, span: Span) -> PResult<Pattern> {
    match expr {
        Expr::Name(name) => Ok(Pattern::Name(name)),
        Expr::Tuple(items) => items
            .into_iter()
            .map(|item| to_pattern(item, span))
            .collect::<PResult<Vec<_>>>()
            .map(Pattern::Tuple),
        Expr::Member { object, member } => Ok(Pattern::Member {
            object: *object,
            member,
        }),
        Expr::Index { object, index } => Ok(Pattern::Index {
            object: *object,
            index: *index,
        }),
        _ => Err(ParseError::new(ParseErrorKind::InvalidAssignTarget, span)),
    }
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use quill_ir::ast::{Expr, Literal, Stmt};

use super::fold;

fn fold_source(source: &str) -> Vec<Stmt> {
    let tokens = quill_lexer::lex(source).unwrap();
    fold(crate::parse(&tokens).unwrap())
}

fn folded_value(source: &str) -> Expr {
    match fold_source(source).pop() {
        Some(Stmt::Assign { value, .. }) => value,
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn folds_nested_arithmetic() {
    assert_eq!(folded_value("x = (1 + 2) * 3 - -4"), Expr::int(13));
}

#[test]
fn division_uses_floor_semantics() {
    assert_eq!(folded_value("x = -7 // 2"), Expr::int(-4));
    assert_eq!(folded_value("x = -7 % 2"), Expr::int(1));
}

#[test]
fn leaves_zero_division_for_runtime() {
    assert!(matches!(folded_value("x = 1 // 0"), Expr::Binary { .. }));
}

#[test]
fn leaves_overflow_for_runtime() {
    assert!(matches!(
        folded_value("x = 9223372036854775807 + 1"),
        Expr::Binary { .. }
    ));
}

#[test]
fn folds_not_and_comparison_chains() {
    assert_eq!(folded_value("x = not 0"), Expr::Literal(Literal::Bool(true)));
    assert_eq!(folded_value("x = 1 < 2 < 3"), Expr::Literal(Literal::Bool(true)));
    assert_eq!(folded_value("x = 1 < 3 < 2"), Expr::Literal(Literal::Bool(false)));
}

#[test]
fn identity_comparison_is_kept() {
    assert!(matches!(folded_value("x = 1 is 1"), Expr::Relation { .. }));
}

#[test]
fn names_block_folding() {
    assert!(matches!(folded_value("x = y + 1"), Expr::Binary { .. }));
}

#[test]
fn folds_inside_function_bodies_and_defaults() {
    let body = fold_source("def f(a=2 * 3):\n    return 4 + 4\n");
    let Some(Stmt::Def(def)) = body.first() else {
        panic!("expected def");
    };
    assert_eq!(def.params[0].default, Some(Expr::int(6)));
    assert_eq!(def.body, vec![Stmt::Return(Some(Expr::int(8)))]);
}

#[test]
fn literal_conditional_picks_branch() {
    assert_eq!(folded_value("x = a if 0 else b"), Expr::name("b"));
}

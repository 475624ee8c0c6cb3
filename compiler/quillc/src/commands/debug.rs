//! Dumps of the front-end phases: `lex`, `parse` and `hir`.

use super::{fail, read_file};

pub fn lex_file(path: &str) {
    let content = read_file(path);
    let tokens = quill_lexer::lex(&content).unwrap_or_else(|e| fail(path, &e));

    println!("Tokens for '{}' ({} tokens):", path, tokens.len());
    for tok in &tokens {
        println!("  {:?} @ {}", tok.kind, tok.span);
    }
}

pub fn parse_file(path: &str) {
    let content = read_file(path);
    let tokens = quill_lexer::lex(&content).unwrap_or_else(|e| fail(path, &e));
    let body = quill_parse::parse(&tokens).unwrap_or_else(|e| fail(path, &e));

    println!("Parse result for '{path}':");
    for stmt in quill_parse::fold(body) {
        println!("{stmt:#?}");
    }
}

pub fn hir_file(path: &str, json: bool) {
    let content = read_file(path);
    let module = crate::compile(&content).unwrap_or_else(|e| fail(path, &e));
    if json {
        let dump = crate::hir_json(&module).unwrap_or_else(|e| fail(path, &e));
        println!("{dump}");
    } else {
        print!("{module}");
    }
}

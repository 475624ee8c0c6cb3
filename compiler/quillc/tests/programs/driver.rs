use pretty_assertions::assert_eq;
use quill_eval::{buffer_output, Interpreter, RuntimeError};
use quill_ir::hir::Module;
use quillc::{compile, hir_json, load_prelude, run_source, CompileError, RunError, PRELUDE};

#[test]
fn prelude_compiles() {
    let module = compile(PRELUDE).unwrap();
    assert!(module.entry().is_some());
}

#[test]
fn front_end_errors_are_compile_errors() {
    assert!(matches!(compile("x = 'open\n"), Err(CompileError::Lex(_))));
    assert!(matches!(compile("def f(:\n    pass\n"), Err(CompileError::Parse(_))));
    assert!(matches!(compile("yield 1\n"), Err(CompileError::Gen(_))));
    assert!(matches!(compile("break\n"), Err(CompileError::Gen(_))));
}

#[test]
fn hir_json_keeps_every_closure() {
    let module = compile("def f(a):\n    return a\n").unwrap();
    let json = hir_json(&module).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["closures"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["closures"][1]["is_generator"], serde_json::Value::Bool(false));
    let back: Module = serde_json::from_str(&json).unwrap();
    assert_eq!(back, module);
}

#[test]
fn programs_run_without_the_prelude() {
    let output = buffer_output();
    let mut interpreter = Interpreter::builder().output(output.clone()).build();
    run_source(&mut interpreter, "__intrinsic__print1('raw\\n')\n").unwrap();
    assert_eq!(output.output(), "raw\n");
}

#[test]
fn without_the_prelude_operators_are_unbound() {
    let mut interpreter = Interpreter::builder().output(buffer_output()).build();
    let result = run_source(&mut interpreter, "x = 1\ny = x + 2\n");
    assert!(matches!(result, Err(RunError::Runtime(_))));
}

#[test]
fn step_limit_stops_infinite_loops() {
    let mut interpreter = Interpreter::builder()
        .output(buffer_output())
        .step_limit(1_000_000)
        .build();
    load_prelude(&mut interpreter).unwrap();
    let result = run_source(&mut interpreter, "while True:\n    pass\n");
    assert_eq!(
        result.err(),
        Some(RunError::Runtime(RuntimeError::StepLimit(1_000_000)))
    );
}

#[test]
fn runaway_recursion_hits_the_frame_limit() {
    let mut interpreter = Interpreter::builder()
        .output(buffer_output())
        .max_frames(500)
        .build();
    load_prelude(&mut interpreter).unwrap();
    let result = run_source(&mut interpreter, "def f():\n    return f()\nf()\n");
    assert_eq!(
        result.err(),
        Some(RunError::Runtime(RuntimeError::FrameLimit(500)))
    );
}

#[test]
fn later_modules_see_earlier_globals() {
    let mut interpreter = Interpreter::builder().output(buffer_output()).build();
    load_prelude(&mut interpreter).unwrap();
    run_source(&mut interpreter, "shared = 41\n").unwrap();
    run_source(&mut interpreter, "shared = shared + 1\n").unwrap();
    let value = interpreter.global("shared").unwrap();
    assert_eq!(interpreter.repr(&value), "42");
}

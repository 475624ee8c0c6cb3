use pretty_assertions::assert_eq;

use quill_eval::{IntrinsicError, RuntimeError};
use quill_ir::Intrinsic;
use quillc::RunError;

use super::common::{printed, run};

#[test]
fn defaults_fill_missing_arguments() {
    let source = "\
def f(a, b=10):
    return a + b
print(f(5), f(5, 1))
";
    assert_eq!(printed(source), "15 6\n");
}

#[test]
fn defaults_are_evaluated_once() {
    let source = "\
n = 1
def f(x=n):
    return x
n = 2
print(f())
";
    assert_eq!(printed(source), "1\n");
}

#[test]
fn rest_parameter_collects_a_tuple() {
    let source = "\
def f(first, *rest):
    return len(rest)
print(f(1), f(1, 2, 3))
";
    assert_eq!(printed(source), "0 2\n");
}

#[test]
fn recursion() {
    let source = "\
def fact(n):
    if n <= 1:
        return 1
    return n * fact(n - 1)
print(fact(10))
";
    assert_eq!(printed(source), "3628800\n");
}

#[test]
fn missing_argument_is_fatal() {
    let source = "\
def f(a, b):
    return a
f(1)
";
    assert!(matches!(
        run(source).error(),
        RunError::Runtime(RuntimeError::Intrinsic {
            intrinsic: Intrinsic::TupleIdx,
            error: IntrinsicError::IndexOutOfRange { .. },
        })
    ));
}

use pretty_assertions::assert_eq;
use quill_eval::RuntimeError;
use quillc::RunError;

use super::common::{printed, run};

#[test]
fn handler_binds_the_raised_value() {
    let source = "\
try:
    raise ValueError('bad')
except ValueError as e:
    print('caught', e)
print('after')
";
    assert_eq!(printed(source), "caught bad\nafter\n");
}

#[test]
fn unmatched_clauses_propagate_outward() {
    let source = "\
def f():
    try:
        raise KeyError('k')
    except ValueError:
        return 'wrong'
try:
    f()
except KeyError as e:
    print('outer', repr(e))
";
    assert_eq!(printed(source), "outer KeyError('k',)\n");
}

#[test]
fn clauses_match_base_classes() {
    let source = "\
class AppError(Exception):
    __name__ = 'AppError'
try:
    raise AppError('x')
except Exception as e:
    print(type(e).__name__)
";
    assert_eq!(printed(source), "AppError\n");
}

#[test]
fn bare_except_catches_anything() {
    let source = "\
try:
    raise 'just a string'
except:
    print('caught')
";
    assert_eq!(printed(source), "caught\n");
}

#[test]
fn raise_unwinds_through_calls() {
    let source = "\
def inner():
    raise ValueError('deep')
def middle():
    inner()
    return 'unreachable'
try:
    middle()
except ValueError:
    print('unwound')
";
    assert_eq!(printed(source), "unwound\n");
}

#[test]
fn return_inside_try_leaves_the_handler() {
    let source = "\
def f():
    try:
        return 1
    except ValueError:
        return 2
print(f())
raise ValueError('later')
";
    let ran = run(source);
    assert_eq!(ran.printed(), "1\n");
    assert_eq!(
        ran.error(),
        RunError::Runtime(RuntimeError::UnhandledException(
            "ValueError('later',)".to_owned()
        ))
    );
}

#[test]
fn unhandled_raise_is_described() {
    assert_eq!(
        run("raise ValueError('x')\n").error(),
        RunError::Runtime(RuntimeError::UnhandledException(
            "ValueError('x',)".to_owned()
        ))
    );
}

#[test]
fn unknown_names_raise_name_error() {
    assert_eq!(
        run("print(missing)\n").error(),
        RunError::Runtime(RuntimeError::UnhandledException(
            "NameError('missing',)".to_owned()
        ))
    );
}

#[test]
fn division_by_zero_is_catchable_through_the_prelude() {
    let source = "\
try:
    1 // __intrinsic__int_sub2(1, 1)
except ZeroDivisionError as e:
    print(e)
";
    assert_eq!(printed(source), "integer division by zero\n");
}

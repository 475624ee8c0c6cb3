use pretty_assertions::assert_eq;
use quill_eval::RuntimeError;
use quillc::RunError;

use super::common::{printed, run};

const TWO_VALUES: &str = "\
def gen():
    yield 1
    yield 2
g = gen()
";

#[test]
fn resumes_yield_values_then_stop() {
    let source = format!(
        "{TWO_VALUES}\
a = __intrinsic__v_gen_next1(g)
b = __intrinsic__v_gen_next1(g)
c = __intrinsic__v_gen_next1(g)
stopped = __intrinsic__gen_stopped1(g)
"
    );
    let ran = run(&source);
    assert!(ran.result.is_ok());
    assert_eq!(ran.global("a").as_deref(), Some("1"));
    assert_eq!(ran.global("b").as_deref(), Some("2"));
    assert_eq!(ran.global("c").as_deref(), Some("None"));
    assert_eq!(ran.global("stopped").as_deref(), Some("True"));
}

#[test]
fn resuming_an_exhausted_generator_is_fatal() {
    let source = format!(
        "{TWO_VALUES}\
__intrinsic__v_gen_next1(g)
__intrinsic__v_gen_next1(g)
__intrinsic__v_gen_next1(g)
__intrinsic__v_gen_next1(g)
"
    );
    assert_eq!(
        run(&source).error(),
        RunError::Runtime(RuntimeError::GeneratorExhausted)
    );
}

#[test]
fn next_raises_stop_iteration() {
    let source = format!(
        "{TWO_VALUES}\
print(next(g), next(g), next(g, 'done'))
"
    );
    assert_eq!(printed(&source), "1 2 done\n");
}

#[test]
fn for_loops_drive_generators() {
    let source = "\
def squares(n):
    i = 0
    while i < n:
        yield i * i
        i = i + 1
total = 0
for v in squares(4):
    total = total + v
print(total)
";
    assert_eq!(printed(source), "14\n");
}

#[test]
fn generators_keep_their_own_locals() {
    let source = "\
def count(start):
    while True:
        yield start
        start = start + 1
a = count(10)
b = count(20)
print(next(a), next(b), next(a), next(b))
";
    assert_eq!(printed(source), "10 20 11 21\n");
}

#[test]
fn exceptions_escape_generators_to_the_resumer() {
    let source = "\
def bad():
    yield 1
    raise ValueError('inside')
g = bad()
next(g)
try:
    next(g)
except ValueError as e:
    print('caught', e)
";
    assert_eq!(printed(source), "caught inside\n");
}

#[test]
fn generator_resuming_itself_is_fatal() {
    let source = "\
def selfish():
    yield __intrinsic__v_gen_next1(g)
g = selfish()
next(g)
";
    assert_eq!(
        run(source).error(),
        RunError::Runtime(RuntimeError::GeneratorRunning)
    );
}

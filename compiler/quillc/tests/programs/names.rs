use pretty_assertions::assert_eq;

use super::common::{printed, run};

#[test]
fn module_assignments_become_globals() {
    let ran = run("a = 1\nb = a + 1\n");
    assert!(ran.result.is_ok());
    assert_eq!(ran.global("a").as_deref(), Some("1"));
    assert_eq!(ran.global("b").as_deref(), Some("2"));
}

#[test]
fn captures_see_later_assignments() {
    let source = "\
def outer():
    x = 1
    def middle():
        def inner():
            return x
        return inner
    f = middle()
    x = 5
    return f()
print(outer())
";
    assert_eq!(printed(source), "5\n");
}

#[test]
fn nonlocal_writes_the_enclosing_cell() {
    let source = "\
def counter():
    n = 0
    def bump():
        nonlocal n
        n = n + 1
        return n
    bump()
    bump()
    return n
print(counter())
";
    assert_eq!(printed(source), "2\n");
}

#[test]
fn global_declaration_writes_the_module_binding() {
    let source = "\
count = 0
def tick():
    global count
    count = count + 1
tick()
tick()
tick()
";
    assert_eq!(run(source).global("count").as_deref(), Some("3"));
}

#[test]
fn locals_shadow_globals() {
    let source = "\
x = 'global'
def f():
    x = 'local'
    return x
print(f(), x)
";
    assert_eq!(printed(source), "local global\n");
}

#[test]
fn each_call_gets_fresh_cells() {
    let source = "\
def make(v):
    def get():
        return v
    return get
a = make(1)
b = make(2)
print(a(), b())
";
    assert_eq!(printed(source), "1 2\n");
}

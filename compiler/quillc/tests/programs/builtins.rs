use pretty_assertions::assert_eq;

use super::common::{printed, run_with_input};

#[test]
fn print_joins_with_spaces() {
    assert_eq!(printed("print('a', 1, None, True)\nprint()\n"), "a 1 None True\n\n");
}

#[test]
fn integer_arithmetic_floors() {
    let source = "\
a = __intrinsic__int_sub2(0, 7)
print(a // 2, a % 2, -a, ~5)
";
    assert_eq!(printed(source), "-4 1 7 -6\n");
}

#[test]
fn min_int_literal() {
    let source = "\
a = -9223372036854775808
print(a, a + 1, a < 0)
";
    assert_eq!(printed(source), "-9223372036854775808 -9223372036854775807 True\n");
}

#[test]
fn comparisons_chain() {
    assert_eq!(printed("print(1 < 2 < 3, 3 < 2 < 1, 2 >= 2, 'a' < 'b')\n"), "True False True True\n");
}

#[test]
fn boolean_operators_short_circuit() {
    let source = "\
def boom():
    raise ValueError('evaluated')
print(0 or 'x', 1 and 2, None and boom(), 'y' or boom(), not 0)
";
    assert_eq!(printed(source), "x 2 None y True\n");
}

#[test]
fn lists_mutate_in_place() {
    let source = "\
xs = [1, 2]
ys = xs
xs.append(3)
ys[0] = 10
total = 0
for x in xs:
    total = total + x
print(len(xs), total, xs, xs.pop(), xs)
";
    assert_eq!(printed(source), "3 15 [10, 2] 3 [10, 2]\n");
}

#[test]
fn list_index_errors() {
    let source = "\
xs = [1]
try:
    xs[5]
except IndexError as e:
    print('index', e)
print(xs[-1])
";
    assert_eq!(printed(source), "index 5\n1\n");
}

#[test]
fn dictionaries() {
    let source = "\
d = {'a': 1}
d['b'] = 2
del d['a']
print(len(d), d['b'], d.get('a', 'none'))
for k in {'x': 1, 'y': 2}:
    print(k)
try:
    d['zzz']
except KeyError as e:
    print('no', e)
";
    assert_eq!(printed(source), "1 2 none\nx\ny\nno zzz\n");
}

#[test]
fn range_loops_with_break_and_continue() {
    let source = "\
n = 0
for i in range(10):
    if i == 5:
        break
    if i % 2 == 0:
        continue
    n = n + i
down = []
for i in range(5, 0, -2):
    down.append(i)
print(n, down)
";
    assert_eq!(printed(source), "4 [5, 3, 1]\n");
}

#[test]
fn strings() {
    let source = "\
s = 'hello'
print(len(s), s[1], s[-1], s.find('l'), '-'.join(('a', 'b', 'c')))
print(int('-42') + 1, str(7) + '!', repr('q'))
";
    assert_eq!(printed(source), "5 e o 2 a-b-c\n-41 7! 'q'\n");
}

#[test]
fn invalid_int_literal_raises_value_error() {
    let source = "\
try:
    int('12x')
except ValueError:
    print('bad')
";
    assert_eq!(printed(source), "bad\n");
}

#[test]
fn tuples_unpack_and_compare() {
    let source = "\
a, b = 1, 2
a, b = b, a
print(a, b, (1, 2) == (1, 2), (1, 2) == (1, 3), (1,) + (2,))
";
    assert_eq!(printed(source), "2 1 True False (1, 2)\n");
}

#[test]
fn map_all_any() {
    let source = "\
def double(x):
    return x * 2
print(list(map(double, (1, 2, 3))), all((1, 2)), all((1, 0)), any(()), any((0, 3)))
";
    assert_eq!(printed(source), "[2, 4, 6] True False False True\n");
}

#[test]
fn conditional_expressions() {
    assert_eq!(printed("x = 3\nprint('big' if x > 2 else 'small')\n"), "big\n");
}

#[test]
fn input_reads_lines() {
    let ran = run_with_input(
        "name = input('name? ')\nprint('hi ' + name)\n",
        &["quill"],
    );
    assert!(ran.result.is_ok());
    assert_eq!(ran.printed(), "name? hi quill\n");
}

#[test]
fn operators_on_mismatched_types_raise_type_error() {
    let source = "\
try:
    1 + 'a'
except TypeError as e:
    print(e)
";
    assert_eq!(printed(source), "`+` is not supported\n");
}

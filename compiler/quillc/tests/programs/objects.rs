use pretty_assertions::assert_eq;

use super::common::{printed, run};

#[test]
fn attributes_round_trip() {
    let source = "\
class Point:
    def __init__(self, x, y):
        self.x = x
        self.y = y

    def total(self):
        return self.x + self.y
p = Point(2, 3)
p.x = 10
print(p.x, p.total())
";
    assert_eq!(printed(source), "10 13\n");
}

#[test]
fn class_attributes_are_shared_by_instances() {
    let source = "\
class Config:
    level = 3
a = Config()
b = Config()
print(a.level, b.level)
";
    assert_eq!(printed(source), "3 3\n");
}

#[test]
fn methods_are_inherited_and_overridden() {
    let source = "\
class Animal:
    def name(self):
        return 'animal'

    def describe(self):
        return 'a ' + self.name()
class Dog(Animal):
    def name(self):
        return 'dog'
print(Animal().describe(), Dog().describe(), isinstance(Dog(), Animal))
";
    assert_eq!(printed(source), "a animal a dog True\n");
}

#[test]
fn operators_dispatch_to_dunder_methods() {
    let source = "\
class Money:
    def __init__(self, cents):
        self.cents = cents

    def __add__(self, other):
        return Money(self.cents + other.cents)

    def __eq__(self, other):
        return self.cents == other.cents
total = Money(150) + Money(50)
print(total.cents, total == Money(200))
";
    assert_eq!(printed(source), "200 True\n");
}

#[test]
fn callable_instances() {
    let source = "\
class Adder:
    def __init__(self, n):
        self.n = n

    def __call__(self, x):
        return x + self.n
add2 = Adder(2)
print(add2(40))
";
    assert_eq!(printed(source), "42\n");
}

#[test]
fn missing_attribute_raises() {
    let source = "\
class Empty:
    pass
try:
    Empty().nothing
except AttributeError as e:
    print('missing', e)
";
    assert_eq!(printed(source), "missing nothing\n");
}

#[test]
fn delattr_removes_the_attribute() {
    let source = "\
class Box:
    pass
b = Box()
b.item = 1
del b.item
print(getattr(b, 'item', 'gone'))
";
    assert_eq!(printed(source), "gone\n");
}

#[test]
fn method_can_be_used_as_a_value() {
    let source = "\
class Greeter:
    def __init__(self, name):
        self.name = name

    def greet(self):
        return 'hi ' + self.name
g = Greeter('quill').greet
print(g())
";
    assert_eq!(printed(source), "hi quill\n");
}

#[test]
fn truthiness_uses_dunder_bool() {
    let source = "\
class Never:
    def __bool__(self):
        return False
if Never():
    print('yes')
else:
    print('no')
";
    assert_eq!(printed(source), "no\n");
    let ran = run("\
class Broken:
    def __bool__(self):
        return 1
if Broken():
    pass
");
    assert!(ran.error().to_string().contains("TypeError"));
}

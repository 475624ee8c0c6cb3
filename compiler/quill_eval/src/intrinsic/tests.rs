#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::rc::Rc;

use pretty_assertions::assert_eq;
use quill_ir::Intrinsic;

use super::*;
use crate::io::buffer_output;

fn natives() -> Natives {
    Natives::new(buffer_output(), InputHandler::lines(["first line"]))
}

fn call(n: &mut Natives, intrinsic: Intrinsic, args: &[ObjectRef]) -> ObjectRef {
    n.call(intrinsic, args).unwrap()
}

fn fail(n: &mut Natives, intrinsic: Intrinsic, args: &[ObjectRef]) -> IntrinsicError {
    match n.call(intrinsic, args) {
        Ok(value) => panic!("{intrinsic} succeeded with {}", repr(&value, &n.singletons)),
        Err(error) => error,
    }
}

fn int(v: i64) -> ObjectRef {
    Object::int(v)
}

fn set_global(n: &Natives, name: &str, value: &ObjectRef) {
    if let Primitive::Dict(entries) = n.globals.primitive() {
        entries.borrow_mut().insert(name.into(), Rc::clone(value));
    }
}

#[test]
fn arity_is_checked() {
    let mut n = natives();
    assert_eq!(
        fail(&mut n, Intrinsic::IntAdd, &[int(1)]),
        IntrinsicError::Arity {
            expected: 2,
            found: 1
        }
    );
    assert_eq!(fail(&mut n, Intrinsic::Call, &[int(1), int(2)]), IntrinsicError::Virtual);
}

#[test]
fn integer_arithmetic_floors_and_fails_loudly() {
    let mut n = natives();
    assert_eq!(call(&mut n, Intrinsic::IntDiv, &[int(-7), int(2)]).as_int(), Some(-4));
    assert_eq!(call(&mut n, Intrinsic::IntMod, &[int(-7), int(2)]).as_int(), Some(1));
    assert_eq!(
        fail(&mut n, Intrinsic::IntDiv, &[int(1), int(0)]),
        IntrinsicError::DivisionByZero
    );
    assert_eq!(
        fail(&mut n, Intrinsic::IntAdd, &[int(i64::MAX), int(1)]),
        IntrinsicError::Overflow
    );
    assert_eq!(
        fail(&mut n, Intrinsic::IntLt, &[int(1), Object::str("x")]),
        IntrinsicError::WrongType {
            position: 2,
            expected: "int",
            found: "str"
        }
    );
}

#[test]
fn comparisons_return_singletons() {
    let mut n = natives();
    let t = call(&mut n, Intrinsic::IntEq, &[int(3), int(3)]);
    assert!(Rc::ptr_eq(&t, &n.singletons.true_obj));
    let f = call(&mut n, Intrinsic::Not, &[t]);
    assert!(n.singletons.is_false(&f));
    // Only the `False` singleton is false to `not1`.
    let zero = call(&mut n, Intrinsic::Not, &[int(0)]);
    assert!(Rc::ptr_eq(&zero, &n.singletons.false_obj));
}

#[test]
fn tuples() {
    let mut n = natives();
    let t = call(&mut n, Intrinsic::TupleMake, &[int(1), int(2), int(3)]);
    assert_eq!(call(&mut n, Intrinsic::TupleLen, &[Rc::clone(&t)]).as_int(), Some(3));
    assert_eq!(
        call(&mut n, Intrinsic::TupleIdx, &[Rc::clone(&t), int(2)]).as_int(),
        Some(3)
    );
    assert_eq!(
        fail(&mut n, Intrinsic::TupleIdx, &[Rc::clone(&t), int(3)]),
        IntrinsicError::IndexOutOfRange { index: 3, len: 3 }
    );

    let none = Rc::clone(&n.singletons.none);
    let rev = call(
        &mut n,
        Intrinsic::TupleSlice,
        &[Rc::clone(&t), Rc::clone(&none), Rc::clone(&none), int(-1)],
    );
    let items: Vec<_> = rev.tuple_items().unwrap().iter().map(|o| o.as_int()).collect();
    assert_eq!(items, [Some(3), Some(2), Some(1)]);

    let extra = call(&mut n, Intrinsic::TupleMake, &[int(9)]);
    let same = call(&mut n, Intrinsic::TupleSplice, &[Rc::clone(&t), int(3), int(3), extra]);
    assert!(Rc::ptr_eq(&same, &t));
    assert_eq!(t.tuple_items().unwrap().len(), 4);
}

#[test]
fn strings() {
    let mut n = natives();
    let s = Object::str("hello");
    assert_eq!(call(&mut n, Intrinsic::StrLen, &[Rc::clone(&s)]).as_int(), Some(5));
    let none = Rc::clone(&n.singletons.none);
    let tail = call(&mut n, Intrinsic::StrSlice, &[Rc::clone(&s), int(1), none.clone(), none]);
    assert_eq!(tail.as_str(), Some("ello"));
    assert_eq!(
        call(&mut n, Intrinsic::StrFind, &[s, Object::str("ll"), int(0), int(5)]).as_int(),
        Some(2)
    );
    assert_eq!(
        call(&mut n, Intrinsic::StrToInt, &[Object::str("-42")]).as_int(),
        Some(-42)
    );
    assert!(matches!(
        fail(&mut n, Intrinsic::StrToInt, &[Object::str("4x")]),
        IntrinsicError::InvalidInt(_)
    ));
    assert_eq!(call(&mut n, Intrinsic::StrToOrd, &[Object::str("A")]).as_int(), Some(65));
    let ab = call(&mut n, Intrinsic::StrConcat, &[Object::str("a"), Object::str("b")]);
    assert_eq!(ab.as_str(), Some("ab"));
}

#[test]
fn dictionaries_keep_insertion_order() {
    let mut n = natives();
    let d = call(&mut n, Intrinsic::DictNew, &[]);
    for (key, value) in [("b", 1), ("a", 2), ("c", 3)] {
        call(&mut n, Intrinsic::DictSet, &[Rc::clone(&d), Object::str(key), int(value)]);
    }
    call(&mut n, Intrinsic::DictDel, &[Rc::clone(&d), Object::str("a")]);
    assert_eq!(call(&mut n, Intrinsic::DictLen, &[Rc::clone(&d)]).as_int(), Some(2));
    let pairs = call(&mut n, Intrinsic::DictToTuple, &[Rc::clone(&d)]);
    assert_eq!(repr(&pairs, &n.singletons), "(('b', 1), ('c', 3))");
    let missing = call(&mut n, Intrinsic::DictGet, &[d, Object::str("zz"), int(0)]);
    assert_eq!(missing.as_int(), Some(0));
}

#[test]
fn objects_and_types() {
    let mut n = natives();
    let none = Rc::clone(&n.singletons.none);
    let int_type = call(&mut n, Intrinsic::DictNew, &[]);
    let int_class = call(&mut n, Intrinsic::ObjNew, &[none.clone(), none.clone(), int_type]);
    set_global(&n, "int", &int_class);

    let ty = call(&mut n, Intrinsic::ObjGetType, &[int(5)]);
    assert!(Rc::ptr_eq(&ty, &int_class));
    assert_eq!(
        fail(&mut n, Intrinsic::ObjGetType, &[Object::str("s")]),
        IntrinsicError::MissingGlobal("str")
    );

    let attrs = call(&mut n, Intrinsic::DictNew, &[]);
    let inst = call(&mut n, Intrinsic::ObjNew, &[none.clone(), Rc::clone(&int_class), attrs]);
    call(&mut n, Intrinsic::SetAttr, &[Rc::clone(&inst), Object::str("x"), int(1)]);
    let x = call(&mut n, Intrinsic::GetAttr, &[Rc::clone(&inst), Object::str("x"), none.clone()]);
    assert_eq!(x.as_int(), Some(1));
    let removed = call(&mut n, Intrinsic::DelAttr, &[Rc::clone(&inst), Object::str("x")]);
    assert!(Rc::ptr_eq(&removed, &n.singletons.true_obj));
    let base = call(&mut n, Intrinsic::ObjGetBase, &[inst]);
    assert!(n.singletons.is_none(&base));
    let none_base = call(&mut n, Intrinsic::ObjGetBase, &[none]);
    assert!(n.singletons.is_none(&none_base));
}

#[test]
fn io_goes_through_handlers() {
    let output = buffer_output();
    let mut n = Natives::new(output.clone(), InputHandler::lines(["typed"]));
    call(&mut n, Intrinsic::Print, &[Object::str("hi\n")]);
    call(&mut n, Intrinsic::Flush, &[]);
    assert_eq!(output.output(), "hi\n");
    assert_eq!(call(&mut n, Intrinsic::Input, &[]).as_str(), Some("typed"));
    assert_eq!(fail(&mut n, Intrinsic::Input, &[]), IntrinsicError::EndOfInput);
}

use pretty_assertions::assert_eq;
use smallvec::smallvec;

use super::*;

#[test]
fn slot_encoding_keeps_capture_zero_distinct() {
    assert_eq!(Slot::local(0).raw(), 0);
    assert_eq!(Slot::capture(0).raw(), -1);
    assert_eq!(Slot::capture(3).raw(), -4);
    assert_eq!(Slot::local(5).decode(), SlotRef::Local(5));
    assert_eq!(Slot::capture(0).decode(), SlotRef::Capture(0));
    assert_eq!(Slot::from_raw(-7).decode(), SlotRef::Capture(6));
}

#[test]
fn instruction_dump() {
    let instrs = [
        Instr::Imm {
            dest: Slot::local(0),
            value: Immediate::Str("a\n".into()),
        },
        Instr::Intrinsic {
            dest: Slot::local(1),
            intrinsic: Intrinsic::IntAdd,
            args: smallvec![Slot::local(0), Slot::capture(0)],
        },
        Instr::Intrinsic {
            dest: Slot::local(2),
            intrinsic: Intrinsic::GetGlobal,
            args: SmallVec::new(),
        },
        Instr::Closure {
            dest: Slot::local(2),
            closure: ClosureId::new(3),
            captures: vec![Slot::local(1), Slot::capture(2)],
            defaults: Slot::local(2),
        },
        Instr::JumpIfFalse {
            cond: Slot::local(1),
            target: 9,
        },
        Instr::PushExcept {
            dest: Slot::local(4),
            target: 12,
        },
        Instr::PopExcept,
    ];
    let rendered: Vec<String> = instrs.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        [
            "%0 = imm 'a\\n'",
            "%1 = int_add2 %0, %-1",
            "%2 = get_global0",
            "%2 = closure #3 [%1, %-3] defaults %2",
            "jf %1 -> 9",
            "%4 = push_except -> 12",
            "pop_except",
        ]
    );
}

#[test]
fn module_dump_labels_entry() {
    let module = Module {
        closures: vec![
            Closure {
                local_size: 1,
                is_generator: false,
                instrs: vec![Instr::Imm {
                    dest: Slot::local(0),
                    value: Immediate::None,
                }],
            },
            Closure {
                local_size: 1,
                is_generator: true,
                instrs: vec![Instr::Yield {
                    value: Slot::local(0),
                }],
            },
        ],
    };
    assert_eq!(
        module.to_string(),
        "entry #0 (locals: 1):\n     0: %0 = imm None\nclosure #1 (locals: 1, generator):\n     0: yield %0\n"
    );
}

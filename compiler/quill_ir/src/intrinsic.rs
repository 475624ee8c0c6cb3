//! The intrinsic catalog table.
//!
//! Every native operation has a fixed numeric id (its position in
//! [`Intrinsic::ALL`]), a mnemonic ending in its arity (`int_add2`), and is
//! spelled `__intrinsic__<mnemonic>` in source. Variadic intrinsics end in
//! `_` instead of a digit.
//!
//! The five `v_*` entries are virtual: they touch interpreter state (frames,
//! argument tuples, slots) and are executed by the dispatch loop rather than
//! by the native implementations in `quill_eval`.

use std::fmt;

/// Prefix of source names that lower to a single intrinsic instruction.
pub const INTRINSIC_PREFIX: &str = "__intrinsic__";

/// Prefix of the global functions the generator calls for operators,
/// attribute access, indexing and calls.
pub const BUILTIN_PREFIX: &str = "__builtin__";

/// Number of arguments an intrinsic takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

macro_rules! define_intrinsics {
    (@arity _) => { Arity::Variadic };
    (@arity $n:literal) => { Arity::Fixed($n) };
    ($( $(#[$doc:meta])* $variant:ident = $mnemonic:literal, $arity:tt; )*) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum Intrinsic {
            $( $(#[$doc])* $variant, )*
        }

        impl Intrinsic {
            /// Every intrinsic, indexed by id.
            pub const ALL: &'static [Intrinsic] = &[ $( Intrinsic::$variant, )* ];

            /// Mnemonic used in dumps, e.g. `tuple_idx2`.
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $( Intrinsic::$variant => $mnemonic, )*
                }
            }

            pub const fn arity(self) -> Arity {
                match self {
                    $( Intrinsic::$variant => define_intrinsics!(@arity $arity), )*
                }
            }
        }
    };
}

define_intrinsics! {
    /// Call a closure with an argument tuple.
    Call = "v_call2", 2;
    /// Argument tuple of the running frame.
    Args = "v_args0", 0;
    /// Default tuple of the running closure.
    Defaults = "v_defaults0", 0;
    /// Resume a generator.
    GenNext = "v_gen_next1", 1;
    /// Reset the argument's slot to the uninitialized value.
    Del = "v_del1", 1;
    GenStopped = "gen_stopped1", 1;
    GetGlobal = "get_global0", 0;
    Is = "is2", 2;
    Id = "id1", 1;
    Not = "not1", 1;
    Repr = "repr1", 1;
    GetAttr = "getattr3", 3;
    SetAttr = "setattr3", 3;
    DelAttr = "delattr2", 2;
    ObjNew = "obj_new3", 3;
    ObjGetBase = "obj_get_base1", 1;
    ObjGetType = "obj_get_type1", 1;
    TupleMake = "tuple_make_", _;
    TupleLen = "tuple_len1", 1;
    TupleIdx = "tuple_idx2", 2;
    TupleConcat = "tuple_concat2", 2;
    TupleSplice = "tuple_splice4", 4;
    TupleSlice = "tuple_slice4", 4;
    IntAdd = "int_add2", 2;
    IntSub = "int_sub2", 2;
    IntMul = "int_mul2", 2;
    IntDiv = "int_div2", 2;
    IntMod = "int_mod2", 2;
    IntLt = "int_lt2", 2;
    IntEq = "int_eq2", 2;
    IntToStr = "int_to_str1", 1;
    StrLen = "str_len1", 1;
    StrFind = "str_find4", 4;
    StrSlice = "str_slice4", 4;
    StrToOrd = "str_to_ord1", 1;
    StrToInt = "str_to_int1", 1;
    StrConcat = "str_concat2", 2;
    StrEq = "str_eq2", 2;
    StrLt = "str_lt2", 2;
    DictNew = "dict_new0", 0;
    DictLen = "dict_len1", 1;
    DictGet = "dict_get3", 3;
    DictSet = "dict_set3", 3;
    DictDel = "dict_del2", 2;
    DictToTuple = "dict_to_tuple1", 1;
    Print = "print1", 1;
    Flush = "flush0", 0;
    Input = "input0", 0;
}

impl Intrinsic {
    #[inline]
    pub const fn id(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_id(id: usize) -> Option<Intrinsic> {
        Intrinsic::ALL.get(id).copied()
    }

    /// Look up a source name such as `__intrinsic__int_add2`.
    pub fn from_source_name(name: &str) -> Option<Intrinsic> {
        let mnemonic = name.strip_prefix(INTRINSIC_PREFIX)?;
        Intrinsic::ALL
            .iter()
            .copied()
            .find(|intrinsic| intrinsic.mnemonic() == mnemonic)
    }

    pub fn source_name(self) -> String {
        format!("{INTRINSIC_PREFIX}{}", self.mnemonic())
    }

    /// Executed by the interpreter itself rather than the native table.
    pub const fn is_virtual(self) -> bool {
        matches!(
            self,
            Intrinsic::Call
                | Intrinsic::Args
                | Intrinsic::Defaults
                | Intrinsic::GenNext
                | Intrinsic::Del
        )
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense() {
        for (id, intrinsic) in Intrinsic::ALL.iter().enumerate() {
            assert_eq!(intrinsic.id(), id);
            assert_eq!(Intrinsic::from_id(id), Some(*intrinsic));
        }
        assert_eq!(Intrinsic::from_id(Intrinsic::ALL.len()), None);
    }

    #[test]
    fn mnemonic_suffix_matches_arity() {
        for intrinsic in Intrinsic::ALL {
            let last = intrinsic.mnemonic().chars().last();
            match intrinsic.arity() {
                Arity::Fixed(n) => assert_eq!(last.and_then(|c| c.to_digit(10)), u32::try_from(n).ok()),
                Arity::Variadic => assert_eq!(last, Some('_')),
            }
        }
    }

    #[test]
    fn source_names_resolve() {
        assert_eq!(
            Intrinsic::from_source_name("__intrinsic__int_add2"),
            Some(Intrinsic::IntAdd)
        );
        assert_eq!(
            Intrinsic::from_source_name("__intrinsic__tuple_make_"),
            Some(Intrinsic::TupleMake)
        );
        assert_eq!(Intrinsic::from_source_name("__intrinsic__int_add3"), None);
        assert_eq!(Intrinsic::from_source_name("int_add2"), None);
        assert_eq!(Intrinsic::Print.source_name(), "__intrinsic__print1");
    }

    #[test]
    fn virtual_set() {
        let virtuals: Vec<_> = Intrinsic::ALL.iter().filter(|i| i.is_virtual()).collect();
        assert_eq!(virtuals.len(), 5);
        assert!(virtuals.iter().all(|i| i.mnemonic().starts_with("v_")));
    }
}

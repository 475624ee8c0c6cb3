//! Statement and expression tree.
//!
//! Built by `quill_parse`, simplified by its folding pass, and lowered to
//! HIR by `quill_hir`. Nodes are plain owned trees; the generator walks
//! each one exactly once.

/// Literal constants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(String),
    None,
    Ellipsis,
}

/// Prefix operators. All of them lower to a `__builtin__*` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Pos,
    Neg,
    Inv,
    Not,
}

impl UnaryOp {
    pub fn builtin_name(self) -> &'static str {
        match self {
            UnaryOp::Pos => "pos",
            UnaryOp::Neg => "neg",
            UnaryOp::Inv => "inv",
            UnaryOp::Not => "not",
        }
    }
}

/// Arithmetic infix operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    FloorDiv,
    Mod,
}

impl BinaryOp {
    pub fn builtin_name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::Mod => "mod",
        }
    }
}

/// Short-circuiting `and` / `or`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Comparison operators that may appear in a chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RelationOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    Is,
    IsNot,
}

impl RelationOp {
    /// Builtin implementing the comparison, `None` for the identity tests
    /// which map straight onto the `is2` intrinsic.
    pub fn builtin_name(self) -> Option<&'static str> {
        match self {
            RelationOp::Lt => Some("lt"),
            RelationOp::Gt => Some("gt"),
            RelationOp::Le => Some("le"),
            RelationOp::Ge => Some("ge"),
            RelationOp::Eq => Some("eq"),
            RelationOp::Ne => Some("ne"),
            RelationOp::Is | RelationOp::IsNot => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Name(String),
    Literal(Literal),
    Member {
        object: Box<Expr>,
        member: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Tuple(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `then_expr if cond else else_expr`
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// `operands[0] ops[0] operands[1] ops[1] ...`; always one more operand
    /// than operators.
    Relation {
        operands: Vec<Expr>,
        ops: Vec<RelationOp>,
    },
    Yield(Option<Box<Expr>>),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Expr {
        Expr::Name(name.into())
    }

    pub fn int(value: i64) -> Expr {
        Expr::Literal(Literal::Int(value))
    }

    pub fn str(value: impl Into<String>) -> Expr {
        Expr::Literal(Literal::Str(value.into()))
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }
}

/// Assignment and deletion targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Name(String),
    Tuple(Vec<Pattern>),
    Member { object: Expr, member: String },
    Index { object: Expr, index: Expr },
}

impl Pattern {
    /// Call `f` on every plain name bound by this pattern.
    pub fn for_each_name<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Pattern::Name(name) => f(name),
            Pattern::Tuple(items) => items.iter().for_each(|p| p.for_each_name(f)),
            Pattern::Member { .. } | Pattern::Index { .. } => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    /// `*rest` collecting surplus positional arguments.
    pub rest: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub base: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptClause {
    /// Exception class to match; a bare `except:` matches everything.
    pub kind: Option<Expr>,
    pub binding: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Pass,
    Expr(Expr),
    /// `t1 = t2 = value`: `value` is evaluated once and stored left to right.
    Assign {
        targets: Vec<Pattern>,
        value: Expr,
    },
    Del(Pattern),
    Return(Option<Expr>),
    Raise(Expr),
    Global(Vec<String>),
    Nonlocal(Vec<String>),
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    For {
        target: Pattern,
        iter: Expr,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
    Def(FunctionDef),
    Class(ClassDef),
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptClause>,
    },
}

//! The AST node surface the core consumes: enough shape to drive every
//! statement/expression lowering path in `ssa-build`, without
//! being a real parser's output.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use ssa_ir::{EntityId, Signature};

/// A stable key for the type-and-value map, assigned at construction time
/// by [`NodeIdGen`] rather than computed from tree position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(raw: u32) -> Self {
        NodeId(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Hands out fresh [`NodeId`]s while a fixture tree is built.
#[derive(Debug, Default)]
pub struct NodeIdGen(u32);

impl NodeIdGen {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn next(&mut self) -> NodeId {
        let id = NodeId(self.0);
        self.0 += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Addr,
    Plus,
    Not,
    BitNot,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    AndNot,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicAnd,
    LogicOr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Fallthrough,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Ident {
        id: NodeId,
        entity: EntityId,
    },
    /// The blank identifier `_`: addresses built from it are suppressed.
    BlankIdent {
        id: NodeId,
    },
    ParenExpr {
        id: NodeId,
        inner: Box<Expr>,
    },
    SelectorExpr {
        id: NodeId,
        base: Box<Expr>,
        field: String,
    },
    BasicLit {
        id: NodeId,
    },
    BasicDirective {
        id: NodeId,
        name: String,
    },
    UnaryExpr {
        id: NodeId,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinaryExpr {
        id: NodeId,
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    ProcLit {
        id: NodeId,
        signature: Signature,
        body: Box<Stmt>,
    },
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Ident { id, .. }
            | Expr::BlankIdent { id }
            | Expr::ParenExpr { id, .. }
            | Expr::SelectorExpr { id, .. }
            | Expr::BasicLit { id }
            | Expr::BasicDirective { id, .. }
            | Expr::UnaryExpr { id, .. }
            | Expr::BinaryExpr { id, .. }
            | Expr::ProcLit { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    EmptyStmt {
        id: NodeId,
    },
    BlockStmt {
        id: NodeId,
        stmts: Vec<Stmt>,
    },
    UsingStmt {
        id: NodeId,
        decls: Vec<Stmt>,
    },
    WhenStmt {
        id: NodeId,
        cond: Expr,
        body: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    IncDecStmt {
        id: NodeId,
        target: Expr,
        op: IncDecOp,
    },
    ValueDecl {
        id: NodeId,
        is_var: bool,
        names: Vec<Option<EntityId>>,
        inits: Vec<Expr>,
    },
    AssignStmt {
        id: NodeId,
        op: AssignOp,
        lhs: Vec<Expr>,
        rhs: Vec<Expr>,
    },
    ExprStmt {
        id: NodeId,
        expr: Expr,
    },
    DeferStmt {
        id: NodeId,
        stmt: Box<Stmt>,
    },
    ReturnStmt {
        id: NodeId,
        results: Vec<Expr>,
    },
    IfStmt {
        id: NodeId,
        init: Option<Box<Stmt>>,
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    ForStmt {
        id: NodeId,
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    RangeStmt {
        id: NodeId,
        subject: Expr,
        body: Box<Stmt>,
    },
    MatchStmt {
        id: NodeId,
        subject: Expr,
        cases: Vec<(Vec<Expr>, Stmt)>,
    },
    TypeMatchStmt {
        id: NodeId,
        subject: Expr,
        cases: Vec<Stmt>,
    },
    BranchStmt {
        id: NodeId,
        kind: BranchKind,
        label: Option<String>,
    },
    PushAllocator {
        id: NodeId,
        expr: Expr,
        body: Box<Stmt>,
    },
    PushContext {
        id: NodeId,
        expr: Expr,
        body: Box<Stmt>,
    },
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        match self {
            Stmt::EmptyStmt { id }
            | Stmt::BlockStmt { id, .. }
            | Stmt::UsingStmt { id, .. }
            | Stmt::WhenStmt { id, .. }
            | Stmt::IncDecStmt { id, .. }
            | Stmt::ValueDecl { id, .. }
            | Stmt::AssignStmt { id, .. }
            | Stmt::ExprStmt { id, .. }
            | Stmt::DeferStmt { id, .. }
            | Stmt::ReturnStmt { id, .. }
            | Stmt::IfStmt { id, .. }
            | Stmt::ForStmt { id, .. }
            | Stmt::RangeStmt { id, .. }
            | Stmt::MatchStmt { id, .. }
            | Stmt::TypeMatchStmt { id, .. }
            | Stmt::BranchStmt { id, .. }
            | Stmt::PushAllocator { id, .. }
            | Stmt::PushContext { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_gen_hands_out_distinct_ids() {
        let mut gen = NodeIdGen::new();
        let a = gen.next();
        let b = gen.next();
        assert_ne!(a, b);
    }

    #[test]
    fn expr_id_reaches_through_every_variant() {
        let mut gen = NodeIdGen::new();
        let id = gen.next();
        let e = Expr::BlankIdent { id };
        assert_eq!(e.id(), id);
    }
}

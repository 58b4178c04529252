//! Stand-in for the lexer/parser/checker collaborator: just enough AST,
//! entity table, type-and-value map, and dependency analysis to drive
//! and test `ssa-build`.

#![no_std]

extern crate alloc;

pub mod ast;
pub mod dependency;
pub mod entity;
pub mod error;
pub mod selector;
pub mod type_and_value;

pub use ast::{AssignOp, BinaryOp, BranchKind, Expr, IncDecOp, NodeId, NodeIdGen, Stmt, UnaryOp};
pub use dependency::DependencyGraph;
pub use entity::{Entity, EntityKind, EntityTable, Scope};
pub use error::FrontendError;
pub use selector::lookup_field;
pub use type_and_value::{AddressingMode, TypeAndValue, TypeAndValueMap};

pub use ssa_ir::{BuildContext, EntityId, EntityRef, ExactValue, Signature, Type, WordSize};

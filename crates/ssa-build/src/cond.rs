//! Condition lowering shared by short-circuit boolean expressions and
//! `if`/`for` statements.

use ssa_frontend::{BinaryOp, Expr, UnaryOp};
use ssa_ir::BlockId;

use crate::builder::Builder;

fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::ParenExpr { inner, .. } => unwrap_paren(inner),
        other => other,
    }
}

impl<'f> Builder<'f> {
    /// Wire the current block so that `cond` branches to `yes` when true
    /// and `no` when false, recursing through `!`, `&&`, `||` and
    /// parentheses instead of materializing a boolean value for them, so
    /// that `if a && b` emits one fewer branch than computing `a && b` as
    /// a value first.
    pub fn build_cond(&mut self, cond: &Expr, yes: BlockId, no: BlockId) {
        match unwrap_paren(cond) {
            Expr::UnaryExpr { op: UnaryOp::Not, operand, .. } => self.build_cond(operand, no, yes),
            Expr::BinaryExpr { op: BinaryOp::LogicAnd, lhs, rhs, .. } => {
                let mid = self.proc.new_named_block(ssa_ir::BlockKind::Plain, "cond.and".into());
                self.build_cond(lhs, mid, no);
                self.proc.end_block();
                self.proc.start_block(mid);
                self.build_cond(rhs, yes, no);
            }
            Expr::BinaryExpr { op: BinaryOp::LogicOr, lhs, rhs, .. } => {
                let mid = self.proc.new_named_block(ssa_ir::BlockKind::Plain, "cond.or".into());
                self.build_cond(lhs, yes, mid);
                self.proc.end_block();
                self.proc.start_block(mid);
                self.build_cond(rhs, yes, no);
            }
            other => {
                let value = self.build_expr(other);
                self.proc.emit_if(value, yes, no);
            }
        }
    }
}

//! The `Value` node: one instruction, one result.
//!
//! A `Value` is both the instruction and the SSA name of its result,
//! in the style of an `r5-ir::Inst`/`lpc-lpir` instruction-data record
//! rather than splitting the two.

use alloc::string::String;
use smallvec::SmallVec;

use crate::entity::{BlockId, ValueId};
use crate::exact_value::ExactValue;
use crate::opcode::Opcode;
use crate::types::Type;

/// Inline capacity for a value's argument list. Most opcodes take 0-3
/// operands; `PtrIndex`/`ValueIndex` and `Phi` merges are the ones that
/// can grow past this, at which point `SmallVec` spills to the heap.
pub type ValueArgs = SmallVec<[ValueId; 8]>;

#[derive(Debug, Clone)]
pub struct Value {
    pub id: ValueId,
    pub op: Opcode,
    pub ty: Type,
    pub block: BlockId,
    pub args: ValueArgs,
    /// Reference count: how many other values use this one as an operand,
    /// plus any external hold (e.g. being a block's `control`). Maintained
    /// incrementally by `Procedure` as args are attached/detached.
    pub uses: u32,
    /// Present for `Const*` opcodes; `None` otherwise.
    pub exact_value: Option<ExactValue>,
    /// Optional human-readable annotation attached at a handful of
    /// construction sites for debug dumps.
    pub comment: Option<String>,
}

impl Value {
    pub fn new(id: ValueId, op: Opcode, ty: Type, block: BlockId) -> Self {
        Self {
            id,
            op,
            ty,
            block,
            args: ValueArgs::new(),
            uses: 0,
            exact_value: None,
            comment: None,
        }
    }

    pub fn with_args(mut self, args: ValueArgs) -> Self {
        self.args = args;
        self
    }

    pub fn with_exact_value(mut self, ev: ExactValue) -> Self {
        self.exact_value = Some(ev);
        self
    }

    pub fn is_const(&self) -> bool {
        self.exact_value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_value_has_no_uses_and_no_args() {
        let v = Value::new(ValueId::new(0), Opcode::Invalid, Type::Invalid, BlockId::new(0));
        assert_eq!(v.uses, 0);
        assert!(v.args.is_empty());
        assert!(!v.is_const());
    }

    #[test]
    fn with_exact_value_marks_value_const() {
        let v = Value::new(ValueId::new(0), Opcode::Const32, Type::I32, BlockId::new(0))
            .with_exact_value(ExactValue::Integer(7));
        assert!(v.is_const());
    }
}

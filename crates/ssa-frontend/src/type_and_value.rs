//! The checker's per-node type-and-value records.

use alloc::collections::BTreeMap;

use ssa_ir::{ExactValue, Type};

use crate::ast::NodeId;

/// `mode` in the checker's "type-and-value" record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Invalid,
    Constant,
    Variable,
    Type,
    Value,
}

#[derive(Debug, Clone)]
pub struct TypeAndValue {
    pub ty: Type,
    pub mode: AddressingMode,
    pub value: Option<ExactValue>,
}

impl TypeAndValue {
    pub fn variable(ty: Type) -> Self {
        Self {
            ty,
            mode: AddressingMode::Variable,
            value: None,
        }
    }

    pub fn constant(ty: Type, value: ExactValue) -> Self {
        Self {
            ty,
            mode: AddressingMode::Constant,
            value: Some(value),
        }
    }

    pub fn value(ty: Type) -> Self {
        Self {
            ty,
            mode: AddressingMode::Value,
            value: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeAndValueMap {
    entries: BTreeMap<NodeId, TypeAndValue>,
}

impl TypeAndValueMap {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, node: NodeId, tv: TypeAndValue) {
        self.entries.insert(node, tv);
    }

    pub fn get(&self, node: NodeId) -> Option<&TypeAndValue> {
        self.entries.get(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_records_round_trip() {
        let mut map = TypeAndValueMap::new();
        let node = NodeId::new(1);
        map.insert(node, TypeAndValue::constant(Type::I32, ExactValue::Integer(7)));
        let tv = map.get(node).unwrap();
        assert_eq!(tv.mode, AddressingMode::Constant);
        assert_eq!(tv.value, Some(ExactValue::Integer(7)));
    }
}

//! Shared fixtures for this crate's unit tests.

use ssa_frontend::{EntityTable, NodeId, TypeAndValueMap};
use ssa_ir::{BuildContext, ProcId, Signature, WordSize};

use crate::builder::Builder;

pub fn empty_tables() -> (EntityTable, TypeAndValueMap) {
    (EntityTable::new(), TypeAndValueMap::new())
}

pub fn test_builder<'f>(entities: &'f EntityTable, types: &'f TypeAndValueMap) -> Builder<'f> {
    Builder::new(
        BuildContext::new(WordSize::W64),
        entities,
        types,
        ProcId::new(0),
        "test".into(),
        Signature::empty(),
    )
}

pub fn node(n: u32) -> NodeId {
    NodeId::new(n)
}

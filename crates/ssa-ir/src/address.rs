//! Lvalue descriptors (`ssa_addr`).
//!
//! An `Address` names a storage location without yet deciding whether it
//! will be read through a `Load` or written through a `Store`; the builder
//! resolves that when the lvalue is finally used.

use crate::entity::ValueId;

/// How an address's backing storage should be written through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// An ordinary pointer-backed lvalue: `Store`/`Load` through `value`.
    Default,
    /// A map-index lvalue: assignment lowers to a distinct map-set
    /// operation rather than a plain `Store`, since the backing
    /// storage isn't a flat pointer.
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    /// The pointer (or, for `AddressKind::Map`, the map handle) this
    /// address is relative to.
    pub value: ValueId,
    pub kind: AddressKind,
}

impl Address {
    pub fn new(value: ValueId) -> Self {
        Self {
            value,
            kind: AddressKind::Default,
        }
    }

    pub fn map(value: ValueId) -> Self {
        Self {
            value,
            kind: AddressKind::Map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constructor_produces_default_kind() {
        let a = Address::new(ValueId::new(0));
        assert_eq!(a.kind, AddressKind::Default);
    }
}

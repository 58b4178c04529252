//! Entity table: definitions the checker would have produced
//! ("entity tables — definitions, uses").

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use ssa_ir::{EntityId, EntityRef, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Var,
    Param,
    Const,
    Proc,
    TypeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    File,
    Local,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub ty: Type,
    pub scope: Scope,
    /// Set for entities declared inside a `using` clause: the entity
    /// whose storage this one projects a field out of.
    pub using_parent: Option<EntityId>,
    /// Source file this entity was declared in, for mangling
    /// (`<basename>-<fileId>.<name>`).
    pub file_id: u32,
    pub basename: String,
    /// Tagged for export: the link name is the original name, unmangled.
    pub exported: bool,
    /// An explicit link name, overriding every other naming rule.
    pub link_name: Option<String>,
    /// A foreign declaration: keep the original name, never mangled.
    pub foreign: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    entities: BTreeMap<EntityId, Entity>,
    next: u32,
}

impl EntityTable {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next: 0,
        }
    }

    pub fn declare(&mut self, kind: EntityKind, name: String, ty: Type, scope: Scope) -> EntityId {
        let id = EntityId::from_index(self.next as usize);
        self.next += 1;
        self.entities.insert(
            id,
            Entity {
                id,
                kind,
                name,
                ty,
                scope,
                using_parent: None,
                file_id: 0,
                basename: String::new(),
                exported: false,
                link_name: None,
                foreign: false,
            },
        );
        id
    }

    pub fn set_using_parent(&mut self, id: EntityId, parent: EntityId) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.using_parent = Some(parent);
        }
    }

    pub fn set_file(&mut self, id: EntityId, file_id: u32, basename: String) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.file_id = file_id;
            e.basename = basename;
        }
    }

    pub fn set_exported(&mut self, id: EntityId) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.exported = true;
        }
    }

    pub fn set_link_name(&mut self, id: EntityId, name: String) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.link_name = Some(name);
        }
    }

    pub fn set_foreign(&mut self, id: EntityId) {
        if let Some(e) = self.entities.get_mut(&id) {
            e.foreign = true;
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn file_scope_entities(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.scope == Scope::File)
            .map(|e| e.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_assigns_increasing_ids() {
        let mut table = EntityTable::new();
        let a = table.declare(EntityKind::Var, "a".into(), Type::I32, Scope::Local);
        let b = table.declare(EntityKind::Var, "b".into(), Type::I32, Scope::Local);
        assert_ne!(a, b);
        assert_eq!(table.get(a).unwrap().name, "a");
    }

    #[test]
    fn file_scope_entities_excludes_locals() {
        let mut table = EntityTable::new();
        let _local = table.declare(EntityKind::Var, "x".into(), Type::I32, Scope::Local);
        let main = table.declare(EntityKind::Proc, "main".into(), Type::Invalid, Scope::File);
        assert_eq!(table.file_scope_entities(), alloc::vec![main]);
    }
}

//! The module-level assembly driver: symbol naming, minimum-dependency
//! enumeration, and turning an entry point's AST body into a printed
//! module.
//!
//! Only the entry point gets a lowered body: this frontend stand-in has
//! no AST bodies for the other file-scope procedures the dependency walk
//! discovers, so they're assembled as empty stubs that still take part in
//! naming and in the printed module (see DESIGN.md).

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;

use ssa_frontend::{DependencyGraph, Entity, EntityKind, EntityTable, Stmt, TypeAndValueMap};
use ssa_ir::{BuildContext, EntityId, Module, ProcId, Procedure, Signature};

use crate::builder::Builder;

/// How a procedure's emitted name is derived (`ssa_mangled_name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Tagged for export: keep the declared name verbatim.
    Export,
    /// An explicit link name overrides every other rule.
    LinkName,
    /// A foreign declaration: keep the original name, never mangled.
    Foreign,
    /// The program's entry point: always `main`.
    EntryPoint,
    /// An ordinary internal procedure: `<basename>-<fileId>.<name>`.
    Internal,
}

/// Pick the link kind an entity's own declaration tags call for. Foreign
/// and explicit-link-name declarations win over a plain export tag since
/// they pin the emitted symbol to something outside this module's
/// control.
fn link_kind_for(entity: &Entity) -> LinkKind {
    if entity.foreign {
        LinkKind::Foreign
    } else if entity.link_name.is_some() {
        LinkKind::LinkName
    } else if entity.exported {
        LinkKind::Export
    } else {
        LinkKind::Internal
    }
}

pub fn mangled_name(
    kind: LinkKind,
    original_name: &str,
    link_name: Option<&str>,
    basename: &str,
    file_id: u32,
    overload_suffix: Option<EntityId>,
) -> String {
    match kind {
        LinkKind::Export | LinkKind::Foreign => original_name.into(),
        LinkKind::LinkName => link_name.unwrap_or(original_name).into(),
        LinkKind::EntryPoint => "main".into(),
        LinkKind::Internal => match overload_suffix {
            Some(id) => format!("{basename}-{file_id}.{original_name}.{}", id.index()),
            None => format!("{basename}-{file_id}.{original_name}"),
        },
    }
}

/// Lower `entry`'s body into a `Module`, after stubbing in every other
/// `proc` entity the minimum-dependency walk proves reachable.
pub fn build_module(
    ctx: BuildContext,
    entities: &EntityTable,
    types: &TypeAndValueMap,
    deps: &DependencyGraph,
    entry: EntityId,
    entry_body: &Stmt,
) -> Module {
    let mut module = Module::new();
    module.entry_point = Some(entry);
    let reachable = deps.minimum_dependency_set(entry);

    let candidates: alloc::vec::Vec<EntityId> = entities
        .file_scope_entities()
        .into_iter()
        .filter(|c| *c != entry && reachable.contains(c))
        .collect();

    // Two procedures sharing a (file, name) pair are overloads; each gets
    // its declaring entity's identity folded into the mangled name so the
    // symbols stay distinct.
    let mut name_counts: BTreeMap<(u32, &str), u32> = BTreeMap::new();
    for candidate in &candidates {
        let entity = entities
            .get(*candidate)
            .unwrap_or_else(|| panic!("dependency graph referenced unknown entity {candidate}"));
        if entity.kind != EntityKind::Proc {
            continue;
        }
        *name_counts.entry((entity.file_id, entity.name.as_str())).or_insert(0) += 1;
    }

    for candidate in candidates {
        let entity = entities
            .get(candidate)
            .unwrap_or_else(|| panic!("dependency graph referenced unknown entity {candidate}"));
        if entity.kind != EntityKind::Proc {
            continue;
        }
        let overload_suffix = (name_counts[&(entity.file_id, entity.name.as_str())] > 1).then_some(candidate);
        let kind = link_kind_for(entity);
        let name = mangled_name(
            kind,
            &entity.name,
            entity.link_name.as_deref(),
            &entity.basename,
            entity.file_id,
            overload_suffix,
        );
        module.add_proc(Procedure::new(ProcId::new(0), name, Signature::empty()));
    }

    let entry_entity = entities
        .get(entry)
        .unwrap_or_else(|| panic!("entry point {entry} is not in the entity table"));
    let name = mangled_name(LinkKind::EntryPoint, &entry_entity.name, None, "", 0, None);

    let mut builder = Builder::new(ctx, entities, types, ProcId::new(0), name, Signature::empty());
    builder.proc.start_block(builder.proc.entry);
    builder.build_stmt(entry_body);
    if builder.proc.curr_block.is_some() {
        let exit = builder.proc.exit;
        builder.proc.emit_jump(exit);
        builder.proc.end_block();
    }
    module.add_proc(builder.finish());

    module
}

pub fn print_module(module: &Module) -> String {
    ssa_ir::printer::print_module(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssa_frontend::{DependencyGraph, Scope};

    #[test]
    fn mangled_name_entry_point_is_always_main() {
        let n = mangled_name(LinkKind::EntryPoint, "run", None, "prog", 3, None);
        assert_eq!(n, "main");
    }

    #[test]
    fn mangled_name_internal_embeds_basename_and_file_id() {
        let n = mangled_name(LinkKind::Internal, "helper", None, "prog", 3, None);
        assert_eq!(n, "prog-3.helper");
    }

    #[test]
    fn mangled_name_internal_overload_appends_entity_address() {
        let n = mangled_name(LinkKind::Internal, "helper", None, "prog", 3, Some(EntityId::new(2)));
        assert_eq!(n, "prog-3.helper.2");
    }

    #[test]
    fn mangled_name_link_name_overrides_original() {
        let n = mangled_name(LinkKind::LinkName, "helper", Some("c_helper"), "prog", 3, None);
        assert_eq!(n, "c_helper");
    }

    #[test]
    fn mangled_name_export_and_foreign_keep_the_original_name() {
        assert_eq!(mangled_name(LinkKind::Export, "run", None, "prog", 3, None), "run");
        assert_eq!(mangled_name(LinkKind::Foreign, "run", None, "prog", 3, None), "run");
    }

    #[test]
    fn link_kind_for_follows_entity_tags() {
        let mut entities = EntityTable::new();
        let exported = entities.declare(EntityKind::Proc, "a".into(), ssa_ir::Type::Invalid, Scope::File);
        entities.set_exported(exported);
        assert_eq!(link_kind_for(entities.get(exported).unwrap()), LinkKind::Export);

        let named = entities.declare(EntityKind::Proc, "b".into(), ssa_ir::Type::Invalid, Scope::File);
        entities.set_link_name(named, "c_b".into());
        assert_eq!(link_kind_for(entities.get(named).unwrap()), LinkKind::LinkName);

        let foreign = entities.declare(EntityKind::Proc, "c".into(), ssa_ir::Type::Invalid, Scope::File);
        entities.set_foreign(foreign);
        assert_eq!(link_kind_for(entities.get(foreign).unwrap()), LinkKind::Foreign);

        let plain = entities.declare(EntityKind::Proc, "d".into(), ssa_ir::Type::Invalid, Scope::File);
        assert_eq!(link_kind_for(entities.get(plain).unwrap()), LinkKind::Internal);
    }

    #[test]
    fn build_module_lowers_the_entry_body_and_closes_every_block() {
        let mut entities = EntityTable::new();
        let entry = entities.declare(EntityKind::Proc, "run".into(), ssa_ir::Type::Invalid, Scope::File);
        let types = TypeAndValueMap::new();
        let deps = DependencyGraph::new();
        let ctx = BuildContext::new(ssa_ir::WordSize::W64);
        let body = Stmt::EmptyStmt { id: ssa_frontend::NodeId::new(0) };
        let module = build_module(ctx, &entities, &types, &deps, entry, &body);
        assert_eq!(module.entry_point, Some(entry));
        let (_, proc) = module.procs.iter().find(|(_, p)| p.name == "main").unwrap();
        for (_, block) in proc.blocks.iter() {
            if block.kind != ssa_ir::BlockKind::Exit {
                assert!(block.is_terminated(), "block {:?} left open", block.kind);
            }
        }
    }
}

//! Lvalue construction (`ssa_build_addr`).

use ssa_frontend::{lookup_field, AddressingMode, Expr};
use ssa_ir::{Address, Opcode, Type, ValueArgs};

use crate::builder::Builder;

impl<'f> Builder<'f> {
    /// Resolve `expr` to the [`Address`] describing its storage.
    pub fn build_addr(&mut self, expr: &Expr) -> Address {
        match expr {
            Expr::BlankIdent { .. } => {
                // `build_assign`/`build_value_decl` special-case this
                // variant themselves and never call into here; this arm
                // only exists so any other caller addressing a blank
                // sub-expression still gets a typed, storage-free address
                // back instead of a panic.
                let local = self.proc.new_value(Opcode::Local, Type::pointer(Type::Invalid), ValueArgs::new());
                Address::new(local)
            }
            Expr::Ident { entity, .. } => {
                let value = self
                    .proc
                    .address_from_load_or_generate_local(*entity)
                    .value;
                Address::new(value)
            }
            Expr::ParenExpr { inner, .. } => self.build_addr(inner),
            Expr::SelectorExpr { base, field, id, .. } => {
                let tv = self
                    .types
                    .get(base.id())
                    .unwrap_or_else(|| panic!("no type-and-value record for {}", base.id()));
                if tv.mode == AddressingMode::Type {
                    panic!("SelectorExpr on a type (Addressing_Type) is unsupported at {id}");
                }
                let base_addr = self.build_addr(base);
                let base_ty = self.proc.values.get(base_addr.value).ty.clone();
                let pointee = base_ty
                    .type_deref()
                    .unwrap_or_else(|| panic!("selector base is not a pointer at {id}"))
                    .clone();
                let index = lookup_field(&pointee, field)
                    .unwrap_or_else(|| panic!("no field `{field}` on {pointee:?}"));
                let projected = self.emit_ptr_index(base_addr.value, index, &pointee);
                Address::new(projected)
            }
            other => panic!("build_addr: unsupported expression shape {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::*;

    #[test]
    fn ident_address_resolves_registered_local() {
        let (entities, types) = empty_tables();
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let entity = ssa_ir::EntityId::new(0);
        let want = b.proc.add_local_generated(entity, Type::I32);
        let got = b.build_addr(&Expr::Ident { id: node(0), entity });
        assert_eq!(got.value, want.value);
    }
}

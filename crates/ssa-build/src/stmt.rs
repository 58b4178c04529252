//! Statement lowering: the AST statement forms this core commits to,
//! built over `build_expr`/`build_addr`/`build_cond`.

use alloc::vec::Vec;

use ssa_frontend::{AssignOp, BranchKind, Expr, Stmt};
use ssa_ir::{BlockId, BlockKind, Opcode, TargetFrame, Type, ValueArgs, ValueId};

use crate::builder::Builder;

impl<'f> Builder<'f> {
    pub fn build_stmt(&mut self, stmt: &Stmt) {
        if self.proc.curr_block.is_none() {
            let dead = self.proc.new_block(BlockKind::Plain);
            self.proc.start_block(dead);
        }
        match stmt {
            Stmt::EmptyStmt { .. } => {}
            Stmt::BlockStmt { stmts, .. } => {
                for s in stmts {
                    self.build_stmt(s);
                }
            }
            Stmt::UsingStmt { decls, .. } => {
                for s in decls {
                    self.build_stmt(s);
                }
            }
            Stmt::WhenStmt { cond, body, else_branch, .. } => {
                let tv = self
                    .types
                    .get(cond.id())
                    .unwrap_or_else(|| panic!("no type-and-value record for {}", cond.id()));
                let taken = tv
                    .value
                    .as_ref()
                    .and_then(|v| v.as_bool())
                    .unwrap_or_else(|| panic!("when-condition at {} is not a compile-time bool", cond.id()));
                if taken {
                    self.build_stmt(body);
                } else if let Some(else_branch) = else_branch {
                    self.build_stmt(else_branch);
                }
            }
            Stmt::ValueDecl { names, inits, .. } => self.build_value_decl(names, inits),
            Stmt::AssignStmt { op, lhs, rhs, .. } => self.build_assign(*op, lhs, rhs),
            Stmt::ExprStmt { expr, .. } => {
                self.build_expr(expr);
            }
            Stmt::IncDecStmt { target, op, .. } => self.build_inc_dec(target, *op),
            Stmt::IfStmt { init, cond, then_branch, else_branch, .. } => {
                self.build_if(init.as_deref(), cond, then_branch, else_branch.as_deref())
            }
            Stmt::ForStmt { init, cond, post, body, .. } => {
                self.build_for(init.as_deref(), cond.as_ref(), post.as_deref(), body)
            }
            Stmt::BranchStmt { kind, label, .. } => self.build_branch(*kind, label.as_deref()),
            other => panic!("build_stmt: unsupported statement shape {other:?}"),
        }
    }

    fn build_value_decl(&mut self, names: &[Option<ssa_ir::EntityId>], inits: &[Expr]) {
        if inits.is_empty() {
            for name in names.iter().flatten() {
                let ty = self
                    .entities
                    .get(*name)
                    .unwrap_or_else(|| panic!("no entity record for {name}"))
                    .ty
                    .clone();
                self.add_local(*name, ty, None);
            }
            return;
        }
        // Lvalues first, then initializers, so a later initializer can't
        // observe storage an earlier one hasn't been allocated yet.
        let addrs: Vec<Option<ValueId>> = names
            .iter()
            .map(|name| {
                name.map(|name| {
                    let ty = self
                        .entities
                        .get(name)
                        .unwrap_or_else(|| panic!("no entity record for {name}"))
                        .ty
                        .clone();
                    self.add_local(name, ty, None).value
                })
            })
            .collect();
        let flat = self.flatten_initializers(inits);
        assert_eq!(
            addrs.len(),
            flat.len(),
            "value declaration arity mismatch after destructuring: {} names, {} values",
            addrs.len(),
            flat.len()
        );
        for (addr, value) in addrs.into_iter().zip(flat) {
            let Some(addr) = addr else { continue };
            self.store(addr, value);
        }
    }

    fn build_assign(&mut self, op: AssignOp, lhs: &[Expr], rhs: &[Expr]) {
        match op {
            AssignOp::Assign => {
                let values = if lhs.len() == rhs.len() {
                    rhs.iter().map(|e| self.build_expr(e)).collect()
                } else {
                    self.flatten_initializers(rhs)
                };
                assert_eq!(
                    lhs.len(),
                    values.len(),
                    "assignment arity mismatch after destructuring: {} targets, {} values",
                    lhs.len(),
                    values.len()
                );
                for (target, value) in lhs.iter().zip(values) {
                    if matches!(target, Expr::BlankIdent { .. }) {
                        continue;
                    }
                    let addr = self.build_addr(target);
                    self.store(addr.value, value);
                }
            }
            other => panic!("compound assignment operator {other:?} is not supported by this core"),
        }
    }

    /// Evaluate each initializer expression, flattening any tuple-typed
    /// result into its per-element values via `PtrIndex` projection, per
    /// `x, y := f()`.
    fn flatten_initializers(&mut self, inits: &[Expr]) -> Vec<ValueId> {
        let mut flat = Vec::new();
        for init in inits {
            let value = self.build_expr(init);
            let ty = self.proc.values.get(value).ty.clone();
            match ty.base_type() {
                Type::Tuple(elems) => {
                    let count = elems.len();
                    let addr = self.address_from_load_or_generate_local(value);
                    for i in 0..count {
                        let ptr = self.emit_ptr_index(addr, i, &ty);
                        flat.push(self.load_for_addr(ptr));
                    }
                }
                _ => flat.push(value),
            }
        }
        flat
    }

    fn build_inc_dec(&mut self, target: &ssa_frontend::Expr, op: ssa_frontend::IncDecOp) {
        use ssa_frontend::IncDecOp;
        let addr = self.build_addr(target);
        let old = self.load_for_addr(addr.value);
        let ty = self.proc.values.get(old).ty.clone();
        let one = self.proc.const_int(self.ctx, &ty, 1);
        let add_opcode = crate::expr::determine_op(
            self.ctx,
            match op {
                IncDecOp::Inc => ssa_frontend::BinaryOp::Add,
                IncDecOp::Dec => ssa_frontend::BinaryOp::Sub,
            },
            &ty,
        );
        let mut args = ValueArgs::new();
        args.push(old);
        args.push(one);
        let next = self.proc.new_value(add_opcode, ty, args);
        self.store(addr.value, next);
    }

    fn load_for_addr(&mut self, addr: ssa_ir::ValueId) -> ssa_ir::ValueId {
        let ty = self.proc.values.get(addr).ty.clone();
        let pointee = ty.type_deref().unwrap().clone();
        let mut args = ValueArgs::new();
        args.push(addr);
        self.proc.new_value(Opcode::Load, pointee, args)
    }

    /// `ssa_addr_store`: a compile-time `nil` carries no width of its
    /// own until it lands in a typed slot, so a bare
    /// `ConstNil` is re-widened to the address's pointee type before the
    /// `Store` is emitted, matching `ssa.c`'s own store-time nil coercion.
    fn store(&mut self, addr: ssa_ir::ValueId, value: ssa_ir::ValueId) {
        let value = if self.proc.values.get(value).op == Opcode::ConstNil {
            let pointee = self.proc.values.get(addr).ty.type_deref().unwrap().clone();
            self.emit_conv(value, pointee)
        } else {
            value
        };
        let mut args = ValueArgs::new();
        args.push(addr);
        args.push(value);
        self.proc.new_value(Opcode::Store, Type::Invalid, args);
    }

    /// Terminate the current block with a jump to `target`, unless it was
    /// already closed by a nested terminator (`return`/`break`/`continue`
    /// inside the branch just built).
    fn close_into(&mut self, target: BlockId) {
        if self.proc.curr_block.is_some() {
            self.proc.emit_jump(target);
            self.proc.end_block();
        }
    }

    fn build_if(
        &mut self,
        init: Option<&Stmt>,
        cond: &ssa_frontend::Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) {
        if let Some(init) = init {
            self.build_stmt(init);
        }
        let then_block = self.proc.new_named_block(BlockKind::Plain, "if.then".into());
        let done_block = self.proc.new_named_block(BlockKind::Plain, "if.done".into());
        let else_block = if else_branch.is_some() {
            self.proc.new_named_block(BlockKind::Plain, "if.else".into())
        } else {
            done_block
        };

        self.build_cond(cond, then_block, else_block);
        self.proc.end_block();

        self.proc.start_block(then_block);
        self.build_stmt(then_branch);
        self.close_into(done_block);

        if let Some(else_branch) = else_branch {
            self.proc.start_block(else_block);
            self.build_stmt(else_branch);
            self.close_into(done_block);
        }

        self.proc.start_block(done_block);
    }

    fn build_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&ssa_frontend::Expr>,
        post: Option<&Stmt>,
        body: &Stmt,
    ) {
        if let Some(init) = init {
            self.build_stmt(init);
        }
        let loop_block = self.proc.new_named_block(BlockKind::Plain, "for.loop".into());
        let body_block = self.proc.new_named_block(BlockKind::Plain, "for.body".into());
        let post_block = self.proc.new_named_block(BlockKind::Plain, "for.post".into());
        let done_block = self.proc.new_named_block(BlockKind::Plain, "for.done".into());

        self.proc.emit_jump(loop_block);
        self.proc.end_block();
        self.proc.start_block(loop_block);
        match cond {
            Some(cond) => self.build_cond(cond, body_block, done_block),
            None => self.proc.emit_jump(body_block),
        }
        self.proc.end_block();

        self.proc.target_list.push(TargetFrame {
            break_: Some(done_block),
            continue_: Some(post_block),
            fallthrough_: None,
            label: None,
        });
        self.proc.start_block(body_block);
        self.build_stmt(body);
        self.close_into(post_block);
        self.proc.target_list.pop();

        self.proc.start_block(post_block);
        if let Some(post) = post {
            self.build_stmt(post);
        }
        self.proc.emit_jump(loop_block);
        self.proc.end_block();

        self.proc.start_block(done_block);
    }

    fn build_branch(&mut self, kind: BranchKind, label: Option<&str>) {
        let frame = self
            .proc
            .target_list
            .find(label)
            .unwrap_or_else(|| panic!("no enclosing loop/switch for {kind:?}"))
            .clone();
        let target = match kind {
            BranchKind::Break => frame.break_,
            BranchKind::Continue => frame.continue_,
            BranchKind::Fallthrough => frame.fallthrough_,
        }
        .unwrap_or_else(|| panic!("{kind:?} has no target in the enclosing frame"));
        self.proc.emit_jump(target);
        self.proc.end_block();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::*;
    use ssa_frontend::{ExactValue, TypeAndValue};

    #[test]
    fn value_decl_without_initializer_zero_inits_only() {
        let (_, types) = empty_tables();
        let mut entities = ssa_frontend::EntityTable::new();
        let entity = entities.declare(
            ssa_frontend::EntityKind::Var,
            "x".into(),
            Type::I32,
            ssa_frontend::Scope::Local,
        );
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        b.build_value_decl(&[Some(entity)], &[]);
        let addr = b.proc.lookup_local(entity).unwrap();
        assert_eq!(b.proc.values.get(addr).op, Opcode::Local);
    }

    #[test]
    fn store_rewidens_a_bare_nil_to_the_pointee_type() {
        let (entities, mut types) = empty_tables();
        let nil_id = node(0);
        types.insert(nil_id, TypeAndValue::constant(Type::Invalid, ExactValue::Invalid));
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let entity = ssa_ir::EntityId::new(0);
        let addr = b.proc.add_local_generated(entity, Type::pointer(Type::I32));
        let nil_value = b.build_expr(&ssa_frontend::Expr::Ident { id: nil_id, entity });
        b.store(addr.value, nil_value);
        let (_, stored) = b
            .proc
            .values
            .iter()
            .find(|(_, v)| v.op == Opcode::Store)
            .unwrap();
        let stored_nil = b.proc.values.get(stored.args[1]);
        assert_eq!(stored_nil.op, Opcode::ConstNil);
        assert_eq!(stored_nil.ty, Type::pointer(Type::I32));
    }

    #[test]
    fn if_without_else_joins_directly_into_done() {
        let (entities, mut types) = empty_tables();
        let cond_id = node(0);
        types.insert(cond_id, TypeAndValue::constant(Type::Bool, ExactValue::Bool(true)));
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let cond = ssa_frontend::Expr::Ident { id: cond_id, entity: ssa_ir::EntityId::new(0) };
        let then_branch = Stmt::EmptyStmt { id: node(1) };
        b.build_if(None, &cond, &then_branch, None);
        let curr = b.proc.curr_block.unwrap();
        assert!(!b.proc.blocks.get(curr).is_terminated());
    }

    #[test]
    fn for_loop_wires_break_and_continue_targets() {
        let (entities, mut types) = empty_tables();
        let cond_id = node(0);
        types.insert(cond_id, TypeAndValue::constant(Type::Bool, ExactValue::Bool(true)));
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let cond = ssa_frontend::Expr::Ident { id: cond_id, entity: ssa_ir::EntityId::new(0) };
        let body = Stmt::BranchStmt {
            id: node(1),
            kind: BranchKind::Break,
            label: None,
        };
        b.build_for(None, Some(&cond), None, &body);
        assert!(b.proc.target_list.find(None).is_none());
    }

    #[test]
    fn value_decl_destructures_a_tuple_typed_initializer() {
        let mut entities = ssa_frontend::EntityTable::new();
        let mut types = TypeAndValueMap::new();
        let tuple_ty = Type::Tuple(alloc::vec![Type::I32, Type::Bool]);
        let pair_entity = entities.declare(
            ssa_frontend::EntityKind::Var,
            "pair".into(),
            tuple_ty.clone(),
            ssa_frontend::Scope::Local,
        );
        let pair_id = node(0);
        types.insert(pair_id, TypeAndValue::variable(tuple_ty.clone()));
        let x = entities.declare(ssa_frontend::EntityKind::Var, "x".into(), Type::I32, ssa_frontend::Scope::Local);
        let y = entities.declare(ssa_frontend::EntityKind::Var, "y".into(), Type::Bool, ssa_frontend::Scope::Local);

        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        b.proc.add_local_generated(pair_entity, tuple_ty);
        let pair = Expr::Ident { id: pair_id, entity: pair_entity };
        b.build_value_decl(&[Some(x), Some(y)], &[pair]);

        let x_addr = b.proc.lookup_local(x).unwrap();
        let y_addr = b.proc.lookup_local(y).unwrap();
        let stores: Vec<_> = b
            .proc
            .values
            .iter()
            .filter(|(_, v)| v.op == Opcode::Store)
            .map(|(_, v)| v.args[0])
            .collect();
        assert!(stores.contains(&x_addr));
        assert!(stores.contains(&y_addr));
        let ptr_indices = b.proc.values.iter().filter(|(_, v)| v.op == Opcode::PtrIndex).count();
        assert_eq!(ptr_indices, 2);
    }

    #[test]
    fn assign_destructures_a_tuple_typed_initializer_on_arity_mismatch() {
        let mut entities = ssa_frontend::EntityTable::new();
        let mut types = TypeAndValueMap::new();
        let tuple_ty = Type::Tuple(alloc::vec![Type::I32, Type::I32]);
        let pair_entity = entities.declare(
            ssa_frontend::EntityKind::Var,
            "pair".into(),
            tuple_ty.clone(),
            ssa_frontend::Scope::Local,
        );
        let pair_id = node(0);
        types.insert(pair_id, TypeAndValue::variable(tuple_ty.clone()));
        let x = entities.declare(ssa_frontend::EntityKind::Var, "x".into(), Type::I32, ssa_frontend::Scope::Local);
        let y = entities.declare(ssa_frontend::EntityKind::Var, "y".into(), Type::I32, ssa_frontend::Scope::Local);
        types.insert(node(1), TypeAndValue::variable(Type::I32));
        types.insert(node(2), TypeAndValue::variable(Type::I32));

        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        b.proc.add_local_generated(pair_entity, tuple_ty);
        b.proc.add_local_generated(x, Type::I32);
        b.proc.add_local_generated(y, Type::I32);
        let pair = Expr::Ident { id: pair_id, entity: pair_entity };
        let lhs = [
            Expr::Ident { id: node(1), entity: x },
            Expr::Ident { id: node(2), entity: y },
        ];
        b.build_assign(AssignOp::Assign, &lhs, core::slice::from_ref(&pair));
        let ptr_indices = b.proc.values.iter().filter(|(_, v)| v.op == Opcode::PtrIndex).count();
        assert_eq!(ptr_indices, 2);
    }

    #[test]
    fn assign_to_blank_ident_evaluates_but_does_not_store() {
        let (entities, mut types) = empty_tables();
        let rhs_id = node(0);
        types.insert(rhs_id, TypeAndValue::constant(Type::I32, ExactValue::Integer(1)));
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let lhs = [Expr::BlankIdent { id: node(1) }];
        let rhs = [Expr::Ident { id: rhs_id, entity: ssa_ir::EntityId::new(0) }];
        b.build_assign(AssignOp::Assign, &lhs, &rhs);
        assert!(b.proc.values.iter().all(|(_, v)| v.op != Opcode::Store));
    }

    #[test]
    #[should_panic(expected = "unsupported statement shape")]
    fn return_stmt_is_fatal() {
        let (entities, types) = empty_tables();
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        b.build_stmt(&Stmt::ReturnStmt { id: node(0), results: Vec::new() });
    }

    #[test]
    fn unreachable_code_after_a_break_lands_in_a_fresh_dead_block() {
        let (entities, mut types) = empty_tables();
        let cond_id = node(0);
        types.insert(cond_id, TypeAndValue::constant(Type::Bool, ExactValue::Bool(true)));
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let cond = Expr::Ident { id: cond_id, entity: ssa_ir::EntityId::new(0) };
        let blocks_before = b.proc.blocks.len();
        let body = Stmt::BlockStmt {
            id: node(1),
            stmts: alloc::vec![
                Stmt::BranchStmt { id: node(2), kind: BranchKind::Break, label: None },
                Stmt::EmptyStmt { id: node(3) },
            ],
        };
        b.build_for(None, Some(&cond), None, &body);
        assert!(b.proc.blocks.len() > blocks_before);
        assert!(b.proc.curr_block.is_some());
    }
}

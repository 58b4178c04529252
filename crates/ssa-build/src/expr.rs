//! Expression lowering: AST expressions to SSA values.

use alloc::boxed::Box;

use ssa_frontend::{AddressingMode, BinaryOp, Expr, ExactValue, UnaryOp};
use ssa_ir::{Address, AddressKind, Opcode, Type, ValueArgs, ValueId};

use crate::builder::Builder;

fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::ParenExpr { inner, .. } => unwrap_paren(inner),
        other => other,
    }
}

impl<'f> Builder<'f> {
    pub fn build_expr(&mut self, expr: &Expr) -> ValueId {
        let expr = unwrap_paren(expr);
        let node_id = expr.id();
        let tv = self
            .types
            .get(node_id)
            .unwrap_or_else(|| panic!("no type-and-value record for {node_id}"));

        if let Some(exact) = tv.value.clone() {
            return self.materialize_constant(tv.ty.clone(), exact);
        }
        if tv.mode == AddressingMode::Variable {
            let addr = self.build_addr(expr);
            return self.load_addr(addr);
        }

        match expr {
            Expr::Ident { entity, .. } => {
                if let Some(bound) = self.proc.lookup_local(*entity) {
                    if self.proc.values.get(bound).op == Opcode::Proc {
                        return bound;
                    }
                }
                let addr = self.build_addr(expr);
                self.load_addr(addr)
            }
            Expr::UnaryExpr { op, operand, .. } => self.build_unary(*op, operand),
            Expr::BinaryExpr { op, lhs, rhs, .. } => self.build_binary(*op, lhs, rhs),
            other => panic!("build_expr: unsupported expression shape {other:?}"),
        }
    }

    fn materialize_constant(&mut self, ty: Type, exact: ExactValue) -> ValueId {
        match exact {
            ExactValue::Bool(b) => self.proc.const_bool(b),
            ExactValue::String(s) => self.proc.const_string(s),
            ExactValue::Slice(elems) => self.proc.const_slice(ty, elems.into_vec()),
            ExactValue::Integer(i) => self.proc.const_int(self.ctx, &ty, i),
            ExactValue::Float(f) => match ty.proper_type(self.ctx) {
                Type::F32 => self.proc.const_f32(f as f32),
                Type::F64 => self.proc.const_f64(f),
                other => panic!("float constant with non-float type {other:?}"),
            },
            ExactValue::Pointer(_) | ExactValue::Invalid => self.proc.const_nil(ty),
        }
    }

    fn load_addr(&mut self, addr: Address) -> ValueId {
        match addr.kind {
            AddressKind::Map => panic!("map-element addressing is not implemented"),
            AddressKind::Default => {
                let ty = self.proc.values.get(addr.value).ty.clone();
                if ty.base_type().is_type_pointer() {
                    // No separate Proc-reference carrier type exists here;
                    // a pointer-to-procedure addr is loaded like any other.
                }
                let pointee = ty
                    .type_deref()
                    .unwrap_or_else(|| panic!("address value is not a pointer: {ty:?}"))
                    .clone();
                let mut args = ValueArgs::new();
                args.push(addr.value);
                self.proc.new_value(Opcode::Load, pointee, args)
            }
        }
    }

    fn build_unary(&mut self, op: UnaryOp, operand: &Expr) -> ValueId {
        match op {
            UnaryOp::Addr => self.build_addr(operand).value,
            UnaryOp::Plus => self.build_expr(operand),
            UnaryOp::Not => {
                let v = self.build_expr(operand);
                let mut args = ValueArgs::new();
                args.push(v);
                self.proc.new_value(Opcode::NotB, Type::Bool, args)
            }
            UnaryOp::BitNot => {
                let v = self.build_expr(operand);
                let ty = self.proc.values.get(v).ty.clone();
                let op = bitwise_not_opcode(self.ctx, &ty);
                let mut args = ValueArgs::new();
                args.push(v);
                self.proc.new_value(op, ty, args)
            }
            UnaryOp::Neg => {
                let v = self.build_expr(operand);
                let ty = self.proc.values.get(v).ty.clone();
                let op = negate_opcode(self.ctx, &ty);
                let mut args = ValueArgs::new();
                args.push(v);
                self.proc.new_value(op, ty, args)
            }
        }
    }

    fn build_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> ValueId {
        match op {
            BinaryOp::LogicAnd => return self.build_logical(true, lhs, rhs),
            BinaryOp::LogicOr => return self.build_logical(false, lhs, rhs),
            BinaryOp::Shl | BinaryOp::Shr => {
                panic!("shift operators are not supported by this core (see design notes)")
            }
            _ => {}
        }
        let l = self.build_expr(lhs);
        let r = self.build_expr(rhs);
        match op {
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                self.emit_comp(op, l, r)
            }
            _ => {
                let ty = self.proc.values.get(l).ty.clone();
                let opcode = determine_op(self.ctx, op, &ty);
                let mut args = ValueArgs::new();
                args.push(l);
                args.push(r);
                self.proc.new_value(opcode, ty, args)
            }
        }
    }

    /// `L && R` / `L || R`. `is_and` selects the
    /// short-circuit constant (`false` for `&&`, `true` for `||`).
    fn build_logical(&mut self, is_and: bool, lhs: &Expr, rhs: &Expr) -> ValueId {
        let rhs_block = self.proc.new_named_block(ssa_ir::BlockKind::Plain, "logic.rhs".into());
        let done_block = self.proc.new_named_block(ssa_ir::BlockKind::Plain, "logic.done".into());
        // Materialized before any branching so it dominates every direct
        // short-circuit edge into `done_block`, no matter how many nested
        // `&&`/`||` legs `build_cond` recurses through below.
        let short_circuit = self.proc.const_bool(!is_and);
        let (yes, no) = if is_and {
            (rhs_block, done_block)
        } else {
            (done_block, rhs_block)
        };
        self.build_cond(lhs, yes, no);
        self.proc.end_block();

        if self.proc.blocks.get(rhs_block).preds.is_empty() {
            // `lhs` always takes the short-circuit edge; `rhs` is dead.
            return short_circuit;
        }
        let direct_preds = self.proc.blocks.get(done_block).preds.len();
        if direct_preds == 0 {
            // `lhs` never short-circuits; nothing merges into `done`.
            self.proc.start_block(rhs_block);
            return self.build_expr(rhs);
        }

        self.proc.start_block(rhs_block);
        let rhs_value = self.build_expr(rhs);
        self.proc.emit_jump(done_block);
        self.proc.end_block();

        self.proc.start_block(done_block);
        let mut phi_args = ValueArgs::new();
        for _ in 0..direct_preds {
            phi_args.push(short_circuit);
        }
        phi_args.push(rhs_value);
        let phi = self.proc.new_value(Opcode::Phi, Type::Bool, phi_args);
        self.proc.values.get_mut(phi).comment = Some("logic.merge".into());
        phi
    }
}

fn integer_width_index(ty: &Type) -> usize {
    match ty {
        Type::I8 | Type::U8 => 0,
        Type::I16 | Type::U16 => 1,
        Type::I32 | Type::U32 => 2,
        Type::I64 | Type::U64 => 3,
        other => panic!("unknown integer width for {other:?}"),
    }
}

macro_rules! by_width {
    ($width:expr, $w8:expr, $w16:expr, $w32:expr, $w64:expr) => {
        match $width {
            0 => $w8,
            1 => $w16,
            2 => $w32,
            3 => $w64,
            _ => unreachable!(),
        }
    };
}

fn bitwise_not_opcode(ctx: ssa_ir::BuildContext, ty: &Type) -> Opcode {
    let proper = ty.proper_type(ctx);
    if proper.is_type_bool() {
        return Opcode::NotB;
    }
    let width = integer_width_index(proper.base_type());
    by_width!(width, Opcode::Not8, Opcode::Not16, Opcode::Not32, Opcode::Not64)
}

fn negate_opcode(ctx: ssa_ir::BuildContext, ty: &Type) -> Opcode {
    let proper = ty.proper_type(ctx);
    if proper.is_type_float() {
        return match proper {
            Type::F64 => Opcode::Neg64F,
            _ => Opcode::Neg32F,
        };
    }
    let width = integer_width_index(proper.base_type());
    by_width!(width, Opcode::Neg8, Opcode::Neg16, Opcode::Neg32, Opcode::Neg64)
}

/// `ssa_determine_op`.
pub fn determine_op(ctx: ssa_ir::BuildContext, op: BinaryOp, ty: &Type) -> Opcode {
    let proper = ty.proper_type(ctx);
    if proper.is_type_bool() {
        return match op {
            BinaryOp::And => Opcode::And8,
            BinaryOp::Or => Opcode::Or8,
            BinaryOp::Xor => Opcode::Xor8,
            BinaryOp::AndNot => Opcode::AndNot8,
            _ => panic!("unsupported boolean operator {op:?}"),
        };
    }
    if proper.is_type_float() {
        let is64 = matches!(proper, Type::F64);
        return match op {
            BinaryOp::Add => {
                if is64 {
                    Opcode::Add64F
                } else {
                    Opcode::Add32F
                }
            }
            BinaryOp::Sub => {
                if is64 {
                    Opcode::Sub64F
                } else {
                    Opcode::Sub32F
                }
            }
            BinaryOp::Mul => {
                if is64 {
                    Opcode::Mul64F
                } else {
                    Opcode::Mul32F
                }
            }
            BinaryOp::Div => {
                if is64 {
                    Opcode::Div64F
                } else {
                    Opcode::Div32F
                }
            }
            _ => panic!("unsupported float operator {op:?}"),
        };
    }
    let unsigned = proper.is_type_unsigned();
    let width = integer_width_index(proper.base_type());
    match op {
        BinaryOp::Add => by_width!(width, Opcode::Add8, Opcode::Add16, Opcode::Add32, Opcode::Add64),
        BinaryOp::Sub => by_width!(width, Opcode::Sub8, Opcode::Sub16, Opcode::Sub32, Opcode::Sub64),
        BinaryOp::Mul => by_width!(width, Opcode::Mul8, Opcode::Mul16, Opcode::Mul32, Opcode::Mul64),
        BinaryOp::Div if unsigned => {
            by_width!(width, Opcode::Div8U, Opcode::Div16U, Opcode::Div32U, Opcode::Div64U)
        }
        BinaryOp::Div => by_width!(width, Opcode::Div8, Opcode::Div16, Opcode::Div32, Opcode::Div64),
        BinaryOp::Mod if unsigned => {
            by_width!(width, Opcode::Mod8U, Opcode::Mod16U, Opcode::Mod32U, Opcode::Mod64U)
        }
        BinaryOp::Mod => by_width!(width, Opcode::Mod8, Opcode::Mod16, Opcode::Mod32, Opcode::Mod64),
        BinaryOp::And => by_width!(width, Opcode::And8, Opcode::And16, Opcode::And32, Opcode::And64),
        BinaryOp::Or => by_width!(width, Opcode::Or8, Opcode::Or16, Opcode::Or32, Opcode::Or64),
        BinaryOp::Xor => by_width!(width, Opcode::Xor8, Opcode::Xor16, Opcode::Xor32, Opcode::Xor64),
        BinaryOp::AndNot => {
            by_width!(width, Opcode::AndNot8, Opcode::AndNot16, Opcode::AndNot32, Opcode::AndNot64)
        }
        other => panic!("unsupported arithmetic/bitwise operator {other:?}"),
    }
}

/// The comparison half of opcode selection; kept separate from
/// `determine_op` since relational opcodes also encode signedness and
/// equality doesn't.
fn determine_cmp_op(ctx: ssa_ir::BuildContext, op: BinaryOp, ty: &Type) -> Opcode {
    let proper = ty.proper_type(ctx);
    if proper.is_type_float() {
        let is64 = matches!(proper, Type::F64);
        return match (op, is64) {
            (BinaryOp::Eq, false) => Opcode::CmpEq32F,
            (BinaryOp::Eq, true) => Opcode::CmpEq64F,
            (BinaryOp::Ne, false) => Opcode::CmpNe32F,
            (BinaryOp::Ne, true) => Opcode::CmpNe64F,
            (BinaryOp::Lt, false) => Opcode::CmpLt32F,
            (BinaryOp::Lt, true) => Opcode::CmpLt64F,
            (BinaryOp::Le, false) => Opcode::CmpLe32F,
            (BinaryOp::Le, true) => Opcode::CmpLe64F,
            (BinaryOp::Gt, false) => Opcode::CmpGt32F,
            (BinaryOp::Gt, true) => Opcode::CmpGt64F,
            (BinaryOp::Ge, false) => Opcode::CmpGe32F,
            (BinaryOp::Ge, true) => Opcode::CmpGe64F,
            other => panic!("unsupported float comparison {other:?}"),
        };
    }
    let unsigned = proper.is_type_unsigned() || proper.is_type_bool();
    let width = if proper.is_type_bool() {
        0
    } else {
        integer_width_index(proper.base_type())
    };
    match op {
        BinaryOp::Eq => by_width!(width, Opcode::CmpEq8, Opcode::CmpEq16, Opcode::CmpEq32, Opcode::CmpEq64),
        BinaryOp::Ne => by_width!(width, Opcode::CmpNe8, Opcode::CmpNe16, Opcode::CmpNe32, Opcode::CmpNe64),
        BinaryOp::Lt if unsigned => {
            by_width!(width, Opcode::CmpLt8U, Opcode::CmpLt16U, Opcode::CmpLt32U, Opcode::CmpLt64U)
        }
        BinaryOp::Lt => by_width!(width, Opcode::CmpLt8, Opcode::CmpLt16, Opcode::CmpLt32, Opcode::CmpLt64),
        BinaryOp::Le if unsigned => {
            by_width!(width, Opcode::CmpLe8U, Opcode::CmpLe16U, Opcode::CmpLe32U, Opcode::CmpLe64U)
        }
        BinaryOp::Le => by_width!(width, Opcode::CmpLe8, Opcode::CmpLe16, Opcode::CmpLe32, Opcode::CmpLe64),
        BinaryOp::Gt if unsigned => {
            by_width!(width, Opcode::CmpGt8U, Opcode::CmpGt16U, Opcode::CmpGt32U, Opcode::CmpGt64U)
        }
        BinaryOp::Gt => by_width!(width, Opcode::CmpGt8, Opcode::CmpGt16, Opcode::CmpGt32, Opcode::CmpGt64),
        BinaryOp::Ge if unsigned => {
            by_width!(width, Opcode::CmpGe8U, Opcode::CmpGe16U, Opcode::CmpGe32U, Opcode::CmpGe64U)
        }
        BinaryOp::Ge => by_width!(width, Opcode::CmpGe8, Opcode::CmpGe16, Opcode::CmpGe32, Opcode::CmpGe64),
        other => panic!("unsupported comparison operator {other:?}"),
    }
}

impl<'f> Builder<'f> {
    /// `ssa_emit_comp`, including the compile-time unrolled vector
    /// comparison modeled on `ssa.c`'s `ssa_emit_comp`.
    pub fn emit_comp(&mut self, op: BinaryOp, lhs: ValueId, rhs: ValueId) -> ValueId {
        let (lhs, rhs, ty) = self.harmonize_comparison_operands(lhs, rhs);
        if ty.is_type_vector() {
            return self.emit_vector_comp(op, lhs, rhs, &ty);
        }
        let opcode = determine_cmp_op(self.ctx, op, &ty);
        let mut args = ValueArgs::new();
        args.push(lhs);
        args.push(rhs);
        self.proc.new_value(opcode, Type::Bool, args)
    }

    fn harmonize_comparison_operands(&mut self, lhs: ValueId, rhs: ValueId) -> (ValueId, ValueId, Type) {
        let lhs_ty = self.proc.values.get(lhs).ty.clone();
        let rhs_ty = self.proc.values.get(rhs).ty.clone();
        if Type::are_types_identical(&lhs_ty, &rhs_ty) {
            return (lhs, rhs, lhs_ty);
        }
        if self.proc.values.get(lhs).is_const() {
            let converted = self.emit_conv(lhs, rhs_ty.clone());
            return (converted, rhs, rhs_ty);
        }
        if self.proc.values.get(rhs).is_const() {
            let converted = self.emit_conv(rhs, lhs_ty.clone());
            return (lhs, converted, lhs_ty);
        }
        panic!("comparison operand types differ and neither side is constant: {lhs_ty:?} vs {rhs_ty:?}");
    }

    /// Unrolled at build time since a vector's length is always a
    /// compile-time constant (grounded on `ssa_emit_comp`'s `for` loop
    /// over `Vector.count` in `ssa.c`, which likewise runs at IR-build
    /// time rather than emitting runtime control flow).
    fn emit_vector_comp(&mut self, op: BinaryOp, lhs: ValueId, rhs: ValueId, vec_ty: &Type) -> ValueId {
        let (len, elem_ty) = match vec_ty.base_type() {
            Type::Vector(len, elem) => (*len, (**elem).clone()),
            other => panic!("emit_vector_comp on non-vector type {other:?}"),
        };
        let bool_vec_ty = Type::Vector(len, Box::new(Type::Bool));
        let lhs_addr = self.address_from_load_or_generate_local(lhs);
        let rhs_addr = self.address_from_load_or_generate_local(rhs);
        let result_entity = ssa_ir::EntityId::new(u32::MAX);
        let result_addr = self.proc.add_local_generated(result_entity, bool_vec_ty);
        for i in 0..len {
            let lhs_elem = self.emit_array_index(lhs_addr, i, &elem_ty);
            let rhs_elem = self.emit_array_index(rhs_addr, i, &elem_ty);
            let lhs_val = self.load_addr(Address::new(lhs_elem));
            let rhs_val = self.load_addr(Address::new(rhs_elem));
            let cmp = self.emit_comp(op, lhs_val, rhs_val);
            let slot = self.emit_array_index(result_addr.value, i, &Type::Bool);
            let mut args = ValueArgs::new();
            args.push(slot);
            args.push(cmp);
            self.proc.new_value(Opcode::Store, Type::Bool, args);
        }
        self.load_addr(result_addr)
    }

    fn emit_array_index(&mut self, array_ptr: ValueId, index: usize, elem_ty: &Type) -> ValueId {
        let index_const = self.proc.const_i64(index as i64);
        let mut args = ValueArgs::new();
        args.push(array_ptr);
        args.push(index_const);
        self.proc.new_value(Opcode::ArrayIndex, Type::pointer(elem_ty.clone()), args)
    }

    /// `ssa_emit_ptr_index`: pointer-to-aggregate to pointer-to-component.
    pub fn emit_ptr_index(&mut self, base_ptr: ValueId, index: usize, aggregate: &Type) -> ValueId {
        let field_ty = match aggregate.base_type() {
            Type::Struct(fields) => fields
                .get(index)
                .unwrap_or_else(|| panic!("field index {index} out of range"))
                .ty
                .clone(),
            Type::Tuple(elems) => elems
                .get(index)
                .unwrap_or_else(|| panic!("tuple index {index} out of range"))
                .clone(),
            Type::Union(variants) => {
                // All variants overlap past the tag word (§4.2.4).
                let offset = self.ctx.word_size.bytes();
                let variant_ty = variants
                    .get(index)
                    .unwrap_or_else(|| panic!("union index {index} out of range"))
                    .clone();
                let byte_ptr = self.emit_conv(base_ptr, Type::pointer(Type::U8));
                let offset_const = self.proc.const_i64(offset as i64);
                let mut args = ValueArgs::new();
                args.push(byte_ptr);
                args.push(offset_const);
                let offset_ptr = self
                    .proc
                    .new_value(Opcode::PtrOffset, Type::pointer(Type::U8), args);
                return self.emit_conv(offset_ptr, Type::pointer(variant_ty));
            }
            other => panic!("emit_ptr_index: unsupported aggregate {other:?}"),
        };
        let index_const = self.proc.const_i64(index as i64);
        let mut args = ValueArgs::new();
        args.push(base_ptr);
        args.push(index_const);
        self.proc.new_value(Opcode::PtrIndex, Type::pointer(field_ty), args)
    }

    /// `ssa_emit_value_index`: the value-level analogue.
    pub fn emit_value_index(&mut self, s: ValueId, index: usize) -> ValueId {
        let sv = self.proc.values.get(s);
        if sv.op == Opcode::Load && !self.can_ssa_type(&sv.ty.clone()) {
            let base = sv.args[0];
            let base_ty = self.proc.values.get(base).ty.clone();
            let pointee = base_ty.type_deref().unwrap().clone();
            let ptr = self.emit_ptr_index(base, index, &pointee);
            return self.load_addr(Address::new(ptr));
        }
        let ty = sv.ty.clone();
        let field_ty = match ty.base_type() {
            Type::Struct(fields) => fields[index].ty.clone(),
            Type::Tuple(elems) => elems[index].clone(),
            Type::Union(_) => panic!("unions always require memory-based projection"),
            other => panic!("emit_value_index: unsupported aggregate {other:?}"),
        };
        let index_const = self.proc.const_i64(index as i64);
        let mut args = ValueArgs::new();
        args.push(s);
        args.push(index_const);
        self.proc.new_value(Opcode::ValueIndex, field_ty, args)
    }

    /// `can_ssa_type`.
    pub fn can_ssa_type(&self, ty: &Type) -> bool {
        const MAX_SSA_FIELDS: usize = 4;
        if ty.type_size_of(self.ctx) > 4 * self.ctx.word_size.bytes() {
            return false;
        }
        match ty.base_type() {
            Type::Array(len, _) => *len == 0,
            Type::Vector(_, _) => ty.type_size_of(self.ctx) < 2 * self.ctx.word_size.bytes(),
            Type::DynamicArray(_) | Type::DynamicMap(_, _) => false,
            Type::Tuple(elems) => elems.len() <= MAX_SSA_FIELDS && elems.iter().all(|t| self.can_ssa_type(t)),
            Type::Struct(fields) => {
                fields.len() <= MAX_SSA_FIELDS && fields.iter().all(|f| self.can_ssa_type(&f.ty))
            }
            Type::Union(_) => false,
            _ => true,
        }
    }

    /// `ssa_emit_conv`.
    pub fn emit_conv(&mut self, v: ValueId, target: Type) -> ValueId {
        let src = self.proc.values.get(v).ty.clone();
        if Type::are_types_identical(&src, &target) {
            return v;
        }
        if matches!(src.base_type(), Type::Invalid) {
            return self.proc.const_nil(target);
        }
        let src_core = src.core_type(self.ctx);
        let dst_core = target.core_type(self.ctx);
        let compatible = (src_core.is_type_pointer() && dst_core.is_type_pointer())
            || (matches!(src_core, Type::Proc(_)) && matches!(dst_core, Type::Proc(_)))
            || (src_core.is_type_pointer() && matches!(dst_core, Type::Proc(_)))
            || (matches!(src_core, Type::Proc(_)) && dst_core.is_type_pointer());
        if !compatible {
            panic!("invalid type conversion: {src:?} to {target:?}");
        }
        let mut args = ValueArgs::new();
        args.push(v);
        self.proc.new_value(Opcode::Copy, target, args)
    }

    /// `ssa_add_local`: allocate the entry-block local, register it, and
    /// zero-initialize it. The `Local` value itself is
    /// the address (matching `Procedure::add_local_generated`); no
    /// separate `Addr` wrapper is needed for a plain declared variable.
    pub fn add_local(&mut self, entity: ssa_ir::EntityId, ty: Type, name: Option<alloc::string::String>) -> Address {
        let saved = if self.proc.curr_block.is_some() {
            Some(self.proc.end_block())
        } else {
            None
        };
        self.proc.start_block(self.proc.entry);
        let local = self.proc.new_value(Opcode::Local, Type::pointer(ty), ValueArgs::new());
        if let Some(name) = name {
            self.proc.values.get_mut(local).comment = Some(name);
        }
        let mut zero_args = ValueArgs::new();
        zero_args.push(local);
        let zero = self.proc.new_value(Opcode::Zero, Type::Invalid, zero_args);
        self.proc.values.get_mut(zero).comment = Some("local.zero".into());
        self.proc.add_local(entity, local);
        self.proc.end_block();
        if let Some(b) = saved {
            self.proc.start_block(b);
        }
        Address::new(local)
    }

    /// `ssa_address_from_load_or_generate_local`.
    pub fn address_from_load_or_generate_local(&mut self, v: ValueId) -> ValueId {
        let val = self.proc.values.get(v);
        if val.op == Opcode::Load {
            return val.args[0];
        }
        let ty = val.ty.clone();
        let generated = ssa_ir::EntityId::new(u32::MAX - self.proc.values.len() as u32);
        let addr = self.proc.add_local_generated(generated, ty);
        let mut args = ValueArgs::new();
        args.push(addr.value);
        args.push(v);
        let store = self.proc.new_value(Opcode::Store, Type::Invalid, args);
        self.proc.values.get_mut(store).comment = Some("temp.spill".into());
        addr.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::*;
    use ssa_frontend::{AddressingMode, TypeAndValue};

    #[test]
    fn build_expr_materializes_a_constant_without_touching_any_block() {
        let (entities, mut types) = empty_tables();
        let node = node(0);
        types.insert(node, TypeAndValue::constant(Type::I32, ExactValue::Integer(7)));
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let v = b.build_expr(&Expr::Ident { id: node, entity: ssa_ir::EntityId::new(0) });
        assert_eq!(b.proc.values.get(v).op, Opcode::Const32);
    }

    #[test]
    fn build_binary_add_picks_the_width_matched_opcode() {
        let (entities, mut types) = empty_tables();
        let lhs_id = node(0);
        let rhs_id = node(1);
        let top_id = node(2);
        types.insert(lhs_id, TypeAndValue::constant(Type::I32, ExactValue::Integer(1)));
        types.insert(rhs_id, TypeAndValue::constant(Type::I32, ExactValue::Integer(2)));
        types.insert(top_id, TypeAndValue::value(Type::I32));
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let lhs = Expr::Ident { id: lhs_id, entity: ssa_ir::EntityId::new(0) };
        let rhs = Expr::Ident { id: rhs_id, entity: ssa_ir::EntityId::new(1) };
        let v = b.build_binary(BinaryOp::Add, &lhs, &rhs);
        assert_eq!(b.proc.values.get(v).op, Opcode::Add32);
    }

    #[test]
    fn build_logical_and_phi_has_one_operand_per_predecessor() {
        let (entities, mut types) = empty_tables();
        let lhs_id = node(0);
        let rhs_id = node(1);
        types.insert(lhs_id, TypeAndValue {
            ty: Type::Bool,
            mode: AddressingMode::Value,
            value: None,
        });
        types.insert(rhs_id, TypeAndValue {
            ty: Type::Bool,
            mode: AddressingMode::Value,
            value: None,
        });
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let entity = ssa_ir::EntityId::new(0);
        b.proc.add_local_generated(entity, Type::Bool);
        let lhs = Expr::Ident { id: lhs_id, entity };
        let rhs = Expr::Ident { id: rhs_id, entity };
        let phi = b.build_logical(true, &lhs, &rhs);
        let phi_value = b.proc.values.get(phi);
        assert_eq!(phi_value.op, Opcode::Phi);
        assert_eq!(phi_value.args.len(), 2);
        assert_eq!(phi_value.comment.as_deref(), Some("logic.merge"));
    }

    #[test]
    fn emit_comp_on_a_vector_unrolls_at_build_time_with_no_new_blocks() {
        let (entities, types) = empty_tables();
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let vec_ty = Type::Vector(4, Box::new(Type::I32));
        let lhs = b.proc.const_i32(1);
        let rhs = b.proc.const_i32(2);
        let blocks_before = b.proc.blocks.len();
        let lv = b.proc.new_value(Opcode::Copy, vec_ty.clone(), {
            let mut a = ValueArgs::new();
            a.push(lhs);
            a
        });
        let rv = b.proc.new_value(Opcode::Copy, vec_ty, {
            let mut a = ValueArgs::new();
            a.push(rhs);
            a
        });
        let result = b.emit_comp(BinaryOp::Eq, lv, rv);
        assert_eq!(b.proc.blocks.len(), blocks_before);
        assert!(b.proc.values.get(result).ty.is_type_vector());
    }

    #[test]
    fn add_local_zero_inits_with_a_comment() {
        let (entities, types) = empty_tables();
        let mut b = test_builder(&entities, &types);
        b.proc.start_block(b.proc.entry);
        let entity = ssa_ir::EntityId::new(0);
        b.add_local(entity, Type::I32, None);
        let (_, zero) = b.proc.values.iter().find(|(_, v)| v.op == Opcode::Zero).unwrap();
        assert_eq!(zero.comment.as_deref(), Some("local.zero"));
    }
}

//! A single procedure's SSA graph: its blocks, its values, and the
//! bookkeeping the builder needs while constructing them.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::address::Address;
use crate::arena::Arena;
use crate::block::{BlockData, BlockKind, Edge};
use crate::entity::{BlockId, EntityId, ProcId, ValueId};
use crate::exact_value::ExactValue;
use crate::opcode::Opcode;
use crate::target_list::TargetList;
use crate::types::{BuildContext, Signature, Type};
use crate::value::{Value, ValueArgs};

#[derive(Debug, Clone)]
pub struct Procedure {
    pub id: ProcId,
    pub name: String,
    pub signature: Signature,
    pub blocks: Arena<BlockId, BlockData>,
    pub values: Arena<ValueId, Value>,
    pub entry: BlockId,
    pub exit: BlockId,
    /// The block new values are appended to; `None` before the first call
    /// to [`Procedure::start_block`].
    pub curr_block: Option<BlockId>,
    pub target_list: TargetList,
    /// Maps a frontend entity (parameter or local) to the value currently
    /// holding its address, so repeat references reuse the same `Local`
    /// (`address_from_load_or_generate_local`).
    entity_addrs: BTreeMap<EntityId, ValueId>,
}

impl Procedure {
    pub fn new(id: ProcId, name: String, signature: Signature) -> Self {
        let mut blocks = Arena::new();
        let entry = blocks.push(BlockData::new(BlockKind::Entry));
        let exit = blocks.push(BlockData::new(BlockKind::Exit));
        Self {
            id,
            name,
            signature,
            blocks,
            values: Arena::new(),
            entry,
            exit,
            curr_block: None,
            target_list: TargetList::new(),
            entity_addrs: BTreeMap::new(),
        }
    }

    /// Allocate a new block without wiring any edges to it yet.
    pub fn new_block(&mut self, kind: BlockKind) -> BlockId {
        self.blocks.push(BlockData::new(kind))
    }

    pub fn new_named_block(&mut self, kind: BlockKind, name: String) -> BlockId {
        self.blocks.push(BlockData::named(kind, name))
    }

    /// Make `block` the target of subsequent `new_value` calls. A block
    /// must be closed with [`Procedure::end_block`] before another can be
    /// opened; starting a block while one is already open is a
    /// programming fault.
    pub fn start_block(&mut self, block: BlockId) {
        assert!(
            self.curr_block.is_none(),
            "start_block: block {} is still open, call end_block first",
            self.curr_block.unwrap()
        );
        self.curr_block = Some(block);
    }

    /// Clear and return the currently open block.
    pub fn end_block(&mut self) -> BlockId {
        self.curr_block.take().expect("end_block: no block is open")
    }

    fn curr_block(&self) -> BlockId {
        self.curr_block.expect("start_block must precede value emission")
    }

    /// Wire an unconditional control-flow edge, recording the reverse
    /// index each side needs for O(1) predecessor/successor lookup.
    pub fn add_edge_to(&mut self, from: BlockId, to: BlockId) {
        let succ_index = self.blocks.get(from).succs.len() as u32;
        let pred_index = self.blocks.get(to).preds.len() as u32;
        self.blocks.get_mut(from).succs.push(Edge::new(to, pred_index));
        self.blocks.get_mut(to).preds.push(Edge::new(from, succ_index));
    }

    /// Terminate the current block with a plain jump to `target`.
    pub fn emit_jump(&mut self, target: BlockId) {
        let from = self.curr_block();
        assert!(
            self.blocks.get(from).succs.is_empty(),
            "block {from} already terminated"
        );
        self.add_edge_to(from, target);
    }

    /// Terminate the current block with a two-way branch, promoting it to
    /// `BlockKind::If` (a block's role as a branch is only known once its
    /// condition has been built, not at the point it was allocated).
    pub fn emit_if(&mut self, control: ValueId, then_block: BlockId, else_block: BlockId) {
        let from = self.curr_block();
        assert!(
            self.blocks.get(from).succs.is_empty(),
            "block {from} already terminated"
        );
        self.blocks.get_mut(from).kind = BlockKind::If;
        self.use_value(control);
        self.blocks.get_mut(from).control = Some(control);
        self.add_edge_to(from, then_block);
        self.add_edge_to(from, else_block);
    }

    fn use_value(&mut self, id: ValueId) {
        self.values.get_mut(id).uses += 1;
    }

    fn unuse_value(&mut self, id: ValueId) {
        let v = self.values.get_mut(id);
        v.uses = v.uses.saturating_sub(1);
    }

    /// Emit a new instruction into the current block.
    pub fn new_value(&mut self, op: Opcode, ty: Type, args: ValueArgs) -> ValueId {
        let block = self.curr_block();
        let id = self.values.push(Value::new(ValueId::new(0), op, ty, block).with_args(args.clone()));
        // ValueId::new(0) above is a placeholder; the arena assigns the
        // real key. Patch it so `Value::id` is self-consistent.
        self.values.get_mut(id).id = id;
        for a in &args {
            self.use_value(*a);
        }
        self.blocks.get_mut(block).values.push(id);
        id
    }

    pub fn new_const(&mut self, op: Opcode, ty: Type, exact: ExactValue) -> ValueId {
        let block = self.curr_block();
        let id = self.values.push(
            Value::new(ValueId::new(0), op, ty, block).with_exact_value(exact),
        );
        self.values.get_mut(id).id = id;
        self.blocks.get_mut(block).values.push(id);
        id
    }

    pub fn const_bool(&mut self, b: bool) -> ValueId {
        self.new_const(Opcode::ConstBool, Type::Bool, ExactValue::Bool(b))
    }

    pub fn const_i8(&mut self, v: i8) -> ValueId {
        self.new_const(Opcode::Const8, Type::I8, ExactValue::Integer(v as i128))
    }

    pub fn const_i16(&mut self, v: i16) -> ValueId {
        self.new_const(Opcode::Const16, Type::I16, ExactValue::Integer(v as i128))
    }

    pub fn const_i32(&mut self, v: i32) -> ValueId {
        self.new_const(Opcode::Const32, Type::I32, ExactValue::Integer(v as i128))
    }

    pub fn const_i64(&mut self, v: i64) -> ValueId {
        self.new_const(Opcode::Const64, Type::I64, ExactValue::Integer(v as i128))
    }

    pub fn const_f32(&mut self, v: f32) -> ValueId {
        self.new_const(Opcode::Const32F, Type::F32, ExactValue::Float(v as f64))
    }

    pub fn const_f64(&mut self, v: f64) -> ValueId {
        self.new_const(Opcode::Const64F, Type::F64, ExactValue::Float(v))
    }

    pub fn const_string(&mut self, s: String) -> ValueId {
        self.new_const(Opcode::ConstString, Type::String, ExactValue::String(s))
    }

    pub fn const_slice(&mut self, ty: Type, elems: Vec<ExactValue>) -> ValueId {
        self.new_const(Opcode::ConstSlice, Type::Slice(alloc::boxed::Box::new(ty)), ExactValue::slice(elems))
    }

    /// `int`/`uint`-width-dispatched integer constant: materialize a
    /// constant whose width matches the type.
    pub fn const_int(&mut self, ctx: BuildContext, ty: &Type, value: i128) -> ValueId {
        match ty.proper_type(ctx) {
            Type::I8 | Type::U8 => self.const_i8(value as i8),
            Type::I16 | Type::U16 => self.const_i16(value as i16),
            Type::I32 | Type::U32 => self.const_i32(value as i32),
            Type::I64 | Type::U64 => self.const_i64(value as i64),
            other => panic!("const_int on non-integer type {other:?}"),
        }
    }

    pub fn const_nil(&mut self, ty: Type) -> ValueId {
        self.new_const(Opcode::ConstNil, ty, ExactValue::Invalid)
    }

    /// Detach the current operand list from `value` (decrementing each old
    /// argument's use count) and attach `new_args` in its place. Used by
    /// `Phi` construction, where the operand list grows as predecessors
    /// are discovered.
    pub fn reset_value_args(&mut self, value: ValueId, new_args: ValueArgs) {
        let old_args: Vec<ValueId> = self.values.get(value).args.iter().copied().collect();
        for a in old_args {
            self.unuse_value(a);
        }
        for a in &new_args {
            self.use_value(*a);
        }
        self.values.get_mut(value).args = new_args;
    }

    pub fn add_local(&mut self, entity: EntityId, addr: ValueId) {
        self.entity_addrs.insert(entity, addr);
    }

    /// The value currently registered for `entity`, if any, without the
    /// panic-on-miss contract of [`Procedure::address_from_load_or_generate_local`].
    /// Used to detect the "bound value is itself a `Proc` reference" case:
    /// identifiers naming a procedure.
    pub fn lookup_local(&self, entity: EntityId) -> Option<ValueId> {
        self.entity_addrs.get(&entity).copied()
    }

    /// Register a synthetic, compiler-generated local that has no
    /// corresponding frontend declaration: short-circuit temporaries and
    /// `for`-range cursors.
    pub fn add_local_generated(&mut self, entity: EntityId, ty: Type) -> Address {
        let local = self.new_value(Opcode::Local, Type::pointer(ty), ValueArgs::new());
        self.add_local(entity, local);
        Address::new(local)
    }

    /// Return the address already bound to `entity`, or fail: this core
    /// never synthesizes a new local for a real frontend entity it hasn't
    /// already allocated one for (that allocation happens once, up
    /// front).
    pub fn address_from_load_or_generate_local(&self, entity: EntityId) -> Address {
        match self.entity_addrs.get(&entity) {
            Some(addr) => Address::new(*addr),
            None => panic!("no local registered for {entity}"),
        }
    }
}

//! Textual dump format, used by tests and diagnostics.
//!
//! Within a block, `Phi` values print first (they're conceptually
//! simultaneous with block entry, regardless of where the builder had to
//! place them to patch in a later-discovered predecessor), then the
//! remaining values print in dependency order. A block-local dependency
//! cycle — possible because a `Phi`'s operand can be emitted after the
//! `Phi` itself — breaks the tie by falling back to emission order and
//! noting it with a `DepCycle` marker rather than looping forever.

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::block::{BlockData, BlockKind};
use crate::entity::ValueId;
use crate::module::Module;
use crate::opcode::Opcode;
use crate::proc::Procedure;
use crate::value::Value;

pub fn print_module(module: &Module) -> String {
    let mut out = String::new();
    for (id, proc) in module.procs.iter() {
        if id.index() > 0 {
            out.push('\n');
        }
        out.push_str(&print_proc(proc));
    }
    out
}

pub fn print_proc(proc: &Procedure) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "proc {} {{", proc.name);
    for (id, block) in proc.blocks.iter() {
        let _ = writeln!(out, "{}{}:{}", id, block_suffix(block), pred_suffix(block));
        for vid in order_block_values(proc, block) {
            let _ = writeln!(out, "    {}", print_value(proc.values.get(vid)));
        }
        let _ = writeln!(out, "    {}", print_terminator(block));
    }
    out.push_str("}\n");
    out
}

fn block_suffix(block: &BlockData) -> String {
    match &block.name {
        Some(name) => format!(" ({name})"),
        None => String::new(),
    }
}

/// `bN: <- bM1 bM2 ...`, empty for a block with no predecessors (entry, or
/// a dead block collected by the entry contract).
fn pred_suffix(block: &BlockData) -> String {
    if block.preds.is_empty() {
        return String::new();
    }
    let mut s = String::from(" <-");
    for p in &block.preds {
        let _ = write!(s, " {}", p.block);
    }
    s
}

/// Order a block's values: phis first (original order), then the rest in
/// dependency order, falling back to emission order with a `DepCycle`
/// annotation on a cycle.
fn order_block_values(proc: &Procedure, block: &BlockData) -> Vec<ValueId> {
    let local: BTreeSet<ValueId> = block.values.iter().copied().collect();
    let (mut phis, rest): (Vec<ValueId>, Vec<ValueId>) = block
        .values
        .iter()
        .copied()
        .partition(|id| proc.values.get(*id).op == Opcode::Phi);
    phis.sort_by_key(|id| id.index());

    let mut ordered = phis.clone();
    let mut placed: BTreeSet<ValueId> = phis.into_iter().collect();
    let mut remaining = rest;

    loop {
        let mut progressed = false;
        let mut next_remaining = Vec::new();
        for id in remaining {
            let deps_satisfied = proc
                .values
                .get(id)
                .args
                .iter()
                .all(|a| !local.contains(a) || placed.contains(a));
            if deps_satisfied {
                placed.insert(id);
                ordered.push(id);
                progressed = true;
            } else {
                next_remaining.push(id);
            }
        }
        remaining = next_remaining;
        if remaining.is_empty() {
            break;
        }
        if !progressed {
            // Dependency cycle: fall back to emission order for the rest.
            for id in remaining {
                ordered.push(id);
            }
            break;
        }
    }
    ordered
}

fn print_value(v: &Value) -> String {
    let mut s = format!("{} = {}", v.id, v.op.name());
    if let Some(ev) = &v.exact_value {
        let _ = write!(s, " {}", ev.format(&v.ty));
    }
    for a in &v.args {
        let _ = write!(s, " {a}");
    }
    if let Some(comment) = &v.comment {
        let _ = write!(s, "  ; {comment}");
    }
    s
}

fn print_terminator(block: &BlockData) -> String {
    match block.kind {
        BlockKind::Invalid => "invalid".into(),
        BlockKind::Entry | BlockKind::Plain => match block.succs.first() {
            Some(e) => format!("jump {}", e.block),
            None => "jump <unset>".into(),
        },
        BlockKind::If => match (block.control, block.succs.first(), block.succs.get(1)) {
            (Some(c), Some(t), Some(f)) => format!("if {} then {} else {}", c, t.block, f.block),
            _ => "if <unset>".into(),
        },
        BlockKind::Ret => "ret".into(),
        BlockKind::RetJmp => match block.succs.first() {
            Some(e) => format!("ret; jump {}", e.block),
            None => "ret; jump <unset>".into(),
        },
        BlockKind::Exit => "exit".into(),
    }
}

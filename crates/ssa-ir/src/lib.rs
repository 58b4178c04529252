//! SSA intermediate representation: opcodes, values, blocks, procedures,
//! and the textual printer.
//!
//! `no_std` so this core can sit underneath a frontend that targets a
//! freestanding environment, matching `lpc-lpir`/`r5-ir`.

#![no_std]

extern crate alloc;

pub mod address;
pub mod arena;
pub mod block;
pub mod entity;
pub mod exact_value;
pub mod module;
pub mod opcode;
pub mod printer;
pub mod proc;
pub mod target_list;
pub mod types;
pub mod value;

pub use address::{Address, AddressKind};
pub use arena::Arena;
pub use block::{BlockData, BlockKind, BranchPrediction, Edge};
pub use entity::{BlockId, EntityId, EntityRef, ProcId, ValueId};
pub use exact_value::ExactValue;
pub use module::Module;
pub use opcode::Opcode;
pub use proc::Procedure;
pub use target_list::{TargetFrame, TargetList};
pub use types::{BuildContext, Field, Signature, Type, WordSize};
pub use value::{Value, ValueArgs};

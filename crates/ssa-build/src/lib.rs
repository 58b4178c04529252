//! Expression and statement lowering from the frontend AST stand-in into
//! `ssa-ir`, plus the whole-module assembly driver.

#![no_std]

extern crate alloc;

pub mod addr;
pub mod builder;
pub mod cond;
pub mod driver;
pub mod expr;
pub mod stmt;
pub mod trace;

#[cfg(test)]
mod tests_support;

pub use builder::Builder;
pub use driver::{build_module, mangled_name, print_module, LinkKind};

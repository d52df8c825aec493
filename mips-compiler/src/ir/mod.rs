//! Intermediate Representation (IR) module.
//!
//! This module contains the syntax tree handed over by the front end, the
//! three-address IR, the tree-to-IR lowering engine, the textual IR listing
//! reader, and the scoped symbol table used by the declaration checker.

pub mod ir;
pub use ir::*;
pub mod ast;
pub mod ir_generator;
pub mod listing;
pub mod scope_check;
pub mod symbol_table;

//! Syntax tree to IR lowering module.
//!
//! This module handles the translation of the typed syntax tree into the
//! linear three-address IR. One [`Gen`] session owns its name counters, so
//! independent compilations never share temporaries or labels.

pub mod context;
pub mod expr;
pub mod stmt;

use crate::ir::ast::Node;
use crate::ir::ProgramIR;
use crate::{CompileError, CompileOptions};

/// The session that drives the lowering process.
pub use context::{Gen, NameAllocator};

/// Lower a program with the default (source-faithful) control-flow shape.
pub fn lower(program: &Node) -> Result<ProgramIR, CompileError> {
    lower_with_options(program, &CompileOptions::default())
}

pub fn lower_with_options(program: &Node, options: &CompileOptions) -> Result<ProgramIR, CompileError> {
    let mut g = Gen::new(options.close_control_flow);
    g.lower_node(program)?;
    Ok(g.finish())
}

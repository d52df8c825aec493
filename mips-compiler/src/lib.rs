pub mod backend;
pub mod ir;
pub mod options;

pub use options::{CompileOptions, RegisterPolicy};

use ir::ast::{Node, NodeKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("Malformed declaration: {0}")]
    MalformedDeclaration(String),

    #[error("Malformed {kind} node: {reason}")]
    MalformedNode { kind: NodeKind, reason: String },

    #[error("Unknown opcode '{0}'")]
    UnknownOpcode(String),

    #[error("Malformed instruction '{instr}': {reason}")]
    MalformedInstr { instr: String, reason: String },

    #[error("Register pool exhausted: no free register for '{name}' (pool holds {pool_size})")]
    RegisterPoolExhausted { name: String, pool_size: usize },

    #[error("SemanticError:{kind} - {message}")]
    Semantic {
        kind: SemanticErrorKind,
        message: String,
    },

    #[error("IR listing error at line {line}: {message}")]
    Listing { line: usize, message: String },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticErrorKind {
    Redeclaration,
    UndeclaredVariable,
    UndeclaredFunction,
}

impl std::fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticErrorKind::Redeclaration => write!(f, "Redeclaration"),
            SemanticErrorKind::UndeclaredVariable => write!(f, "UndeclaredVariable"),
            SemanticErrorKind::UndeclaredFunction => write!(f, "UndeclaredFunction"),
        }
    }
}

pub fn compile_to_ir(tree: &Node) -> Result<ir::ProgramIR, CompileError> {
    compile_to_ir_with_options(tree, &CompileOptions::default())
}

pub fn compile_to_ir_with_options(
    tree: &Node,
    options: &CompileOptions,
) -> Result<ir::ProgramIR, CompileError> {
    options.validate()?;
    ir::ir_generator::lower_with_options(tree, options)
}

/// Compile a syntax tree directly to MIPS assembly text.
pub fn compile_to_mips(tree: &Node) -> Result<String, CompileError> {
    compile_to_mips_with_options(tree, &CompileOptions::default())
}

pub fn compile_to_mips_with_options(tree: &Node, options: &CompileOptions) -> Result<String, CompileError> {
    let ir = compile_to_ir_with_options(tree, options)?;
    Ok(backend::compile_ir_to_mips(&ir, options)?.join())
}

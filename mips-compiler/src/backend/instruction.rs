//! MIPS machine-instruction types and assembly output items.
//!
//! This module defines the typed instruction subset the emitter produces
//! (`MipsInstr`) and the structured assembly output type (`AsmItem`).

use super::abi::Register;
use std::fmt;

// ============================================================================
// Typed MIPS instruction
// ============================================================================

/// A typed MIPS instruction (assembler pseudo-instructions included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MipsInstr {
    // ── Register arithmetic ─────────────────────────────────────────────
    /// `add d, a, b`
    Add { d: Register, a: Register, b: Register },
    /// `sub d, a, b`
    Sub { d: Register, a: Register, b: Register },
    /// `mul d, a, b`
    Mul { d: Register, a: Register, b: Register },
    /// `div a, b`; quotient lands in LO
    Div { a: Register, b: Register },
    /// `mflo d`
    Mflo { d: Register },
    /// `sltiu d, s, imm`
    Sltiu { d: Register, s: Register, imm: i32 },
    /// `sll d, s, shamt`
    Sll { d: Register, s: Register, shamt: u8 },

    // ── Moves and memory ────────────────────────────────────────────────
    /// `li d, imm`; the immediate is kept as written in the source.
    Li { d: Register, imm: String },
    /// `move d, s`
    Move { d: Register, s: Register },
    /// `lw d, offset(base)`
    Lw { d: Register, offset: i32, base: Register },
    /// `sw s, offset(base)`
    Sw { s: Register, offset: i32, base: Register },

    // ── Control transfer ────────────────────────────────────────────────
    /// `b label`
    B { label: String },
    /// `beq a, b, label`
    Beq { a: Register, b: Register, label: String },
    /// `jal label`
    Jal { label: String },
    /// `jr r`
    Jr { r: Register },
    Syscall,
}

impl fmt::Display for MipsInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MipsInstr::Add { d, a, b } => write!(f, "add {d}, {a}, {b}"),
            MipsInstr::Sub { d, a, b } => write!(f, "sub {d}, {a}, {b}"),
            MipsInstr::Mul { d, a, b } => write!(f, "mul {d}, {a}, {b}"),
            MipsInstr::Div { a, b } => write!(f, "div {a}, {b}"),
            MipsInstr::Mflo { d } => write!(f, "mflo {d}"),
            MipsInstr::Sltiu { d, s, imm } => write!(f, "sltiu {d}, {s}, {imm}"),
            MipsInstr::Sll { d, s, shamt } => write!(f, "sll {d}, {s}, {shamt}"),
            MipsInstr::Li { d, imm } => write!(f, "li {d}, {imm}"),
            MipsInstr::Move { d, s } => write!(f, "move {d}, {s}"),
            MipsInstr::Lw { d, offset, base } => write!(f, "lw {d}, {offset}({base})"),
            MipsInstr::Sw { s, offset, base } => write!(f, "sw {s}, {offset}({base})"),
            MipsInstr::B { label } => write!(f, "b {label}"),
            MipsInstr::Beq { a, b, label } => write!(f, "beq {a}, {b}, {label}"),
            MipsInstr::Jal { label } => write!(f, "jal {label}"),
            MipsInstr::Jr { r } => write!(f, "jr {r}"),
            MipsInstr::Syscall => write!(f, "syscall"),
        }
    }
}

// ============================================================================
// Assembly output items
// ============================================================================

#[derive(Debug, Clone)]
pub enum AsmItem {
    /// Assembler directive such as `.text`.
    Directive(String),
    Label(String, Option<usize>),
    Instruction {
        instr: MipsInstr,
        ir_map: Option<usize>,
    },
}

impl AsmItem {
    pub fn ir_map(&self) -> Option<usize> {
        match self {
            AsmItem::Instruction { ir_map, .. } | AsmItem::Label(_, ir_map) => *ir_map,
            AsmItem::Directive(_) => None,
        }
    }
}

impl fmt::Display for AsmItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmItem::Directive(d) => f.write_str(d),
            AsmItem::Label(l, _) => write!(f, "{l}:"),
            AsmItem::Instruction { instr, .. } => write!(f, "    {instr}"),
        }
    }
}

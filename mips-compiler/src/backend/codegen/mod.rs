//! Code generation state machine and assembly output.
//!
//! Contains the [`Codegen`] struct (the central code-generation driver),
//! operand resolution through the register table, and final assembly
//! emission.

mod lowering;
mod program;

use super::abi::Register;
use super::instruction::{AsmItem, MipsInstr};
use super::regalloc::RegAllocator;
use crate::ir::{Instr, Operand};
use crate::CompileError;

// ============================================================================
// Output type
// ============================================================================

/// Final MIPS assembly with a per-line IR mapping.
#[derive(Debug, Clone)]
pub struct MipsAsm {
    pub lines: Vec<String>,
    /// Index of the IR instruction behind each line; `None` for the
    /// preamble and epilogue.
    pub asm_ir_mapping: Vec<Option<usize>>,
}

impl MipsAsm {
    pub fn join(&self) -> String {
        self.lines.join("\n")
    }
}

// ============================================================================
// Codegen state
// ============================================================================

/// Central code-generation driver.
///
/// Walks the IR once, resolving every symbolic operand through the register
/// allocator and accumulating typed assembly items.
pub struct Codegen {
    pub(crate) out: Vec<AsmItem>,
    pub(crate) reg: Box<dyn RegAllocator>,
    pub(crate) current_ir: Option<usize>,
    /// `IFGOTO` branches when its condition is zero instead of always.
    pub(crate) branch_on_false: bool,
}

impl Codegen {
    pub fn with_regalloc(reg: Box<dyn RegAllocator>, branch_on_false: bool) -> Self {
        Self {
            out: Vec::new(),
            reg,
            current_ir: None,
            branch_on_false,
        }
    }

    // ── Item emission helpers ───────────────────────────────────────────

    pub(crate) fn push_asm(&mut self, instr: MipsInstr) {
        self.out.push(AsmItem::Instruction {
            instr,
            ir_map: self.current_ir,
        });
    }

    pub(crate) fn push_label(&mut self, name: String) {
        self.out.push(AsmItem::Label(name, self.current_ir));
    }

    // ── Operand resolution ──────────────────────────────────────────────

    /// Register for a temp or variable operand, binding it on first sight.
    pub(crate) fn reg_for(&mut self, instr: &Instr, operand: &Operand) -> Result<Register, CompileError> {
        match operand.symbol() {
            Some(sym) => self.reg.assign(&sym),
            None => Err(malformed(instr, format!("'{operand}' cannot live in a register"))),
        }
    }

    pub(crate) fn arg1_reg(&mut self, instr: &Instr) -> Result<Register, CompileError> {
        let a = instr
            .arg1
            .as_ref()
            .ok_or_else(|| malformed(instr, "missing first operand"))?;
        self.reg_for(instr, a)
    }

    pub(crate) fn arg2_reg(&mut self, instr: &Instr) -> Result<Register, CompileError> {
        let b = instr
            .arg2
            .as_ref()
            .ok_or_else(|| malformed(instr, "missing second operand"))?;
        self.reg_for(instr, b)
    }

    /// Destination register. Callers resolve sources first so a source is
    /// always bound before the result on its first mention.
    pub(crate) fn result_reg(&mut self, instr: &Instr) -> Result<Register, CompileError> {
        let r = instr
            .result
            .as_ref()
            .ok_or_else(|| malformed(instr, "missing result operand"))?;
        self.reg_for(instr, r)
    }

    // ── Final assembly ──────────────────────────────────────────────────

    /// Wrap the emitted body in the program preamble and epilogue.
    pub fn finish_codegen(self) -> MipsAsm {
        let mut items = vec![
            AsmItem::Directive(".data".into()),
            AsmItem::Directive(".text".into()),
            AsmItem::Directive(".globl main".into()),
            AsmItem::Label("main".into(), None),
        ];
        items.extend(self.out);
        items.push(AsmItem::Instruction {
            instr: MipsInstr::Jr { r: Register::RETURN_ADDR },
            ir_map: None,
        });

        let asm_ir_mapping = items.iter().map(AsmItem::ir_map).collect();
        let lines = items.iter().map(ToString::to_string).collect();
        MipsAsm { lines, asm_ir_mapping }
    }
}

pub(crate) fn malformed(instr: &Instr, reason: impl Into<String>) -> CompileError {
    CompileError::MalformedInstr {
        instr: instr.to_string(),
        reason: reason.into(),
    }
}

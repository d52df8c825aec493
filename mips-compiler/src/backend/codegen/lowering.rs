//! IR instruction → MIPS assembly lowering.
//!
//! Implements `Codegen::emit_instr`, which translates a single IR
//! instruction into zero or more typed machine instructions.

use super::{malformed, Codegen};
use crate::backend::abi::Register;
use crate::backend::instruction::MipsInstr;
use crate::ir::{Instr, Opcode, Operand};
use crate::CompileError;
use tracing::warn;

/// `sbrk` service number.
const SYSCALL_SBRK: &str = "9";
/// log2 of the word size; indices and sizes are scaled by it.
const WORD_SHIFT: u8 = 2;

impl Codegen {
    /// Lower a single IR instruction into typed machine instructions.
    pub(crate) fn emit_instr(&mut self, instr: &Instr) -> Result<(), CompileError> {
        match instr.op {
            Opcode::Add | Opcode::Sub | Opcode::Mul => {
                let a = self.arg1_reg(instr)?;
                let b = self.arg2_reg(instr)?;
                let d = self.result_reg(instr)?;
                self.push_asm(match instr.op {
                    Opcode::Add => MipsInstr::Add { d, a, b },
                    Opcode::Sub => MipsInstr::Sub { d, a, b },
                    _ => MipsInstr::Mul { d, a, b },
                });
            }
            Opcode::Div => {
                let a = self.arg1_reg(instr)?;
                let b = self.arg2_reg(instr)?;
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Div { a, b });
                self.push_asm(MipsInstr::Mflo { d });
            }
            Opcode::Mov => {
                let imm = match &instr.arg1 {
                    Some(Operand::Imm(text)) => text.clone(),
                    _ => return Err(malformed(instr, "MOV needs an immediate source")),
                };
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Li { d, imm });
            }
            Opcode::Load => {
                let base = self.arg1_reg(instr)?;
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Lw { d, offset: 0, base });
            }
            Opcode::Store => {
                let s = self.arg1_reg(instr)?;
                let base = self.arg2_reg(instr)?;
                self.push_asm(MipsInstr::Sw { s, offset: 0, base });
            }
            Opcode::Assign => {
                let s = self.arg1_reg(instr)?;
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Move { d, s });
            }
            Opcode::IfGoto if self.branch_on_false => {
                let c = self.arg1_reg(instr)?;
                let label = target_label(instr)?;
                self.push_asm(MipsInstr::Beq { a: c, b: Register::ZERO_REG, label });
            }
            Opcode::IfGoto | Opcode::While | Opcode::Goto => {
                // An unconditional branch ignores its condition, but the
                // condition still claims its register like any other source.
                if instr.arg1.is_some() {
                    self.arg1_reg(instr)?;
                }
                let label = target_label(instr)?;
                self.push_asm(MipsInstr::B { label });
            }
            Opcode::Call => {
                let label = match &instr.arg1 {
                    Some(Operand::Label(name)) => name.clone(),
                    _ => return Err(malformed(instr, "CALL needs a label callee")),
                };
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Jal { label });
                self.push_asm(MipsInstr::Move { d, s: Register::RETURN_VALUE });
            }
            Opcode::Return => {
                if instr.arg1.is_some() {
                    let s = self.arg1_reg(instr)?;
                    self.push_asm(MipsInstr::Move { d: Register::RETURN_VALUE, s });
                }
                self.push_asm(MipsInstr::Jr { r: Register::RETURN_ADDR });
            }
            Opcode::Neg => {
                let s = self.arg1_reg(instr)?;
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Sub { d, a: Register::ZERO_REG, b: s });
            }
            Opcode::Not => {
                let s = self.arg1_reg(instr)?;
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Sltiu { d, s, imm: 1 });
            }
            Opcode::AllocArray => {
                let size = self.arg2_reg(instr)?;
                let arr = self.arg1_reg(instr)?;
                self.push_asm(MipsInstr::Sll { d: Register::ARG0, s: size, shamt: WORD_SHIFT });
                self.push_asm(MipsInstr::Li { d: Register::RETURN_VALUE, imm: SYSCALL_SBRK.into() });
                self.push_asm(MipsInstr::Syscall);
                self.push_asm(MipsInstr::Move { d: arr, s: Register::RETURN_VALUE });
            }
            Opcode::ArrayAccess => {
                let arr = self.arg1_reg(instr)?;
                let idx = self.arg2_reg(instr)?;
                let d = self.result_reg(instr)?;
                self.push_asm(MipsInstr::Sll { d, s: idx, shamt: WORD_SHIFT });
                self.push_asm(MipsInstr::Add { d, a: d, b: arr });
                self.push_asm(MipsInstr::Lw { d, offset: 0, base: d });
            }
            Opcode::Label => {
                let name = target_label(instr)?;
                if name == "main" {
                    warn!("label 'main' duplicates the program entry label");
                }
                self.push_label(name);
            }
            Opcode::Nop => {
                // A declaration without initializer still claims its register.
                if instr.result.is_some() {
                    self.result_reg(instr)?;
                }
            }
            Opcode::EnterScope | Opcode::ExitScope => {}
        }
        Ok(())
    }
}

fn target_label(instr: &Instr) -> Result<String, CompileError> {
    match &instr.result {
        Some(Operand::Label(name)) => Ok(name.clone()),
        _ => Err(malformed(instr, "missing target label")),
    }
}

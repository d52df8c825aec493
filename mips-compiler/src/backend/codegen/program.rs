//! Program-level code generation orchestration.

use super::Codegen;
use crate::ir::ProgramIR;
use crate::CompileError;
use tracing::debug;

impl Codegen {
    /// Lower every IR instruction in order.
    ///
    /// The allocator is told when each instruction's code is complete, so a
    /// releasing policy can reclaim registers of temporaries that just died.
    pub fn emit_program(&mut self, ir: &ProgramIR) -> Result<(), CompileError> {
        for (idx, instr) in ir.iter().enumerate() {
            self.current_ir = Some(idx);
            self.emit_instr(instr)?;
            self.reg.end_instruction(idx);
        }
        self.current_ir = None;

        debug!(
            ir = ir.len(),
            asm = self.out.len(),
            bound = self.reg.table().len(),
            pool = self.reg.table().pool_size(),
            "emission finished"
        );
        Ok(())
    }
}

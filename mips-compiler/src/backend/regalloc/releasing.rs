use super::{RegAllocator, RegisterTable};
use crate::backend::abi::Register;
use crate::backend::liveness::LastUse;
use crate::ir::{Operand, ProgramIR, Symbol};
use crate::CompileError;

/// Gives a temporary's register back once its last mention has been emitted.
///
/// Every variable is bound up front, in order of first mention, and keeps
/// its register for the whole pass. A register freed by a temporary is
/// therefore only ever reused by another temporary, which keeps a loop from
/// overwriting a variable when it re-runs code that precedes the variable's
/// first textual mention.
pub struct ReleasingAllocator {
    table: RegisterTable,
    last_use: LastUse,
}

impl ReleasingAllocator {
    pub fn new(pool_size: usize, ir: &ProgramIR) -> Result<Self, CompileError> {
        let mut table = RegisterTable::new(pool_size);
        for operand in ir.iter().flat_map(|i| i.operands()) {
            if let Operand::Var(name) = operand {
                table.assign(&Symbol::Var(name.clone()))?;
            }
        }
        Ok(Self {
            table,
            last_use: LastUse::analyze(ir),
        })
    }
}

impl RegAllocator for ReleasingAllocator {
    fn assign(&mut self, sym: &Symbol) -> Result<Register, CompileError> {
        self.table.assign(sym)
    }

    fn lookup(&self, sym: &Symbol) -> Option<Register> {
        self.table.lookup(sym)
    }

    fn release(&mut self, sym: &Symbol) -> Option<Register> {
        self.table.release(sym)
    }

    fn end_instruction(&mut self, idx: usize) {
        for sym in self.last_use.dying_at(idx) {
            self.table.release(sym);
        }
    }

    fn table(&self) -> &RegisterTable {
        &self.table
    }
}

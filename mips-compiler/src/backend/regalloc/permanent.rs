use super::{RegAllocator, RegisterTable};
use crate::backend::abi::Register;
use crate::ir::Symbol;
use crate::CompileError;

/// Binds every symbol for the whole pass; nothing is ever handed back.
pub struct PermanentAllocator {
    table: RegisterTable,
}

impl PermanentAllocator {
    pub fn new(pool_size: usize) -> Self {
        Self { table: RegisterTable::new(pool_size) }
    }
}

impl RegAllocator for PermanentAllocator {
    fn assign(&mut self, sym: &Symbol) -> Result<Register, CompileError> {
        self.table.assign(sym)
    }

    fn lookup(&self, sym: &Symbol) -> Option<Register> {
        self.table.lookup(sym)
    }

    fn release(&mut self, sym: &Symbol) -> Option<Register> {
        self.table.release(sym)
    }

    fn table(&self) -> &RegisterTable {
        &self.table
    }
}

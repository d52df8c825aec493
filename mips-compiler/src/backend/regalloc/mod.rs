//! Register assignment interfaces and shared infrastructure.
//!
//! This module defines:
//! - [`RegAllocator`]: the trait the code generator talks to.
//! - [`RegisterTable`]: the symbol-to-register bookkeeping both policies share.
//!
//! There is no spilling: when every register in the pool is bound, the
//! pass fails with `RegisterPoolExhausted`.

mod permanent;
mod releasing;

pub use permanent::PermanentAllocator;
pub use releasing::ReleasingAllocator;

use super::abi::Register;
use crate::ir::Symbol;
use crate::CompileError;
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// Allocator trait
// ============================================================================

pub trait RegAllocator {
    /// Register bound to `sym`, binding the next free one on first sight.
    fn assign(&mut self, sym: &Symbol) -> Result<Register, CompileError>;

    fn lookup(&self, sym: &Symbol) -> Option<Register>;

    /// Unbind `sym` and return its register to the pool.
    fn release(&mut self, sym: &Symbol) -> Option<Register>;

    /// Called after all code for IR instruction `idx` has been emitted.
    fn end_instruction(&mut self, _idx: usize) {}

    fn table(&self) -> &RegisterTable;
}

// ============================================================================
// Shared bookkeeping
// ============================================================================

/// Fixed-size register file with permanent-until-released bindings.
///
/// The search for a free slot starts at `assigned % pool_size`, so without
/// releases the Nth distinct symbol gets the Nth register, and after a
/// release the cursor wraps around to the freed slot.
#[derive(Debug, Clone)]
pub struct RegisterTable {
    pool: Vec<Register>,
    slots: Vec<Option<Symbol>>,
    bindings: HashMap<Symbol, usize>,
    assigned: usize,
}

impl RegisterTable {
    /// Uses the first `size` registers of [`Register::POOL`].
    pub fn new(size: usize) -> Self {
        let pool: Vec<Register> = Register::POOL.iter().copied().take(size).collect();
        Self {
            slots: vec![None; pool.len()],
            pool,
            bindings: HashMap::new(),
            assigned: 0,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Number of symbols currently bound.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn lookup(&self, sym: &Symbol) -> Option<Register> {
        self.bindings.get(sym).map(|&slot| self.pool[slot])
    }

    pub fn assign(&mut self, sym: &Symbol) -> Result<Register, CompileError> {
        if let Some(r) = self.lookup(sym) {
            return Ok(r);
        }
        let size = self.pool.len();
        let start = if size == 0 { 0 } else { self.assigned % size };
        let slot = (0..size)
            .map(|i| (start + i) % size)
            .find(|&s| self.slots[s].is_none())
            .ok_or_else(|| CompileError::RegisterPoolExhausted {
                name: sym.to_string(),
                pool_size: size,
            })?;

        self.slots[slot] = Some(sym.clone());
        self.bindings.insert(sym.clone(), slot);
        self.assigned += 1;
        debug!(symbol = %sym, register = %self.pool[slot], "bind");
        Ok(self.pool[slot])
    }

    pub fn release(&mut self, sym: &Symbol) -> Option<Register> {
        let slot = self.bindings.remove(sym)?;
        self.slots[slot] = None;
        debug!(symbol = %sym, register = %self.pool[slot], "release");
        Some(self.pool[slot])
    }
}

//! Last-use analysis for compiler temporaries.
//!
//! A temporary is defined once and consumed inside the statement that
//! created it, so its live range is the textual span from definition to last
//! mention. No control-flow graph is needed as long as a freed register only
//! goes to another temporary: temporaries are never live across a loop's
//! back edge. Source variables are never considered dead and are bound
//! before emission by the releasing allocator.

use crate::ir::{Operand, ProgramIR, Symbol};
use std::collections::HashMap;

pub struct LastUse {
    /// For each instruction index, the temporaries mentioned for the last time.
    dying: Vec<Vec<Symbol>>,
}

impl LastUse {
    pub fn analyze(ir: &ProgramIR) -> Self {
        let mut last: HashMap<u32, usize> = HashMap::new();
        for (idx, instr) in ir.instrs.iter().enumerate() {
            for operand in instr.operands() {
                if let Operand::Temp(n) = operand {
                    last.insert(*n, idx);
                }
            }
        }

        let mut by_index: Vec<Vec<u32>> = vec![Vec::new(); ir.len()];
        for (temp, idx) in last {
            by_index[idx].push(temp);
        }
        let dying = by_index
            .into_iter()
            .map(|mut temps| {
                temps.sort_unstable();
                temps.into_iter().map(Symbol::Temp).collect()
            })
            .collect();
        Self { dying }
    }

    /// Temporaries whose last mention is instruction `idx`.
    pub fn dying_at(&self, idx: usize) -> &[Symbol] {
        self.dying.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }
}

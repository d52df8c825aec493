use crate::ir::*;
use tracing::{debug, trace};

/// Fresh temporaries (`t0`, `t1`, ...) and labels (`L0`, `L1`, ...).
/// Counters only grow; a name is never handed out twice.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    temp_count: u32,
    label_count: u32,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_temp(&mut self) -> Operand {
        let t = Operand::Temp(self.temp_count);
        self.temp_count += 1;
        t
    }

    pub fn new_label(&mut self) -> Operand {
        let l = Operand::Label(format!("L{}", self.label_count));
        self.label_count += 1;
        l
    }

    pub fn temps_issued(&self) -> u32 {
        self.temp_count
    }

    pub fn labels_issued(&self) -> u32 {
        self.label_count
    }
}

pub struct Gen {
    pub out: ProgramIR,
    pub names: NameAllocator,
    /// Emit merge-point and back-edge jumps around `if`/`while`.
    pub close_control_flow: bool,
    /// Nesting depth of [`Gen::capture`]; captured instructions have no final
    /// position until they are spliced back.
    capture_depth: u32,
}

impl Gen {
    pub fn new(close_control_flow: bool) -> Self {
        Self {
            out: ProgramIR::new(),
            names: NameAllocator::new(),
            close_control_flow,
            capture_depth: 0,
        }
    }

    pub fn finish(self) -> ProgramIR {
        debug!(
            instrs = self.out.len(),
            temps = self.names.temps_issued(),
            labels = self.names.labels_issued(),
            "lowering finished"
        );
        self.out
    }

    pub fn new_temp(&mut self) -> Operand {
        self.names.new_temp()
    }

    pub fn new_label(&mut self) -> Operand {
        self.names.new_label()
    }

    pub fn emit(&mut self, i: Instr) {
        // Captured instructions are traced again, with their real index, when spliced.
        if let Some(index) = self.emit_position() {
            trace!(index, instr = %i, "emit");
        }
        self.out.instrs.push(i);
    }

    /// Index the next emitted instruction will have in the final sequence.
    pub fn emit_position(&self) -> Option<usize> {
        (self.capture_depth == 0).then(|| self.out.len())
    }

    /// Run `f` against an empty instruction buffer and hand back what it
    /// emitted, leaving the main sequence untouched.
    pub fn capture<F, R>(&mut self, f: F) -> (Vec<Instr>, R)
    where
        F: FnOnce(&mut Self) -> R,
    {
        let saved = std::mem::take(&mut self.out.instrs);
        self.capture_depth += 1;
        let result = f(self);
        self.capture_depth -= 1;
        let captured = std::mem::replace(&mut self.out.instrs, saved);
        (captured, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_instructions_have_no_position_until_spliced() {
        let mut g = Gen::new(false);
        g.emit(Instr::new(Opcode::EnterScope));
        assert_eq!(g.emit_position(), Some(1));

        let (captured, inner) = g.capture(|g| {
            g.emit(Instr::new(Opcode::Nop));
            g.emit_position()
        });
        assert_eq!(inner, None, "buffer-relative indices must not be reported");
        assert_eq!(g.emit_position(), Some(1));

        for i in captured {
            g.emit(i);
        }
        assert_eq!(g.emit_position(), Some(2));
    }
}

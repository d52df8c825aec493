//! MIPS backend: lowers IR to MIPS assembly.
//!
//! Module layout:
//! - `abi`         register definitions and ABI constants
//! - `instruction` typed machine instructions and assembly output items
//! - `liveness`    last-use scan for temporaries
//! - `regalloc`    register assignment trait and policies
//! - `codegen`     code generation driver (IR → assembly)

pub mod abi;
pub mod instruction;
mod liveness;
pub mod regalloc;
mod codegen;

pub use codegen::MipsAsm;

use crate::ir::ProgramIR;
use crate::options::{CompileOptions, RegisterPolicy};
use crate::CompileError;
use codegen::Codegen;
use regalloc::{PermanentAllocator, RegAllocator, ReleasingAllocator};

/// Compile IR to MIPS assembly with a per-line IR mapping.
pub fn compile_ir_to_mips(ir: &ProgramIR, options: &CompileOptions) -> Result<MipsAsm, CompileError> {
    options.validate()?;
    let reg: Box<dyn RegAllocator> = match options.register_policy {
        RegisterPolicy::Permanent => Box::new(PermanentAllocator::new(options.register_count)),
        RegisterPolicy::ReleaseDeadTemps => {
            Box::new(ReleasingAllocator::new(options.register_count, ir)?)
        }
    };
    let mut cg = Codegen::with_regalloc(reg, options.close_control_flow);
    cg.emit_program(ir)?;
    Ok(cg.finish_codegen())
}

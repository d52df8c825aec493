use crate::backend::abi::Register;
use crate::CompileError;
use serde::{Deserialize, Serialize};

/// What happens to a register once its symbol is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegisterPolicy {
    /// A bound symbol keeps its register for the rest of the pass.
    #[default]
    Permanent,
    /// Temporaries give their register back after their last textual use.
    ReleaseDeadTemps,
}

/// Knobs shared by lowering and emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompileOptions {
    /// Number of physical registers available for symbols.
    pub register_count: usize,
    pub register_policy: RegisterPolicy,
    /// Emit the merge-point and back-edge jumps `if`/`while` need to run.
    pub close_control_flow: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            register_count: Register::DEFAULT_POOL_SIZE,
            register_policy: RegisterPolicy::Permanent,
            close_control_flow: false,
        }
    }
}

impl CompileOptions {
    pub fn validate(&self) -> Result<(), CompileError> {
        let max = Register::POOL.len();
        if self.register_count == 0 || self.register_count > max {
            return Err(CompileError::InvalidOptions(format!(
                "register_count must be between 1 and {max}, got {}",
                self.register_count
            )));
        }
        Ok(())
    }
}

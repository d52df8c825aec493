use std::fmt;

/// MIPS registers the backend names explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Zero,
    V0,
    A0,
    T0, T1, T2, T3, T4, T5, T6, T7, T8, T9,
    S0, S1, S2, S3, S4, S5, S6, S7,
    Ra,
}

impl Register {
    /// Registers handed out to symbols, in assignment order.
    pub const POOL: [Register; 18] = [
        Register::T0, Register::T1, Register::T2, Register::T3, Register::T4,
        Register::T5, Register::T6, Register::T7, Register::T8, Register::T9,
        Register::S0, Register::S1, Register::S2, Register::S3,
        Register::S4, Register::S5, Register::S6, Register::S7,
    ];

    /// `$t0..$t9`
    pub const DEFAULT_POOL_SIZE: usize = 10;

    pub const ZERO_REG: Register = Register::Zero;
    pub const RETURN_VALUE: Register = Register::V0;
    pub const RETURN_ADDR: Register = Register::Ra;
    /// First argument register; also the syscall argument.
    pub const ARG0: Register = Register::A0;

    pub fn as_str(&self) -> &'static str {
        match self {
            Register::Zero => "$zero",
            Register::V0 => "$v0",
            Register::A0 => "$a0",
            Register::T0 => "$t0",
            Register::T1 => "$t1",
            Register::T2 => "$t2",
            Register::T3 => "$t3",
            Register::T4 => "$t4",
            Register::T5 => "$t5",
            Register::T6 => "$t6",
            Register::T7 => "$t7",
            Register::T8 => "$t8",
            Register::T9 => "$t9",
            Register::S0 => "$s0",
            Register::S1 => "$s1",
            Register::S2 => "$s2",
            Register::S3 => "$s3",
            Register::S4 => "$s4",
            Register::S5 => "$s5",
            Register::S6 => "$s6",
            Register::S7 => "$s7",
            Register::Ra => "$ra",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

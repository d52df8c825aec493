// A flat three-address IR: one opcode, up to two sources, one result.

use crate::CompileError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramIR {
    pub instrs: Vec<Instr>,
}

impl ProgramIR {
    pub fn new() -> Self {
        Self { instrs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instr> {
        self.instrs.iter()
    }

    /// Render the listing form read back by [`crate::ir::listing::parse`].
    pub fn to_lines(&self) -> Vec<String> {
        self.instrs.iter().map(|i| i.to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a ProgramIR {
    type Item = &'a Instr;
    type IntoIter = std::slice::Iter<'a, Instr>;

    fn into_iter(self) -> Self::IntoIter {
        self.instrs.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `=`
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    /// Load immediate.
    Mov,
    Load,
    Store,
    IfGoto,
    Goto,
    /// Loop-head marker.
    While,
    Call,
    Return,
    AllocArray,
    ArrayAccess,
    Neg,
    Not,
    EnterScope,
    ExitScope,
    Label,
    Nop,
}

impl Opcode {
    pub const ALL: [Opcode; 21] = [
        Opcode::Assign, Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::Div,
        Opcode::Mov, Opcode::Load, Opcode::Store, Opcode::IfGoto, Opcode::Goto,
        Opcode::While, Opcode::Call, Opcode::Return, Opcode::AllocArray,
        Opcode::ArrayAccess, Opcode::Neg, Opcode::Not, Opcode::EnterScope,
        Opcode::ExitScope, Opcode::Label, Opcode::Nop,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Assign => "=",
            Opcode::Add => "+",
            Opcode::Sub => "-",
            Opcode::Mul => "*",
            Opcode::Div => "/",
            Opcode::Mov => "MOV",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::IfGoto => "IFGOTO",
            Opcode::Goto => "GOTO",
            Opcode::While => "WHILE",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::AllocArray => "ALLOC_ARRAY",
            Opcode::ArrayAccess => "ARRAY_ACCESS",
            Opcode::Neg => "NEG",
            Opcode::Not => "NOT",
            Opcode::EnterScope => "ENTER_SCOPE",
            Opcode::ExitScope => "EXIT_SCOPE",
            Opcode::Label => "LABEL",
            Opcode::Nop => "NOP",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic() == s)
            .ok_or_else(|| CompileError::UnknownOpcode(s.to_string()))
    }
}

/// A symbol that can occupy a register: compiler temporary or source variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Temp(u32),
    Var(String),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Temp(n) => write!(f, "t{n}"),
            Symbol::Var(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Compiler temporary `t<n>`.
    Temp(u32),
    /// Source-level identifier.
    Var(String),
    /// Literal value as written.
    Imm(String),
    /// Jump target or function name.
    Label(String),
}

impl Operand {
    pub fn var(name: impl Into<String>) -> Self {
        Operand::Var(name.into())
    }

    pub fn label(name: impl Into<String>) -> Self {
        Operand::Label(name.into())
    }

    /// The register-table key, for operands that live in registers.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Operand::Temp(n) => Some(Symbol::Temp(*n)),
            Operand::Var(name) => Some(Symbol::Var(name.clone())),
            Operand::Imm(_) | Operand::Label(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Temp(n) => write!(f, "%t{n}"),
            Operand::Var(s) => f.write_str(s),
            Operand::Imm(s) => write!(f, "#{s}"),
            Operand::Label(s) => write!(f, "@{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instr {
    pub op: Opcode,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
    pub result: Option<Operand>,
}

impl Instr {
    pub fn new(op: Opcode) -> Self {
        Self { op, arg1: None, arg2: None, result: None }
    }

    pub fn with_arg1(mut self, arg: Operand) -> Self {
        self.arg1 = Some(arg);
        self
    }

    pub fn with_arg2(mut self, arg: Operand) -> Self {
        self.arg2 = Some(arg);
        self
    }

    pub fn with_result(mut self, result: Operand) -> Self {
        self.result = Some(result);
        self
    }

    /// Operands in `arg1, arg2, result` order, skipping empty slots.
    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        [&self.arg1, &self.arg2, &self.result]
            .into_iter()
            .filter_map(Option::as_ref)
    }
}

/// `OPCODE [arg1[, arg2]] [-> result]`
impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        if let Some(a) = &self.arg1 {
            write!(f, " {a}")?;
            if let Some(b) = &self.arg2 {
                write!(f, ", {b}")?;
            }
        }
        if let Some(r) = &self.result {
            write!(f, " -> {r}")?;
        }
        Ok(())
    }
}

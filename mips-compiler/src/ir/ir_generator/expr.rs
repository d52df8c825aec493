use super::context::Gen;
use super::stmt::{malformed, required_child};
use crate::ir::ast::{Node, Operator, Payload};
use crate::ir::*;
use crate::CompileError;

impl Gen {
    pub fn lower_binary(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let op = node
            .operator()
            .ok_or_else(|| malformed(node, "binary expression without an operator"))?;
        let op = map_arith(op).ok_or_else(|| {
            CompileError::UnsupportedConstruct(format!("operator '{op}' in a binary expression"))
        })?;
        let left = required_child(node, 0, "left operand")?;
        let right = required_child(node, 1, "right operand")?;

        let l = self.lower_value(left)?;
        let r = self.lower_value(right)?;
        let t = self.new_temp();
        self.emit(Instr::new(op).with_arg1(l).with_arg2(r).with_result(t.clone()));
        Ok(t)
    }

    pub fn lower_unary(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let op = match node.operator() {
            Some(Operator::Negate | Operator::Minus) => Opcode::Neg,
            Some(Operator::Not) => Opcode::Not,
            Some(other) => {
                return Err(CompileError::UnsupportedConstruct(format!(
                    "operator '{other}' in a unary expression"
                )))
            }
            None => return Err(malformed(node, "unary expression without an operator")),
        };
        let operand = required_child(node, 0, "operand")?;

        let v = self.lower_value(operand)?;
        let t = self.new_temp();
        self.emit(Instr::new(op).with_arg1(v).with_result(t.clone()));
        Ok(t)
    }

    pub fn lower_literal(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let text = match &node.payload {
            Payload::Int(v) => v.to_string(),
            // Debug keeps the fractional part, so `3.0` does not read as an int.
            Payload::Float(v) => format!("{v:?}"),
            _ => return Err(malformed(node, "literal without a numeric value")),
        };
        let t = self.new_temp();
        self.emit(Instr::new(Opcode::Mov).with_arg1(Operand::Imm(text)).with_result(t.clone()));
        Ok(t)
    }

    pub fn lower_variable(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let name = node
            .ident()
            .ok_or_else(|| malformed(node, "variable reference without a name"))?;
        let t = self.new_temp();
        self.emit(Instr::new(Opcode::Load).with_arg1(Operand::var(name)).with_result(t.clone()));
        Ok(t)
    }

    pub fn lower_call(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let callee = node
            .callee()
            .ok_or_else(|| malformed(node, "call without a callee name"))?;
        for arg in node.call_arguments() {
            self.lower_node(arg)?;
        }
        let t = self.new_temp();
        self.emit(Instr::new(Opcode::Call).with_arg1(Operand::label(callee)).with_result(t.clone()));
        Ok(t)
    }

    pub fn lower_array_access(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let name = node
            .child(0)
            .and_then(Node::ident)
            .ok_or_else(|| malformed(node, "array access without an array name"))?;
        let index = required_child(node, 1, "index")?;

        let i = self.lower_value(index)?;
        let t = self.new_temp();
        self.emit(
            Instr::new(Opcode::ArrayAccess)
                .with_arg1(Operand::var(name))
                .with_arg2(i)
                .with_result(t.clone()),
        );
        Ok(t)
    }
}

pub fn map_arith(op: Operator) -> Option<Opcode> {
    match op {
        Operator::Plus => Some(Opcode::Add),
        Operator::Minus => Some(Opcode::Sub),
        Operator::Multiply => Some(Opcode::Mul),
        Operator::Divide => Some(Opcode::Div),
        Operator::Negate | Operator::Not => None,
    }
}

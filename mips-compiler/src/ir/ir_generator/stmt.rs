use super::context::Gen;
use crate::ir::ast::{Node, NodeKind};
use crate::ir::*;
use crate::CompileError;
use tracing::trace;

impl Gen {
    /// Lower one node, appending its instructions in program order.
    ///
    /// Returns the operand carrying the node's value when it has one:
    /// expressions yield their temporary, declarations and assignments yield
    /// the target variable, everything else yields `None`.
    pub fn lower_node(&mut self, node: &Node) -> Result<Option<Operand>, CompileError> {
        trace!(kind = %node.kind, children = node.children.len(), "lower");
        match node.kind {
            NodeKind::Program | NodeKind::Arguments => {
                for child in &node.children {
                    self.lower_node(child)?;
                }
                Ok(None)
            }
            NodeKind::Block => {
                self.emit(Instr::new(Opcode::EnterScope));
                for child in &node.children {
                    self.lower_node(child)?;
                }
                self.emit(Instr::new(Opcode::ExitScope));
                Ok(None)
            }
            NodeKind::Declaration => self.lower_declaration(node).map(Some),
            NodeKind::Assignment => self.lower_assignment(node).map(Some),
            NodeKind::IfStatement => self.lower_if(node).map(|_| None),
            NodeKind::WhileLoop => self.lower_while(node).map(|_| None),
            NodeKind::ReturnStatement => {
                let value = match node.child(0) {
                    Some(expr) => Some(self.lower_value(expr)?),
                    None => None,
                };
                let mut ret = Instr::new(Opcode::Return);
                ret.arg1 = value;
                self.emit(ret);
                Ok(None)
            }
            NodeKind::FunctionDeclaration => self.lower_function(node).map(|_| None),
            NodeKind::ArrayDeclaration => self.lower_array_declaration(node).map(|_| None),
            NodeKind::Parameter | NodeKind::Type | NodeKind::ParameterList => Ok(None),
            NodeKind::BinaryExpr => self.lower_binary(node).map(Some),
            NodeKind::UnaryExpr => self.lower_unary(node).map(Some),
            NodeKind::Literal => self.lower_literal(node).map(Some),
            NodeKind::Variable => self.lower_variable(node).map(Some),
            NodeKind::FunctionCall => self.lower_call(node).map(Some),
            NodeKind::ArrayAccess => self.lower_array_access(node).map(Some),
            NodeKind::Unexpected => Err(CompileError::UnsupportedConstruct(format!(
                "{} node has no lowering rule",
                node.kind
            ))),
        }
    }

    /// Lower a node that must produce a value.
    pub fn lower_value(&mut self, node: &Node) -> Result<Operand, CompileError> {
        self.lower_node(node)?.ok_or_else(|| {
            CompileError::UnsupportedConstruct(format!("{} node used where a value is required", node.kind))
        })
    }

    fn lower_declaration(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let name = node.declared_name().ok_or_else(|| {
            CompileError::MalformedDeclaration("declaration without an identifier".to_string())
        })?;
        let target = Operand::var(name);
        match node.child(2) {
            Some(init) => {
                // The initializer's instructions come first, then the store.
                let value = self.lower_value(init)?;
                self.emit(Instr::new(Opcode::Assign).with_arg1(value).with_result(target.clone()));
            }
            None => {
                self.emit(Instr::new(Opcode::Nop).with_result(target.clone()));
            }
        }
        Ok(target)
    }

    fn lower_assignment(&mut self, node: &Node) -> Result<Operand, CompileError> {
        let name = node
            .child(0)
            .and_then(Node::ident)
            .ok_or_else(|| malformed(node, "assignment target is not an identifier"))?;
        let value_node = match node.children.last() {
            Some(v) if node.children.len() >= 2 => v,
            _ => return Err(malformed(node, "assignment has no value")),
        };
        let value = self.lower_value(value_node)?;
        let target = Operand::var(name);
        self.emit(Instr::new(Opcode::Assign).with_arg1(value).with_result(target.clone()));
        Ok(target)
    }

    fn lower_if(&mut self, node: &Node) -> Result<(), CompileError> {
        let cond = required_child(node, 0, "condition")?;
        let then_branch = required_child(node, 1, "then-branch")?;
        let else_branch = node.child(2);

        let c = self.lower_value(cond)?;
        let skip = self.new_label();
        self.emit(Instr::new(Opcode::IfGoto).with_arg1(c).with_result(skip.clone()));
        self.lower_node(then_branch)?;

        if !self.close_control_flow {
            if let Some(e) = else_branch {
                self.lower_node(e)?;
            }
            return Ok(());
        }

        match else_branch {
            Some(e) => {
                let end = self.new_label();
                self.emit(Instr::new(Opcode::Goto).with_result(end.clone()));
                self.emit(Instr::new(Opcode::Label).with_result(skip));
                self.lower_node(e)?;
                self.emit(Instr::new(Opcode::Label).with_result(end));
            }
            None => self.emit(Instr::new(Opcode::Label).with_result(skip)),
        }
        Ok(())
    }

    fn lower_while(&mut self, node: &Node) -> Result<(), CompileError> {
        let cond = required_child(node, 0, "condition")?;
        let body = required_child(node, 1, "body")?;

        if self.close_control_flow {
            let head = self.new_label();
            let exit = self.new_label();
            self.emit(Instr::new(Opcode::Label).with_result(head.clone()));
            let c = self.lower_value(cond)?;
            self.emit(Instr::new(Opcode::IfGoto).with_arg1(c).with_result(exit.clone()));
            self.lower_node(body)?;
            self.emit(Instr::new(Opcode::Goto).with_result(head));
            self.emit(Instr::new(Opcode::Label).with_result(exit));
            return Ok(());
        }

        // The loop-head marker names the condition's value but precedes the
        // instructions computing it.
        let (cond_instrs, c) = self.capture(|g| g.lower_value(cond));
        let c = c?;
        let head = self.new_label();
        self.emit(Instr::new(Opcode::While).with_arg1(c).with_result(head));
        for i in cond_instrs {
            self.emit(i);
        }
        self.lower_node(body)?;
        Ok(())
    }

    fn lower_function(&mut self, node: &Node) -> Result<(), CompileError> {
        if node.children.len() < 4 {
            return Err(CompileError::MalformedDeclaration(format!(
                "function declaration needs type, name, parameter list and body; found {} children",
                node.children.len()
            )));
        }
        let name = node
            .child(1)
            .filter(|n| n.kind == NodeKind::Variable)
            .and_then(Node::ident)
            .ok_or_else(|| {
                CompileError::MalformedDeclaration(
                    "function name is missing or not an identifier".to_string(),
                )
            })?;

        self.emit(Instr::new(Opcode::Label).with_result(Operand::label(name)));
        self.lower_node(&node.children[3])?;
        self.emit(Instr::new(Opcode::Return));
        Ok(())
    }

    fn lower_array_declaration(&mut self, node: &Node) -> Result<(), CompileError> {
        let name = node.declared_name().ok_or_else(|| {
            CompileError::MalformedDeclaration("array declaration without an identifier".to_string())
        })?;
        let size = node.child(2).ok_or_else(|| {
            CompileError::MalformedDeclaration(format!("array '{name}' has no size expression"))
        })?;
        let s = self.lower_value(size)?;
        self.emit(Instr::new(Opcode::AllocArray).with_arg1(Operand::var(name)).with_arg2(s));
        Ok(())
    }
}

pub(super) fn required_child<'a>(node: &'a Node, index: usize, what: &str) -> Result<&'a Node, CompileError> {
    node.child(index)
        .ok_or_else(|| malformed(node, &format!("missing {what} (child {index})")))
}

pub(super) fn malformed(node: &Node, reason: &str) -> CompileError {
    CompileError::MalformedNode {
        kind: node.kind,
        reason: reason.to_string(),
    }
}

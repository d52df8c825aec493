//! Declaration and use checking over lexical scopes.
//!
//! This is the front end's last gate before lowering: every identifier use
//! must resolve through the scope stack and no name may be declared twice in
//! one scope. Lowering itself never re-validates identifiers.

use super::ast::{Node, NodeKind, Payload, TypeCode};
use super::symbol_table::SymbolTable;
use crate::{CompileError, SemanticErrorKind};
use tracing::debug;

pub fn check(program: &Node) -> Result<(), CompileError> {
    let mut checker = ScopeChecker { symbols: SymbolTable::new() };
    checker.visit(program)?;
    debug!("scope check passed");
    Ok(())
}

struct ScopeChecker {
    symbols: SymbolTable,
}

impl ScopeChecker {
    fn visit(&mut self, node: &Node) -> Result<(), CompileError> {
        match node.kind {
            NodeKind::Block => {
                self.symbols.push_scope();
                let result = self.visit_all(&node.children);
                self.symbols.pop_scope();
                result
            }
            NodeKind::Declaration | NodeKind::ArrayDeclaration => {
                if let Some(init) = node.child(2) {
                    self.visit(init)?;
                }
                self.declare(node)
            }
            NodeKind::FunctionDeclaration => {
                // Declared before the body so recursive calls resolve.
                self.declare(node)?;
                self.symbols.push_scope();
                let result = self.visit_function_inner(node);
                self.symbols.pop_scope();
                result
            }
            NodeKind::Parameter => self.declare(node),
            NodeKind::Assignment => {
                let target = node
                    .child(0)
                    .and_then(Node::ident)
                    .ok_or_else(|| malformed(node, "assignment target is not an identifier"))?;
                self.resolve(target, SemanticErrorKind::UndeclaredVariable)?;
                match node.children.last() {
                    Some(value) if node.children.len() > 1 => self.visit(value),
                    _ => Ok(()),
                }
            }
            NodeKind::Variable => {
                let name = node
                    .ident()
                    .ok_or_else(|| malformed(node, "variable reference without a name"))?;
                self.resolve(name, SemanticErrorKind::UndeclaredVariable)
            }
            NodeKind::ArrayAccess => {
                let name = node
                    .child(0)
                    .and_then(Node::ident)
                    .ok_or_else(|| malformed(node, "array access without an array name"))?;
                self.resolve(name, SemanticErrorKind::UndeclaredVariable)?;
                self.visit_all(node.children.get(1..).unwrap_or(&[]))
            }
            NodeKind::FunctionCall => {
                let callee = node
                    .callee()
                    .ok_or_else(|| malformed(node, "call without a callee name"))?;
                self.resolve(callee, SemanticErrorKind::UndeclaredFunction)?;
                self.visit_all(node.call_arguments())
            }
            NodeKind::Type | NodeKind::Literal | NodeKind::ParameterList | NodeKind::Unexpected => Ok(()),
            _ => self.visit_all(&node.children),
        }
    }

    fn visit_all(&mut self, nodes: &[Node]) -> Result<(), CompileError> {
        nodes.iter().try_for_each(|n| self.visit(n))
    }

    fn visit_function_inner(&mut self, node: &Node) -> Result<(), CompileError> {
        if let Some(params) = node.child(2) {
            self.visit_all(&params.children)?;
        }
        match node.child(3) {
            Some(body) => self.visit(body),
            None => Ok(()),
        }
    }

    fn declare(&mut self, node: &Node) -> Result<(), CompileError> {
        let Some(name) = node.declared_name() else {
            return Err(CompileError::MalformedDeclaration(format!(
                "{} without an identifier",
                node.kind
            )));
        };
        let ty = declared_type(node);
        self.symbols.declare(name, ty).map_err(|existing| CompileError::Semantic {
            kind: SemanticErrorKind::Redeclaration,
            message: format!("'{name}' is already declared as {existing} in this scope"),
        })
    }

    fn resolve(&self, name: &str, kind: SemanticErrorKind) -> Result<(), CompileError> {
        if self.symbols.lookup(name).is_some() {
            return Ok(());
        }
        let what = match kind {
            SemanticErrorKind::UndeclaredFunction => "function",
            _ => "variable",
        };
        Err(CompileError::Semantic {
            kind,
            message: format!("{what} '{name}' is not declared"),
        })
    }
}

fn malformed(node: &Node, reason: &str) -> CompileError {
    CompileError::MalformedNode {
        kind: node.kind,
        reason: reason.to_string(),
    }
}

fn declared_type(node: &Node) -> TypeCode {
    match node.child(0).map(|c| &c.payload) {
        Some(Payload::Type(t)) => *t,
        _ => TypeCode::Unknown,
    }
}

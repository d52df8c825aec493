//! Typed syntax tree handed over by the front end.
//!
//! Every node owns its children outright; child order is significant and is
//! documented per kind on [`NodeKind`]. The lowering engine trusts the shape
//! of a tree that passed semantic analysis and only reports the structural
//! holes it cannot work around.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Top-level statement list.
    Program,
    /// `[Type, Variable(name), init?]`
    Declaration,
    /// `[Variable(target), value]`; the value is the last child.
    Assignment,
    /// `[cond, then, else?]`
    IfStatement,
    /// `[cond, body]`
    WhileLoop,
    /// `[Variable(callee), args...]`; args may be wrapped in one `Arguments` node.
    FunctionCall,
    /// `[value?]`
    ReturnStatement,
    /// Payload `Op`, `[left, right]`
    BinaryExpr,
    /// Payload `Op`, `[operand]`
    UnaryExpr,
    /// Payload `Int` or `Float`.
    Literal,
    /// Payload `Ident`.
    Variable,
    /// `[Type, Variable(name), ParameterList, body]`
    FunctionDeclaration,
    /// `[Type, Variable(name)]` or payload `Ident`.
    Parameter,
    /// `[Type, Variable(name), size]`
    ArrayDeclaration,
    /// `[Variable(array), index]`
    ArrayAccess,
    /// Payload `Type`.
    Type,
    Block,
    Arguments,
    ParameterList,
    /// Placeholder left behind by parser error recovery.
    Unexpected,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Declaration => "Declaration",
            NodeKind::Assignment => "Assignment",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::WhileLoop => "WhileLoop",
            NodeKind::FunctionCall => "FunctionCall",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::BinaryExpr => "BinaryExpr",
            NodeKind::UnaryExpr => "UnaryExpr",
            NodeKind::Literal => "Literal",
            NodeKind::Variable => "Variable",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::Parameter => "Parameter",
            NodeKind::ArrayDeclaration => "ArrayDeclaration",
            NodeKind::ArrayAccess => "ArrayAccess",
            NodeKind::Type => "Type",
            NodeKind::Block => "Block",
            NodeKind::Arguments => "Arguments",
            NodeKind::ParameterList => "ParameterList",
            NodeKind::Unexpected => "Unexpected",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
    Negate,
    Not,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Negate => "neg",
            Operator::Not => "!",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCode {
    Int,
    Float,
    String,
    Void,
    Bool,
    Unknown,
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeCode::Int => "int",
            TypeCode::Float => "float",
            TypeCode::String => "string",
            TypeCode::Void => "void",
            TypeCode::Bool => "bool",
            TypeCode::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Per-kind value carried by a node; at most one is meaningful for a kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Payload {
    #[default]
    None,
    Int(i64),
    Float(f64),
    Ident(String),
    Op(Operator),
    Type(TypeCode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, payload: Payload::None, children: Vec::new() }
    }

    pub fn with_payload(kind: NodeKind, payload: Payload) -> Self {
        Self { kind, payload, children: Vec::new() }
    }

    /// Builder form of [`Node::add_child`].
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children<I: IntoIterator<Item = Node>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    /// Identifier text, if this node carries one.
    pub fn ident(&self) -> Option<&str> {
        match &self.payload {
            Payload::Ident(s) => Some(s),
            _ => None,
        }
    }

    /// Name introduced by a declaration-like node. Parameters may carry it
    /// as payload instead of a `Variable` child.
    pub fn declared_name(&self) -> Option<&str> {
        self.ident().or_else(|| {
            self.child(1)
                .filter(|c| c.kind == NodeKind::Variable)
                .and_then(Node::ident)
        })
    }

    /// Callee of a `FunctionCall`: the leading `Variable` child, else the payload.
    pub fn callee(&self) -> Option<&str> {
        self.child(0)
            .filter(|c| c.kind == NodeKind::Variable)
            .and_then(Node::ident)
            .or_else(|| self.ident())
    }

    /// Argument expressions of a `FunctionCall`, after the callee child.
    pub fn call_arguments(&self) -> &[Node] {
        let start = usize::from(self.child(0).is_some_and(|c| c.kind == NodeKind::Variable));
        &self.children[start..]
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.payload {
            Payload::Op(op) => Some(op),
            _ => None,
        }
    }

    // ── Convenience constructors ────────────────────────────────────────

    pub fn program<I: IntoIterator<Item = Node>>(statements: I) -> Self {
        Node::new(NodeKind::Program).with_children(statements)
    }

    pub fn block<I: IntoIterator<Item = Node>>(statements: I) -> Self {
        Node::new(NodeKind::Block).with_children(statements)
    }

    pub fn int(value: i64) -> Self {
        Node::with_payload(NodeKind::Literal, Payload::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Node::with_payload(NodeKind::Literal, Payload::Float(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Node::with_payload(NodeKind::Variable, Payload::Ident(name.into()))
    }

    pub fn type_node(ty: TypeCode) -> Self {
        Node::with_payload(NodeKind::Type, Payload::Type(ty))
    }

    pub fn binary(op: Operator, left: Node, right: Node) -> Self {
        Node::with_payload(NodeKind::BinaryExpr, Payload::Op(op))
            .with_child(left)
            .with_child(right)
    }

    pub fn unary(op: Operator, operand: Node) -> Self {
        Node::with_payload(NodeKind::UnaryExpr, Payload::Op(op)).with_child(operand)
    }

    pub fn declaration(ty: TypeCode, name: &str, init: Option<Node>) -> Self {
        let node = Node::new(NodeKind::Declaration)
            .with_child(Node::type_node(ty))
            .with_child(Node::variable(name));
        match init {
            Some(init) => node.with_child(init),
            None => node,
        }
    }

    pub fn assignment(target: &str, value: Node) -> Self {
        Node::new(NodeKind::Assignment)
            .with_child(Node::variable(target))
            .with_child(value)
    }

    pub fn if_stmt(cond: Node, then_branch: Node, else_branch: Option<Node>) -> Self {
        let node = Node::new(NodeKind::IfStatement)
            .with_child(cond)
            .with_child(then_branch);
        match else_branch {
            Some(e) => node.with_child(e),
            None => node,
        }
    }

    pub fn while_loop(cond: Node, body: Node) -> Self {
        Node::new(NodeKind::WhileLoop).with_child(cond).with_child(body)
    }

    pub fn return_stmt(value: Option<Node>) -> Self {
        let node = Node::new(NodeKind::ReturnStatement);
        match value {
            Some(v) => node.with_child(v),
            None => node,
        }
    }

    pub fn call<I: IntoIterator<Item = Node>>(callee: &str, args: I) -> Self {
        Node::with_payload(NodeKind::FunctionCall, Payload::Ident(callee.to_string()))
            .with_child(Node::variable(callee))
            .with_child(Node::new(NodeKind::Arguments).with_children(args))
    }

    pub fn parameter(ty: TypeCode, name: &str) -> Self {
        Node::new(NodeKind::Parameter)
            .with_child(Node::type_node(ty))
            .with_child(Node::variable(name))
    }

    pub fn function(ty: TypeCode, name: &str, params: &[(TypeCode, &str)], body: Node) -> Self {
        let params = Node::new(NodeKind::ParameterList)
            .with_children(params.iter().map(|(t, n)| Node::parameter(*t, n)));
        Node::new(NodeKind::FunctionDeclaration)
            .with_child(Node::type_node(ty))
            .with_child(Node::variable(name))
            .with_child(params)
            .with_child(body)
    }

    pub fn array_declaration(ty: TypeCode, name: &str, size: Node) -> Self {
        Node::new(NodeKind::ArrayDeclaration)
            .with_child(Node::type_node(ty))
            .with_child(Node::variable(name))
            .with_child(size)
    }

    pub fn array_access(name: &str, index: Node) -> Self {
        Node::new(NodeKind::ArrayAccess)
            .with_child(Node::variable(name))
            .with_child(index)
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        write!(f, "{:width$}{}", "", self.kind, width = level * 2)?;
        match (&self.kind, &self.payload) {
            (NodeKind::Literal, Payload::Int(v)) => write!(f, " ({v})")?,
            (NodeKind::Literal, Payload::Float(v)) => write!(f, " ({v})")?,
            (NodeKind::Variable | NodeKind::FunctionCall, Payload::Ident(s)) => write!(f, " ({s})")?,
            (NodeKind::BinaryExpr | NodeKind::UnaryExpr, Payload::Op(op)) => write!(f, " ({op})")?,
            (NodeKind::Type, Payload::Type(t)) => write!(f, " ({t})")?,
            _ => {}
        }
        writeln!(f)?;
        for child in &self.children {
            child.fmt_indented(f, level + 1)?;
        }
        Ok(())
    }
}

/// Indented tree dump, two spaces per level.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_indents_children() {
        let tree = Node::program([Node::assignment(
            "x",
            Node::binary(Operator::Plus, Node::int(1), Node::variable("y")),
        )]);
        let dump = tree.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "Program");
        assert_eq!(lines[1], "  Assignment");
        assert_eq!(lines[2], "    Variable (x)");
        assert_eq!(lines[3], "    BinaryExpr (+)");
        assert_eq!(lines[4], "      Literal (1)");
        assert_eq!(lines[5], "      Variable (y)");
    }

    #[test]
    fn declaration_without_initializer_has_two_children() {
        let decl = Node::declaration(TypeCode::Int, "x", None);
        assert_eq!(decl.children.len(), 2);
        assert_eq!(decl.child(1).and_then(Node::ident), Some("x"));
    }
}

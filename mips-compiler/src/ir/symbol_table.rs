use super::ast::TypeCode;
use std::collections::HashMap;

/// Stack of lexical scopes, innermost last.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, TypeCode>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only the global scope.
    pub fn new() -> Self {
        Self { scopes: vec![HashMap::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declare in the innermost scope; shadowing an outer declaration is fine.
    /// On a clash in the same scope the existing type is returned.
    pub fn declare(&mut self, name: &str, ty: TypeCode) -> Result<(), TypeCode> {
        let scope = self
            .scopes
            .last_mut()
            .expect("symbol table always holds the global scope");
        if let Some(existing) = scope.get(name) {
            return Err(*existing);
        }
        scope.insert(name.to_string(), ty);
        Ok(())
    }

    /// Lookup from innermost to outermost scope.
    pub fn lookup(&self, name: &str) -> Option<TypeCode> {
        self.scopes.iter().rev().find_map(|s| s.get(name).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scope_shadows_outer() {
        let mut t = SymbolTable::new();
        t.declare("x", TypeCode::Int).unwrap();
        t.push_scope();
        t.declare("x", TypeCode::Float).unwrap();
        assert_eq!(t.lookup("x"), Some(TypeCode::Float));
        t.pop_scope();
        assert_eq!(t.lookup("x"), Some(TypeCode::Int));
    }

    #[test]
    fn redeclaration_in_same_scope_returns_existing_type() {
        let mut t = SymbolTable::new();
        t.declare("n", TypeCode::Bool).unwrap();
        assert_eq!(t.declare("n", TypeCode::Int), Err(TypeCode::Bool));
    }

    #[test]
    fn global_scope_survives_extra_pops() {
        let mut t = SymbolTable::new();
        t.declare("g", TypeCode::Int).unwrap();
        t.pop_scope();
        t.pop_scope();
        assert_eq!(t.depth(), 1);
        assert_eq!(t.lookup("g"), Some(TypeCode::Int));
    }
}

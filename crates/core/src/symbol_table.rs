use std::collections::HashMap;

use crate::types::Type;

#[derive(Debug, Clone)]
pub struct Symbol {
    pub ty: Type,
    pub is_function: bool,
}

/// Lexically scoped name table backed by a stack of maps. The bottom
/// scope is the global one and never pops.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn define(&mut self, name: impl Into<String>, symbol: Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), symbol);
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn is_defined_in_current_scope(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(ty: Type) -> Symbol {
        Symbol {
            ty,
            is_function: false,
        }
    }

    #[test]
    fn inner_scopes_shadow_outer_ones() {
        let mut table = SymbolTable::new();
        table.define("x", variable(Type::Int));
        table.enter_scope();
        table.define("x", variable(Type::Float));

        assert_eq!(table.resolve("x").map(|s| s.ty.clone()), Some(Type::Float));

        table.exit_scope();
        assert_eq!(table.resolve("x").map(|s| s.ty.clone()), Some(Type::Int));
    }

    #[test]
    fn definitions_vanish_when_their_scope_exits() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.define("local", variable(Type::Bool));
        assert!(table.resolve("local").is_some());

        table.exit_scope();
        assert!(table.resolve("local").is_none());
    }

    #[test]
    fn current_scope_check_ignores_outer_definitions() {
        let mut table = SymbolTable::new();
        table.define("x", variable(Type::Int));
        table.enter_scope();

        assert!(!table.is_defined_in_current_scope("x"));
        assert!(table.resolve("x").is_some());
    }

    #[test]
    fn the_global_scope_never_pops() {
        let mut table = SymbolTable::new();
        table.define("global", variable(Type::Int));
        table.exit_scope();
        table.exit_scope();

        assert!(table.resolve("global").is_some());
    }
}

//! Scoped symbol table.
//!
//! Scopes live in an arena and refer to their parent by [`ScopeId`], so a
//! scope can be stored in an AST node and reopened by a later pass without
//! holding a reference into the tree. The same table is used for semantic
//! types while parsing and for storage slots while lowering.

use std::collections::HashMap;

/// Index of a scope inside its [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol<T> {
    pub name: String,
    pub value: T,
}

#[derive(Debug, Clone)]
pub struct Scope<T> {
    parent: Option<ScopeId>,
    symbols: HashMap<String, Symbol<T>>,
}

impl<T> Scope<T> {
    fn new(parent: Option<ScopeId>) -> Self {
        Scope {
            parent,
            symbols: HashMap::new(),
        }
    }
}

/// Arena of scopes with parent-chained lookup.
///
/// The table never fails: lookups answer `false`/`None`, and inserting over
/// an existing name in the same scope is refused rather than overwriting.
/// Deciding whether a collision is an error is left to the caller.
#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    scopes: Vec<Scope<T>>,
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SymbolTable<T> {
    /// Creates a table holding only the root scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Allocates an empty scope nested inside `parent`.
    pub fn create_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope::new(Some(parent)));
        ScopeId(self.scopes.len() - 1)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0].parent
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Whether `name` is bound in `scope` or any of its ancestors.
    pub fn has(&self, scope: ScopeId, name: &str) -> bool {
        self.get(scope, name).is_some()
    }

    /// Whether `name` is bound in `scope` itself, ignoring ancestors.
    pub fn has_local(&self, scope: ScopeId, name: &str) -> bool {
        self.scopes[scope.0].symbols.contains_key(name)
    }

    /// Innermost binding of `name` visible from `scope`.
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Symbol<T>> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(symbol) = scope.symbols.get(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }

        None
    }

    /// Binds `name` in `scope`. Returns `false` and keeps the existing
    /// binding if the name is already bound in that same scope.
    pub fn add(&mut self, scope: ScopeId, name: &str, value: T) -> bool {
        let symbols = &mut self.scopes[scope.0].symbols;
        if symbols.contains_key(name) {
            return false;
        }

        symbols.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                value,
            },
        );
        true
    }

    /// Binds `name` in the outermost ancestor of `scope`.
    pub fn add_root(&mut self, scope: ScopeId, name: &str, value: T) -> bool {
        let mut outermost = scope;
        while let Some(parent) = self.parent(outermost) {
            outermost = parent;
        }

        self.add(outermost, name, value)
    }

    /// Names bound directly in `scope`, in no particular order.
    pub fn local_names(&self, scope: ScopeId) -> impl Iterator<Item = &str> {
        self.scopes[scope.0].symbols.keys().map(|name| name.as_str())
    }
}

use super::symbols::SymbolTable;

#[test]
fn test_lookup_walks_parent_chain() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let function = table.create_scope(root);
    let inner = table.create_scope(function);

    assert!(table.add(root, "answer", 42));

    assert!(table.has(inner, "answer"));
    assert_eq!(table.get(inner, "answer").unwrap().value, 42);
    assert!(!table.has_local(inner, "answer"));
    assert!(!table.has(root, "missing"));
    assert!(table.get(inner, "missing").is_none());
}

#[test]
fn test_same_scope_add_keeps_original() {
    let mut table = SymbolTable::new();
    let root = table.root();

    assert!(table.add(root, "x", "first"));
    assert!(!table.add(root, "x", "second"));
    assert_eq!(table.get(root, "x").unwrap().value, "first");
}

#[test]
fn test_shadowing_enclosing_scope() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let child = table.create_scope(root);

    table.add(root, "x", 1);
    assert!(table.add(child, "x", 2));

    assert_eq!(table.get(child, "x").unwrap().value, 2);
    assert_eq!(table.get(root, "x").unwrap().value, 1);
}

#[test]
fn test_add_root_from_nested_scope() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let function = table.create_scope(root);
    let nested = table.create_scope(function);

    assert!(table.add_root(nested, "f", "fn"));

    assert!(table.has_local(root, "f"));
    assert!(!table.has_local(nested, "f"));
    assert!(table.has(function, "f"));
    assert!(!table.add_root(function, "f", "again"));
}

#[test]
fn test_sibling_scopes_are_isolated() {
    let mut table = SymbolTable::new();
    let root = table.root();
    let first = table.create_scope(root);
    let second = table.create_scope(root);

    table.add(first, "a", 1);

    assert!(!table.has(second, "a"));
    assert_eq!(table.parent(first), Some(root));
    assert_eq!(table.parent(root), None);
    assert_eq!(table.len(), 3);
}

#[test]
fn test_local_names() {
    let mut table = SymbolTable::new();
    let root = table.root();
    table.add(root, "a", ());
    table.add(root, "b", ());

    let mut names: Vec<&str> = table.local_names(root).collect();
    names.sort();
    assert_eq!(names, vec!["a", "b"]);
}

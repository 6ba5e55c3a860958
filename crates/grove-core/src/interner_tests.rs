use crate::Interner;

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("expr");
    let b = interner.intern("expr");
    let c = interner.intern("number");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_roundtrip() {
    let mut interner = Interner::new();

    let sym = interner.intern("statement");
    assert_eq!(interner.resolve(sym), "statement");
}

#[test]
fn symbols_follow_declaration_order() {
    let mut interner = Interner::new();
    let program = interner.intern("program");
    let statement = interner.intern("statement");

    assert!(program < statement);
    assert_eq!(program.index(), 0);
    assert_eq!(statement.index(), 1);
}

#[test]
fn get_does_not_intern() {
    let mut interner = Interner::new();
    interner.intern("a");

    assert!(interner.get("a").is_some());
    assert!(interner.get("b").is_none());
    assert_eq!(interner.len(), 1);
}

#[test]
fn iter_in_order() {
    let mut interner = Interner::new();
    interner.intern("first");
    interner.intern("second");
    interner.intern("first");

    let names: Vec<_> = interner.iter().map(|(_, s)| s).collect();
    assert_eq!(names, vec!["first", "second"]);
}

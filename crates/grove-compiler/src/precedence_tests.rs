use std::cmp::Ordering;

use grove_core::PrecedenceEntry;

use crate::precedence::{PrecValue, PrecedenceOrder};

fn name(s: &str) -> PrecValue {
    PrecValue::Name(s.to_owned())
}

fn order() -> PrecedenceOrder {
    let entry = |s: &str| PrecedenceEntry::Name(s.to_owned());
    PrecedenceOrder::new(&[
        vec![entry("call"), entry("unary"), entry("sum")],
        vec![entry("member"), PrecedenceEntry::Symbol("call".to_owned())],
    ])
}

#[test]
fn integers_compare_numerically() {
    let order = PrecedenceOrder::default();
    assert_eq!(
        order.compare(&PrecValue::Int(2), &PrecValue::Int(1)),
        Some(Ordering::Greater)
    );
    assert_eq!(
        order.compare(&PrecValue::Int(-1), &PrecValue::None),
        Some(Ordering::Less)
    );
    assert_eq!(
        order.compare(&PrecValue::None, &PrecValue::None),
        Some(Ordering::Equal)
    );
}

#[test]
fn earlier_names_bind_tighter() {
    let order = order();
    assert_eq!(
        order.compare(&name("call"), &name("sum")),
        Some(Ordering::Greater)
    );
    assert_eq!(
        order.compare(&name("sum"), &name("unary")),
        Some(Ordering::Less)
    );
    assert_eq!(
        order.compare(&name("sum"), &name("sum")),
        Some(Ordering::Equal)
    );
}

#[test]
fn names_in_different_lists_are_unordered() {
    let order = order();
    assert_eq!(order.compare(&name("member"), &name("sum")), None);
    assert_eq!(
        order.compare(&name("member"), &name("call")),
        Some(Ordering::Greater)
    );
}

#[test]
fn names_and_integers_are_unordered() {
    let order = order();
    assert_eq!(order.compare(&name("sum"), &PrecValue::Int(1)), None);
    assert_eq!(order.compare(&PrecValue::None, &name("sum")), None);
    assert_eq!(order.compare(&name("undeclared"), &name("sum")), None);
}

use super::*;

#[test]
fn parse_minimal_grammar() {
    let json = r#"{
        "name": "test",
        "rules": {
            "source_file": { "type": "SYMBOL", "name": "expression" },
            "expression": { "type": "STRING", "value": "x" }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    assert_eq!(grammar.name, "test");
    assert_eq!(grammar.rules.len(), 2);
    assert_eq!(grammar.start_rule(), Some("source_file"));
}

#[test]
fn parse_seq_and_choice() {
    let json = r#"{
        "name": "test",
        "rules": {
            "root": {
                "type": "SEQ",
                "members": [
                    { "type": "STRING", "value": "a" },
                    { "type": "CHOICE", "members": [
                        { "type": "STRING", "value": "b" },
                        { "type": "BLANK" }
                    ]}
                ]
            }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    assert!(matches!(grammar.rules[0].1, Rule::Seq(_)));
}

#[test]
fn parse_precedence_forms() {
    let grammar = Grammar::from_json(include_str!("../../../../fixtures/calc.json")).unwrap();

    let Some(Rule::Choice(alternatives)) = grammar.rule("binary_expression") else {
        panic!("binary_expression should be a choice");
    };
    assert!(matches!(
        &alternatives[0],
        Rule::PrecLeft { value: Precedence::Name(name), .. } if name == "sum"
    ));
    assert!(matches!(&alternatives[2], Rule::PrecRight { .. }));
    assert_eq!(grammar.word.as_deref(), Some("identifier"));
    assert_eq!(
        grammar.precedences[0][0],
        PrecedenceEntry::Name("call".to_owned())
    );
}

#[test]
fn parse_integer_precedence() {
    let grammar = Grammar::from_json(include_str!("../../../../fixtures/arith.json")).unwrap();

    let Some(Rule::Choice(alternatives)) = grammar.rule("expr") else {
        panic!("expr should be a choice");
    };
    assert!(matches!(
        &alternatives[1],
        Rule::PrecLeft { value: Precedence::Integer(1), .. }
    ));
}

#[test]
fn preserves_rule_order() {
    let json = r#"{
        "name": "test",
        "rules": {
            "program": { "type": "SYMBOL", "name": "statement" },
            "statement": { "type": "SYMBOL", "name": "expression" },
            "expression": { "type": "STRING", "value": "x" }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();

    // Entry rule should be first (program), not alphabetically sorted
    assert_eq!(grammar.rules[0].0, "program");
    assert_eq!(grammar.rules[1].0, "statement");
    assert_eq!(grammar.rules[2].0, "expression");
}

#[test]
fn json_roundtrip_is_lossless() {
    let grammar = Grammar::from_json(include_str!("../../../../fixtures/calc.json")).unwrap();

    let json = grammar.to_json().unwrap();
    let reparsed = Grammar::from_json(&json).unwrap();

    assert_eq!(grammar, reparsed);
}

#[test]
fn to_json_uses_tree_sitter_tags() {
    let json = r#"{
        "name": "t",
        "rules": {
            "a": { "type": "IMMEDIATE_TOKEN", "content": { "type": "STRING", "value": "x" } }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    let out = grammar.to_json().unwrap();

    assert!(out.contains("\"IMMEDIATE_TOKEN\""));
    assert!(!out.contains("extras"));
}

#[test]
fn rejects_unknown_rule_type() {
    let json = r#"{ "name": "t", "rules": { "a": { "type": "WAT" } } }"#;

    let err = Grammar::from_json(json).unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
}

use grove_core::Grammar;
use indoc::indoc;

use crate::Error;
use crate::prepare::{Prepared, Sym, SynRule, TokenPattern, VariableKind, prepare};

fn prepared(json: &str) -> Prepared {
    prepare(&Grammar::from_json(json).unwrap()).unwrap()
}

fn prepare_err(json: &str) -> Error {
    prepare(&Grammar::from_json(json).unwrap()).unwrap_err()
}

fn token_names(p: &Prepared) -> Vec<&str> {
    p.tokens.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn arith_splits_tokens_from_rules() {
    let p = prepared(include_str!("../../../fixtures/arith.json"));

    assert_eq!(p.variables.len(), 1);
    assert_eq!(p.variables[0].name, "expr");
    assert_eq!(token_names(&p), ["number", "+"]);
    assert!(p.tokens[0].named);
    assert!(!p.tokens[1].named);
    assert_eq!(p.tokens[0].pattern, TokenPattern::Regex(r"(?:\d+)".to_owned()));
    assert_eq!(p.trivia, [TokenPattern::Regex(r"(?:\s)".to_owned())]);
    assert_eq!(p.word_token, None);
}

#[test]
fn calc_tokens_in_first_mention_order() {
    let p = prepared(include_str!("../../../fixtures/calc.json"));

    assert_eq!(
        token_names(&p),
        [
            ";", "let", "identifier", "=", "number", "+", "-", "*", "/", "^", "(", ")", ",",
            "comment"
        ]
    );
    assert_eq!(p.word_token, Some(2));
    assert!(p.tokens[13].extra);
    assert_eq!(p.extra_tokens().collect::<Vec<_>>(), [13]);
}

#[test]
fn calc_variables_and_repeats() {
    let p = prepared(include_str!("../../../fixtures/calc.json"));
    let names: Vec<&str> = p.variables.iter().map(|v| v.name.as_str()).collect();

    assert_eq!(
        names,
        [
            "program",
            "_statement",
            "expression_statement",
            "let_statement",
            "_expression",
            "binary_expression",
            "unary_expression",
            "parenthesized_expression",
            "call_expression",
            "arguments",
            "program_repeat1",
            "arguments_repeat1",
        ]
    );
    assert_eq!(p.variables[1].kind, VariableKind::Hidden);
    assert_eq!(p.variables[10].kind, VariableKind::Auxiliary);
    assert_eq!(p.variables[11].origin, p.variables[9].origin);
    assert!(p.variables[4].supertype);
    assert!(!p.variables[5].supertype);
}

#[test]
fn identical_repeats_share_one_rule() {
    let p = prepared(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "root": {
              "type": "SEQ",
              "members": [
                { "type": "REPEAT1", "content": { "type": "STRING", "value": "a" } },
                { "type": "STRING", "value": ";" },
                { "type": "REPEAT1", "content": { "type": "STRING", "value": "a" } }
              ]
            }
          }
        }
    "#});

    assert_eq!(p.variables.len(), 2);
    assert_eq!(p.variables[1].name, "root_repeat1");
    let SynRule::Seq(members) = &p.variables[0].rule else {
        panic!("expected a sequence");
    };
    assert_eq!(members[0], SynRule::Sym(Sym::NonTerminal(1)));
    assert_eq!(members[2], SynRule::Sym(Sym::NonTerminal(1)));
}

#[test]
fn inline_rules_expand_at_use_sites() {
    let p = prepared(indoc! {r#"
        {
          "name": "t",
          "inline": ["_pair"],
          "rules": {
            "root": { "type": "SYMBOL", "name": "_pair" },
            "_pair": {
              "type": "SEQ",
              "members": [
                { "type": "STRING", "value": "(" },
                { "type": "STRING", "value": ")" }
              ]
            }
          }
        }
    "#});

    assert_eq!(
        p.variables[0].rule,
        SynRule::Seq(vec![
            SynRule::Sym(Sym::Terminal(0)),
            SynRule::Sym(Sym::Terminal(1)),
        ])
    );
}

#[test]
fn inline_patterns_become_hidden_tokens() {
    let p = prepared(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "root": {
              "type": "SEQ",
              "members": [
                { "type": "PATTERN", "value": "[a-z]+" },
                { "type": "TOKEN", "content": { "type": "STRING", "value": "=" } },
                { "type": "IMMEDIATE_TOKEN", "content": { "type": "PATTERN", "value": "[0-9]+" } }
              ]
            }
          }
        }
    "#});

    assert_eq!(token_names(&p), ["root_token1", "=", "root_token2"]);
    assert!(!p.tokens[0].visible);
    assert!(p.tokens[1].visible && !p.tokens[1].named);
    assert!(p.tokens[2].immediate);
}

#[test]
fn token_precedence_comes_from_outer_prec() {
    let p = prepared(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "root": { "type": "SYMBOL", "name": "kw" },
            "kw": {
              "type": "PREC",
              "value": 3,
              "content": { "type": "TOKEN", "content": { "type": "STRING", "value": "if" } }
            }
          }
        }
    "#});

    assert_eq!(p.tokens[0].name, "kw");
    assert_eq!(p.tokens[0].precedence, 3);
    assert_eq!(p.tokens[0].pattern, TokenPattern::Literal("if".to_owned()));
}

#[test]
fn case_insensitive_flag() {
    let p = prepared(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "root": { "type": "PATTERN", "value": "select", "flags": "i" }
          }
        }
    "#});

    assert_eq!(p.tokens[0].pattern, TokenPattern::Regex("(?i:select)".to_owned()));
}

#[test]
fn externals_are_rejected() {
    let err = prepare_err(indoc! {r#"
        {
          "name": "t",
          "externals": [{ "type": "SYMBOL", "name": "heredoc" }],
          "rules": { "root": { "type": "STRING", "value": "x" } }
        }
    "#});

    assert!(matches!(err, Error::UnsupportedExternal(name) if name == "heredoc"));
}

#[test]
fn syntactic_extras_are_rejected() {
    let err = prepare_err(indoc! {r#"
        {
          "name": "t",
          "extras": [{ "type": "SYMBOL", "name": "block" }],
          "rules": {
            "root": { "type": "STRING", "value": "x" },
            "block": {
              "type": "SEQ",
              "members": [
                { "type": "STRING", "value": "{" },
                { "type": "STRING", "value": "}" }
              ]
            }
          }
        }
    "#});

    assert!(matches!(err, Error::UnsupportedExtra(name) if name == "block"));
}

#[test]
fn empty_string_is_rejected() {
    let err = prepare_err(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "root": {
              "type": "SEQ",
              "members": [
                { "type": "STRING", "value": "a" },
                { "type": "STRING", "value": "" }
              ]
            }
          }
        }
    "#});

    assert!(matches!(err, Error::InvalidToken { rule, .. } if rule == "root"));
}

#[test]
fn bad_regex_is_rejected() {
    let err = prepare_err(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "root": {
              "type": "SEQ",
              "members": [
                { "type": "STRING", "value": "a" },
                { "type": "PATTERN", "value": "[a-" }
              ]
            }
          }
        }
    "#});

    assert!(matches!(err, Error::InvalidPattern { rule, .. } if rule == "root"));
}

#[test]
fn word_must_be_a_token() {
    let err = prepare_err(indoc! {r#"
        {
          "name": "t",
          "word": "root",
          "rules": {
            "root": { "type": "SEQ", "members": [{ "type": "STRING", "value": "a" }] }
          }
        }
    "#});

    assert!(matches!(err, Error::InvalidToken { rule, .. } if rule == "root"));
}

#[test]
fn display_quotes_anonymous_tokens() {
    let p = prepared(include_str!("../../../fixtures/arith.json"));

    assert_eq!(p.display(Sym::Terminal(0)), "number");
    assert_eq!(p.display(Sym::Terminal(1)), "\"+\"");
    assert_eq!(p.display(Sym::NonTerminal(0)), "expr");
    assert_eq!(p.display(Sym::End), "end");
}

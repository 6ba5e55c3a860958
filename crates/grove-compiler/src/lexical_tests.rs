use grove_core::Grammar;
use grove_table::MatcherDef;
use indoc::indoc;

use crate::lexical::{Lexical, analyze};
use crate::prepare::{Prepared, Sym, prepare};

fn analyzed(json: &str) -> (Prepared, Lexical) {
    let prepared = prepare(&Grammar::from_json(json).unwrap()).unwrap();
    let lexical = analyze(&prepared).unwrap();
    (prepared, lexical)
}

fn token(p: &Prepared, name: &str) -> Sym {
    let id = p.tokens.iter().position(|t| t.name == name).unwrap();
    Sym::Terminal(id as u16)
}

#[test]
fn literals_keep_literal_matchers() {
    let (p, lex) = analyzed(include_str!("../../../fixtures/arith.json"));

    assert_eq!(lex.matchers.len(), p.tokens.len());
    assert!(matches!(lex.matchers[0], MatcherDef::Dfa(_)));
    assert_eq!(lex.matchers[1], MatcherDef::Literal(b"+".to_vec()));
    assert_eq!(lex.trivia.len(), 1);
}

#[test]
fn keywords_are_literals_the_word_token_matches() {
    let (p, lex) = analyzed(include_str!("../../../fixtures/calc.json"));

    let keyword = |name: &str| match token(&p, name) {
        Sym::Terminal(t) => lex.keywords[t as usize],
        _ => unreachable!(),
    };
    assert!(keyword("let"));
    assert!(!keyword("+"));
    assert!(!keyword("identifier"));
}

#[test]
fn same_string_overlap() {
    let (p, lex) = analyzed(include_str!("../../../fixtures/calc.json"));

    assert!(lex.conflicts(token(&p, "identifier"), token(&p, "let")));
    assert!(lex.conflicts(token(&p, "let"), token(&p, "identifier")));
    assert!(!lex.conflicts(token(&p, "number"), token(&p, "+")));
    assert!(!lex.conflicts(token(&p, "identifier"), token(&p, "number")));
}

#[test]
fn prefix_overlap() {
    let (p, lex) = analyzed(indoc! {r#"
        {
          "name": "t",
          "rules": {
            "root": { "type": "CHOICE", "members": [
              { "type": "STRING", "value": "=" },
              { "type": "STRING", "value": "==" },
              { "type": "STRING", "value": "!" }
            ]}
          }
        }
    "#});

    assert!(lex.conflicts(token(&p, "="), token(&p, "==")));
    assert!(lex.conflicts(token(&p, "=="), token(&p, "=")));
    assert!(!lex.conflicts(token(&p, "="), token(&p, "!")));
}

#[test]
fn a_token_never_conflicts_with_itself() {
    let (p, lex) = analyzed(include_str!("../../../fixtures/arith.json"));
    let number = token(&p, "number");

    assert!(!lex.conflicts(number, number));
    assert!(!lex.conflicts(number, Sym::End));
}

use grove_table::ParseTable;

use crate::Lexer;
use crate::test_tables::{arith, calc, symbol};

/// One `name start..end` line per token, EOF included.
fn render(table: &ParseTable, source: &str) -> String {
    Lexer::new(table, source.as_bytes())
        .tokens()
        .map(|t| format!("{} {}..{}", table.symbol_name(t.symbol), t.start, t.end))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn arith_tokens() {
    let table = arith();
    insta::assert_snapshot!(render(&table, "1 + 22"), @r"
    number 0..1
    + 2..3
    number 4..6
    end 6..6
    ");
}

#[test]
fn trivia_becomes_padding() {
    let table = arith();
    let lexer = Lexer::new(&table, b"  12 ");

    let token = lexer.lex(0, table.error_lex_mode());
    assert_eq!(token.padding_start, 0);
    assert_eq!(token.start, 2);
    assert_eq!(token.end, 4);
    assert_eq!(token.padding(), 2);
    assert_eq!(token.size(), 2);

    let eof = lexer.lex(token.end, table.error_lex_mode());
    assert!(eof.is_eof());
    assert_eq!((eof.padding_start, eof.start, eof.end), (4, 5, 5));
}

#[test]
fn unknown_character_is_one_error_token() {
    let table = arith();
    insta::assert_snapshot!(render(&table, "1$2"), @r"
    number 0..1
    ERROR 1..2
    number 2..3
    end 3..3
    ");
}

#[test]
fn error_token_spans_whole_character() {
    let table = arith();
    let lexer = Lexer::new(&table, "é1".as_bytes());

    let token = lexer.lex(0, table.error_lex_mode());
    assert_eq!(token.symbol, table.error_symbol());
    assert_eq!((token.start, token.end), (0, 2));
}

#[test]
fn lookahead_bytes_cover_examined_text() {
    let table = arith();
    let lexer = Lexer::new(&table, b"12+3");

    // `\d+` had to see the `+` to stop.
    let token = lexer.lex(0, table.error_lex_mode());
    assert_eq!((token.start, token.end), (0, 2));
    assert!(token.lookahead_bytes >= 1);
    assert!(token.dependency_end() > token.end);
}

#[test]
fn falls_back_to_every_token() {
    let table = arith();
    let number = symbol(&table, "number", true);
    let plus = symbol(&table, "+", false);

    // The start state only expects numbers.
    let mode = table.lex_mode_for(0);
    assert!(!table.lex_mode(mode).tokens.contains(&plus));

    let token = Lexer::new(&table, b"+").lex(0, mode);
    assert_eq!(token.symbol, plus);
    assert_eq!(token.lex_mode, mode);

    let token = Lexer::new(&table, b"7").lex(0, mode);
    assert_eq!(token.symbol, number);
}

#[test]
fn keyword_beats_identifier_of_same_length() {
    let table = calc();
    insta::assert_snapshot!(render(&table, "let letter"), @r"
    let 0..3
    identifier 4..10
    end 10..10
    ");
}

#[test]
fn named_extra_is_a_token() {
    let table = calc();
    insta::assert_snapshot!(render(&table, "# note\nx"), @r"
    comment 0..6
    identifier 7..8
    end 8..8
    ");
}

#[test]
fn tokens_from_resumes_mid_input() {
    let table = arith();
    let lexer = Lexer::new(&table, b"1+2");

    let symbols: Vec<_> = lexer
        .tokens_from(1, table.error_lex_mode())
        .map(|t| table.symbol_name(t.symbol).to_owned())
        .collect();
    assert_eq!(symbols, ["+", "number", "end"]);
}

#[test]
fn empty_input_is_only_eof() {
    let table = arith();
    let tokens: Vec<_> = Lexer::new(&table, b"").tokens().collect();

    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
    assert_eq!(tokens[0].start, 0);
}

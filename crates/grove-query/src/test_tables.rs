//! Compiled fixture grammars and parsed sources shared by the query tests.

use std::sync::{Arc, OnceLock};

use grove_compiler::{CompileConfig, compile};
use grove_core::Grammar;
use grove_runtime::{Parser, Tree};
use grove_table::ParseTable;

pub const ARITH: &str = include_str!("../../../fixtures/arith.json");
pub const CALC: &str = include_str!("../../../fixtures/calc.json");

fn compile_json(json: &str) -> Arc<ParseTable> {
    let grammar = Grammar::from_json(json).unwrap();
    Arc::new(compile(&grammar, &CompileConfig::default()).unwrap().table)
}

pub fn arith() -> Arc<ParseTable> {
    static TABLE: OnceLock<Arc<ParseTable>> = OnceLock::new();
    TABLE.get_or_init(|| compile_json(ARITH)).clone()
}

pub fn calc() -> Arc<ParseTable> {
    static TABLE: OnceLock<Arc<ParseTable>> = OnceLock::new();
    TABLE.get_or_init(|| compile_json(CALC)).clone()
}

pub fn parse_arith(source: &str) -> Tree {
    Parser::new(arith()).parse(source.as_bytes())
}

pub fn parse_calc(source: &str) -> Tree {
    Parser::new(calc()).parse(source.as_bytes())
}

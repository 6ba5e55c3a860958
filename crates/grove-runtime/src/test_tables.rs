//! Compiled fixture grammars shared by the runtime tests.

use std::sync::{Arc, OnceLock};

use grove_compiler::{CompileConfig, compile};
use grove_core::Grammar;
use grove_table::ParseTable;

use crate::Parser;

pub const ARITH: &str = include_str!("../../../fixtures/arith.json");
pub const CALC: &str = include_str!("../../../fixtures/calc.json");

pub fn compile_json(json: &str) -> Arc<ParseTable> {
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

pub fn arith_parser() -> Parser {
    Parser::new(arith())
}

pub fn calc_parser() -> Parser {
    Parser::new(calc())
}

pub fn symbol(table: &ParseTable, name: &str, named: bool) -> u16 {
    table.symbols_named(name, named).next().unwrap()
}

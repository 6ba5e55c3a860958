mod cli;
mod commands;
mod logging;

use cli::{DumpParams, GenerateParams, ParseParams, QueryParams, TokensParams, build_cli};

fn main() {
    logging::init();
    let matches = build_cli().get_matches();

    let result = match matches.subcommand() {
        Some(("generate", m)) => commands::generate::run(GenerateParams::from_matches(m).into()),
        Some(("parse", m)) => commands::parse::run(ParseParams::from_matches(m).into()),
        Some(("query", m)) => commands::query::run(QueryParams::from_matches(m).into()),
        Some(("tokens", m)) => commands::tokens::run(TokensParams::from_matches(m).into()),
        Some(("dump", m)) => commands::dump::run(DumpParams::from_matches(m).into()),
        _ => unreachable!("clap should have caught this"),
    };

    if let Err(err) = result {
        match err.rendered() {
            Some(rendered) => eprint!("{rendered}"),
            None => eprintln!("error: {err}"),
        }
        std::process::exit(1);
    }
}

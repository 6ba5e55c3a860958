mod args;
mod commands;
mod dispatch;


pub use args::SourceEdit;
pub use commands::build_cli;
pub use dispatch::{DumpParams, GenerateParams, ParseParams, QueryParams, TokensParams};

/// `--color` setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// `Auto` colors only when stdout and stderr are both terminals.
    pub fn should_colorize(self) -> bool {
        use std::io::{IsTerminal, stderr, stdout};

        match self {
            ColorChoice::Auto => stdout().is_terminal() && stderr().is_terminal(),
            choice => choice == ColorChoice::Always,
        }
    }
}

//! Terminal palette for trees, traces and table dumps.

/// Escape sequences for the few roles printers color: `blue` for named
/// nodes, `green` for anonymous tokens, `red` for errors and `dim` for
/// spans and labels. [`Colors::OFF`] holds empty strings, so printers
/// interpolate the fields unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub red: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        red: "\x1b[31m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        blue: "",
        green: "",
        red: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

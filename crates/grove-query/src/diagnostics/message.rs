use std::fmt;

use rowan::TextRange;

/// What went wrong. Declaration order is priority: an earlier kind hides a
/// later one reported over the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    UnclosedTree,

    ExpectedExpression,
    ExpectedKind,
    ExpectedCaptureName,
    ExpectedFieldName,

    EmptyTree,
    BareIdentifier,
    InvalidSeparator,
    UnsupportedPredicate,
    CaptureWithoutTarget,
    ErrorOutsideParens,
    NestingTooDeep,
    UnexpectedToken,

    UnknownKind,
    UnknownField,

    TopLevelQuantifier,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        if self == Self::TopLevelQuantifier {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// An unclosed node; errors inside it are usually fallout.
    pub fn is_structural_error(&self) -> bool {
        *self == Self::UnclosedTree
    }

    /// A missing piece the user most likely has to add.
    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedExpression
                | Self::ExpectedKind
                | Self::ExpectedCaptureName
                | Self::ExpectedFieldName
        )
    }

    pub fn title(self) -> &'static str {
        use DiagnosticKind::*;

        match self {
            UnclosedTree => "missing closing `)`",
            ExpectedExpression => "expected a pattern",
            ExpectedKind => "expected a node kind",
            ExpectedCaptureName => "expected capture name",
            ExpectedFieldName => "expected field name",
            EmptyTree => "empty `()` is not allowed",
            BareIdentifier => "bare identifier is not a pattern",
            InvalidSeparator => "unexpected separator",
            UnsupportedPredicate => "predicates are not supported",
            CaptureWithoutTarget => "capture has no target",
            ErrorOutsideParens => "`ERROR` requires parentheses",
            NestingTooDeep => "pattern is nested too deeply",
            UnexpectedToken => "unexpected token",
            UnknownKind => "unknown node kind",
            UnknownField => "unknown field",
            TopLevelQuantifier => "quantifier on a top-level pattern has no effect",
        }
    }

    /// The title extended with `detail`. Unknown names are quoted instead.
    pub fn detailed(self, detail: &str) -> String {
        match self {
            Self::UnknownKind => format!("`{detail}` is not a node kind of this grammar"),
            Self::UnknownField => format!("`{detail}` is not a field of this grammar"),
            Self::UnclosedTree => format!("{}; {detail}", self.title()),
            _ => format!("{}: {detail}", self.title()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Suggested edit over the diagnostic's range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fix {
    pub(crate) description: String,
    pub(crate) replacement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.title().to_owned(),
            fix: None,
            related: Vec::new(),
        }
    }

    pub(crate) fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

fn span(range: TextRange) -> String {
    format!("{}..{}", u32::from(range.start()), u32::from(range.end()))
}

/// `error at 3..5: message (fix: ...) (related: ... at 0..1)`
impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.severity(), span(self.range), self.message)?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        self.related.iter().try_for_each(|related| {
            write!(f, " (related: {} at {})", related.message, span(related.range))
        })
    }
}

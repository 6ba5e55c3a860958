//! Diagnostics for query source: collection, suppression and rendering.

mod message;
mod printer;

#[cfg(test)]
mod diagnostics_tests;

use rowan::TextRange;

pub use message::{DiagnosticKind, Severity};
pub use printer::DiagnosticsPrinter;

use message::{DiagnosticMessage, Fix, RelatedInfo};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a diagnostic of the given kind at `range`.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to
    /// add detail.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    /// Kinds in emission order.
    pub fn kinds(&self) -> impl Iterator<Item = DiagnosticKind> + '_ {
        self.messages.iter().map(|m| m.kind)
    }

    /// Diagnostics with cascading errors suppressed.
    ///
    /// 1. When a span strictly contains another, the higher-priority kind
    ///    suppresses the other.
    /// 2. At the same start position, root-cause errors suppress structural
    ///    ones; otherwise the higher-priority kind wins.
    pub fn filtered(&self) -> Diagnostics {
        let mut suppressed = vec![false; self.messages.len()];

        // O(n²) but n is small
        for (i, a) in self.messages.iter().enumerate() {
            for (j, b) in self.messages.iter().enumerate() {
                if i == j || suppressed[i] || suppressed[j] {
                    continue;
                }

                if span_strictly_contains(a.range, b.range) && a.kind.suppresses(&b.kind) {
                    suppressed[j] = true;
                    continue;
                }

                if a.range.start() == b.range.start() {
                    if a.kind.is_root_cause_error() && b.kind.is_structural_error() {
                        suppressed[j] = true;
                        continue;
                    }
                    if a.kind.is_structural_error() && b.kind.is_root_cause_error() {
                        continue;
                    }
                    if a.kind.suppresses(&b.kind) {
                        suppressed[j] = true;
                    }
                }
            }
        }

        let messages = self
            .messages
            .iter()
            .zip(suppressed)
            .filter(|(_, s)| !s)
            .map(|(m, _)| m.clone())
            .collect();
        Diagnostics { messages }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{message}")?;
        }
        Ok(())
    }
}

impl DiagnosticBuilder<'_> {
    /// Provide detail for this diagnostic, rendered with the kind's template.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.message.message = self.message.kind.detailed(&detail);
        self
    }

    pub fn related_to(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo {
            range,
            message: message.into(),
        });
        self
    }

    pub fn fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.message.fix = Some(Fix {
            replacement: replacement.into(),
            description: description.into(),
        });
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

fn span_strictly_contains(outer: TextRange, inner: TextRange) -> bool {
    outer.start() < inner.start() && inner.end() <= outer.end()
}

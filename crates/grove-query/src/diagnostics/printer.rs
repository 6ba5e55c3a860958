//! Rendering diagnostics for humans.

use std::fmt;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};

/// Renders diagnostics against the query text they were reported on.
///
/// Without a source each diagnostic is one `severity at range: message`
/// line; with one they become annotated snippets, fixes shown as help.
#[derive(Clone, Copy)]
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(self, source: &'s str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    /// File name shown in snippet headers.
    pub fn path(self, path: &'s str) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }

    pub fn colored(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    fn groups<'a>(&self, source: &'a str, diag: &'a DiagnosticMessage) -> Vec<Group<'a>>
    where
        's: 'a,
    {
        let primary = caret_range(diag.range, source.len());

        let mut snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(primary.clone()).label(&diag.message));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diag.related {
            let span = caret_range(related.range, source.len());
            snippet = snippet.annotation(AnnotationKind::Context.span(span).label(&related.message));
        }

        let level = match diag.severity() {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
        };
        let mut groups = vec![level.primary_title(&diag.message).element(snippet)];

        if let Some(fix) = &diag.fix {
            let patched = Snippet::source(source)
                .line_start(1)
                .patch(Patch::new(primary, &fix.replacement));
            groups.push(Level::HELP.secondary_title(&fix.description).element(patched));
        }
        groups
    }
}

impl fmt::Display for DiagnosticsPrinter<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(source) = self.source else {
            return write!(f, "{}", self.diagnostics);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", renderer.render(&self.groups(source, diag)))?;
        }
        Ok(())
    }
}

/// Byte range to underline. An empty range covers the next byte, if any.
fn caret_range(range: TextRange, len: usize) -> Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    if start < end {
        start..end
    } else {
        start..len.min(start + 1)
    }
}

impl Diagnostics {
    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

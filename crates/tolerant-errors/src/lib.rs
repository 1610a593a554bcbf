//! Diagnostics reported while lexing and parsing.
//!
//! Diagnostics never influence control flow: they are collected on the side
//! and correlated with the tree only through their source range.

use std::fmt::{self, Display};

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::{TextRange, TextSize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    fn level(self) -> Level {
        match self {
            Self::Warning => Level::Warning,
            Self::Error => Level::Error,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
    severity: Severity,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range, severity: Severity::Error }
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range, severity: Severity::Warning }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Offset the diagnostic is anchored at.
    pub fn offset(&self) -> TextSize {
        self.range.start()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = self.severity.level();
        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}: {}", self.severity, self.range, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_compact() {
        let diagnostic = Diagnostic::error("expected ';'", TextRange::empty(7.into()));
        assert_eq!(diagnostic.to_string(), "error@7..7: expected ';'");
        assert_eq!(diagnostic.offset(), TextSize::new(7));
        assert!(diagnostic.is_error());

        let warning =
            Diagnostic::warning("unterminated comment", TextRange::new(0.into(), 2.into()));
        assert_eq!(warning.to_string(), "warning@0..2: unterminated comment");
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn renders_source_snippet() {
        let text = "<?php\necho 1\n";
        let diagnostic = Diagnostic::error("expected ';'", TextRange::new(12.into(), 12.into()));
        let rendered =
            diagnostic.render(&Renderer::plain(), "test.php", text).to_string();
        assert!(rendered.contains("expected ';'"), "{rendered}");
        assert!(rendered.contains("test.php"), "{rendered}");
    }
}

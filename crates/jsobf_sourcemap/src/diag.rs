use crate::{SourceFile, SourceLocation, SourceSpan};

use std::{fmt::Display, io::Write};

// ---------------------------------------------------------------------------
// Support Functions
// ---------------------------------------------------------------------------

/// Reports a batch of diagnostics to a buffer.
///
/// The diagnostics must come from the given source file and should be
/// sorted in ascending order by their spans.
pub fn report_batch(
    file: &SourceFile,
    buffer: &mut impl Write,
    diagnostics: &[impl Into<Diagnostic> + Clone],
) -> std::io::Result<()> {
    diagnostics
        .iter()
        .map(|d| d.clone().into())
        .try_for_each(|d| d.report(file, buffer))
}

pub fn report_batch_to_stderr(
    file: &SourceFile,
    diagnostics: &[impl Into<Diagnostic> + Clone],
) -> std::io::Result<()> {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    report_batch(file, &mut handle, diagnostics)
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    title: String,
    message: String,
    span: SourceSpan,
    level: DiagnosticLevel,
}

impl Diagnostic {
    fn new(
        span: SourceSpan,
        title: impl Into<String>,
        message: impl Into<String>,
        level: DiagnosticLevel,
    ) -> Self {
        Self {
            span,
            level,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn note(span: SourceSpan, title: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic::new(span, title, message, DiagnosticLevel::Note)
    }

    pub fn error(span: SourceSpan, title: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic::new(span, title, message, DiagnosticLevel::Error)
    }

    pub fn warning(span: SourceSpan, title: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic::new(span, title, message, DiagnosticLevel::Warning)
    }

    pub fn report(&self, file: &SourceFile, buffer: &mut impl Write) -> std::io::Result<()> {
        let location = file.locate(self.span).unwrap_or_default();
        self.report_internal(file, location, buffer)
    }

    fn report_internal(
        &self,
        file: &SourceFile,
        location: SourceLocation,
        buffer: &mut impl Write,
    ) -> std::io::Result<()> {
        fn count_digits(n: u32) -> usize {
            (n.checked_ilog10().unwrap_or(0) + 1) as usize
        }

        let line_text = location.line_text.lines().next().unwrap_or("");
        let digits = count_digits(location.line);
        let carets = std::cmp::max(
            1,
            std::cmp::min(
                self.span.len(),
                line_text
                    .len()
                    .saturating_sub(location.column as usize - 1),
            ),
        );
        writeln!(
            buffer,
            "{}: {}\n{}--> {}:{}:{}\n{} |\n{} | {}\n{} | {}{} {}",
            self.level,
            self.title,
            " ".repeat(digits),
            file.path().display(),
            location.line,
            location.column,
            " ".repeat(digits),
            location.line,
            line_text,
            " ".repeat(digits),
            " ".repeat(location.column as usize - 1),
            "^".repeat(carets),
            self.message,
        )
    }
}

// ---------------------------------------------------------------------------
// DiagnosticLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiagnosticLevel {
    Note,
    Error,
    Warning,
}

impl Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Note => write!(f, "note"),
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_report() {
        let temp = NamedTempFile::new().unwrap();
        write(temp.path(), "const s = 'abc\nnext();\n").unwrap();

        let file = SourceFile::new(temp.path()).unwrap();
        let span = file.span(10..14).unwrap();
        let diag = Diagnostic::error(span, "unterminated string literal", "expected a closing quote");

        let mut out = Vec::new();
        diag.report(&file, &mut out).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.starts_with("error: unterminated string literal"));
        assert!(rendered.contains(":1:11"));
        assert!(rendered.contains("const s = 'abc"));
        assert!(rendered.contains("^^^^ expected a closing quote"));
    }
}

pub mod diag;

use std::{
    io,
    ops::Range,
    path::{Path, PathBuf},
};

// ---------------------------------------------------------------------------
// SourceLocation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation<'a> {
    pub line: u32,
    pub column: u32,
    pub line_text: &'a str,
}

impl<'a> Default for SourceLocation<'a> {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            line_text: "",
        }
    }
}

// ---------------------------------------------------------------------------
// SourceSpan
// ---------------------------------------------------------------------------

/// A half-open byte range into the source text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    start: u32,
    end: u32,
}

impl SourceSpan {
    fn new(range: impl Into<Range<u32>>) -> Option<Self> {
        let Range { start, end } = range.into();
        if start > end {
            None
        } else {
            Some(Self { start, end })
        }
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// ---------------------------------------------------------------------------
// SourceFile
// ---------------------------------------------------------------------------

/// One source file under transformation, with a precomputed line table
/// so diagnostics can be located without rescanning the text.
#[derive(Debug)]
pub struct SourceFile {
    data: String,
    path: PathBuf,
    lines: Vec<u32>,
}

impl SourceFile {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_parts(path.as_ref().to_path_buf(), data))
    }

    fn from_parts(path: PathBuf, data: String) -> Self {
        let estimated = data.len() / 80;
        let mut lines = Vec::with_capacity(estimated);

        lines.push(0);
        data.bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .for_each(|(i, _)| {
                lines.push(i as u32 + 1);
            });
        lines.shrink_to_fit();

        Self { data, path, lines }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn span(&self, range: impl Into<Range<u32>>) -> Option<SourceSpan> {
        SourceSpan::new(range).filter(|span| span.end as usize <= self.data.len())
    }

    /// Returns the source text covered by the span.
    pub fn slice(&self, span: SourceSpan) -> Option<&str> {
        self.data.get(span.start as usize..span.end as usize)
    }

    pub fn locate(&self, span: SourceSpan) -> Option<SourceLocation> {
        let index_first = self
            .lines
            .binary_search(&span.start)
            .unwrap_or_else(|x| x - 1);

        let start_offset = self.lines.get(index_first).copied()? as usize;
        let end_offset = self
            .lines
            .get(index_first + 1)
            .copied()
            .unwrap_or(self.data.len() as u32) as usize;

        let column = self
            .data
            .get(start_offset..span.start as usize)?
            .chars()
            .count() as u32
            + 1;

        let line_text = self.data.get(start_offset..end_offset)?;

        Some(SourceLocation {
            line: index_first as u32 + 1,
            column,
            line_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_source_span() {
        assert!(SourceSpan::new(10..5).is_none());
        let span = SourceSpan::new(5..10).unwrap();
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_source_file() {
        let temp = NamedTempFile::new().unwrap();
        write(temp.path(), "const a = 1;\nconsole.log(a);\n").unwrap();

        let source = SourceFile::new(temp.path()).unwrap();

        let span = source.span(0..5).unwrap();
        assert_eq!(source.slice(span), Some("const"));
        let location = source.locate(span).unwrap();
        assert_eq!(location.line, 1);
        assert_eq!(location.column, 1);
        assert_eq!(location.line_text, "const a = 1;\n");

        let span = source.span(13..20).unwrap();
        assert_eq!(source.slice(span), Some("console"));
        let location = source.locate(span).unwrap();
        assert_eq!(location.line, 2);
        assert_eq!(location.column, 1);
        assert_eq!(location.line_text, "console.log(a);\n");
    }

    #[test]
    fn test_span_out_of_bounds() {
        let temp = NamedTempFile::new().unwrap();
        write(temp.path(), "short\n").unwrap();

        let source = SourceFile::new(temp.path()).unwrap();
        assert!(source.span(0..30).is_none());
        assert!(source.span(2..1).is_none());
    }
}

use std::fs;
use std::io;
use std::path::Path;

/// Byte offset into a managed source buffer.
pub type SourceLocation = usize;

/// Half-open byte range `[begin, end)` into a managed source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRange {
    pub begin: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(begin: usize, end: usize) -> SourceRange {
        debug_assert!(begin <= end);
        SourceRange { begin, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// 1-based line and column numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

/// Owns one source file's path and contents, plus a per-line offset cache so
/// diagnostics can be resolved to line/column positions.
pub struct SourceManager {
    filepath: String,
    content: String,
    // one range per line; line N is lines[N - 1], its end excludes the '\n'
    lines: Vec<SourceRange>,
}

impl SourceManager {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<SourceManager> {
        let filepath = path.as_ref().display().to_string();
        let content = fs::read_to_string(path)?;
        Ok(SourceManager::from_source(filepath, content))
    }

    pub fn from_source(filepath: impl Into<String>, content: impl Into<String>) -> SourceManager {
        let content = content.into();
        let lines = build_line_cache(&content);
        SourceManager {
            filepath: filepath.into(),
            content,
            lines,
        }
    }

    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Slices the raw text covered by `range`.
    pub fn text(&self, range: SourceRange) -> &str {
        &self.content[range.begin..range.end]
    }

    /// Resolves a byte offset to 1-based line and column numbers. A location
    /// at the very end of the buffer resolves past the last column of the
    /// final line.
    pub fn linecol_from_location(&self, loc: SourceLocation) -> LineColumn {
        let line_index = self.line_index_of(loc);
        let line = self.lines[line_index];
        LineColumn {
            line: line_index + 1,
            column: loc - line.begin + 1,
        }
    }

    /// Range of the line containing `loc`, excluding the line terminator.
    pub fn line_range_from_location(&self, loc: SourceLocation) -> SourceRange {
        self.lines[self.line_index_of(loc)]
    }

    /// Range of 1-based line `line_no`, excluding the line terminator.
    pub fn line_range_at(&self, line_no: usize) -> SourceRange {
        self.lines[line_no - 1]
    }

    fn line_index_of(&self, loc: SourceLocation) -> usize {
        debug_assert!(loc <= self.content.len());
        // lines are sorted by begin offset; the '\n' itself counts as part of
        // the line it terminates
        self.lines.partition_point(|line| line.begin <= loc) - 1
    }
}

fn build_line_cache(content: &str) -> Vec<SourceRange> {
    let mut lines = Vec::new();
    let mut line_begin = 0;

    for (offset, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            lines.push(SourceRange::new(line_begin, offset));
            line_begin = offset + 1;
        }
    }

    // a trailing line without '\n' is a valid final line; an empty buffer
    // still has one (empty) line so every location resolves
    if line_begin < content.len() || lines.is_empty() {
        lines.push(SourceRange::new(line_begin, content.len()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linecol_basic() {
        let source = SourceManager::from_source("test.c", "int x;\nint y;\n");
        assert_eq!(source.linecol_from_location(0), LineColumn { line: 1, column: 1 });
        assert_eq!(source.linecol_from_location(4), LineColumn { line: 1, column: 5 });
        assert_eq!(source.linecol_from_location(7), LineColumn { line: 2, column: 1 });
        assert_eq!(source.linecol_from_location(11), LineColumn { line: 2, column: 5 });
    }

    #[test]
    fn linecol_at_newline_belongs_to_its_line() {
        let source = SourceManager::from_source("test.c", "ab\ncd");
        assert_eq!(source.linecol_from_location(2), LineColumn { line: 1, column: 3 });
        assert_eq!(source.linecol_from_location(3), LineColumn { line: 2, column: 1 });
    }

    #[test]
    fn final_line_without_newline() {
        let source = SourceManager::from_source("test.c", "ab\ncd");
        assert_eq!(source.line_range_at(2), SourceRange::new(3, 5));
        assert_eq!(source.linecol_from_location(5), LineColumn { line: 2, column: 3 });
    }

    #[test]
    fn empty_buffer_has_one_line() {
        let source = SourceManager::from_source("test.c", "");
        assert_eq!(source.linecol_from_location(0), LineColumn { line: 1, column: 1 });
    }

    #[test]
    fn text_slices_ranges() {
        let source = SourceManager::from_source("test.c", "int x;");
        assert_eq!(source.text(SourceRange::new(4, 5)), "x");
        assert_eq!(source.text(source.line_range_at(1)), "int x;");
    }
}

use std::fmt;
use std::io::{self, Write};

use crate::source::{LineColumn, SourceManager, SourceRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Note,
    Warning,
    Pedantic,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => f.write_str("note"),
            Severity::Warning => f.write_str("warning"),
            Severity::Pedantic => f.write_str("pedantic"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One resolved report. Positions are resolved at emission time so the
/// record stays valid after the source manager goes away.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub filepath: String,
    pub pos: LineColumn,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.filepath, self.pos.line, self.pos.column, self.severity, self.message
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub pedantic: bool,
    pub pedantic_errors: bool,
}

/// Where a token lives, for reporting purposes.
pub struct TokenDebug<'a> {
    pub source: &'a SourceManager,
    pub pos: LineColumn,
    pub range: SourceRange,
}

/// Collects diagnostics for one translation unit, in emission order.
pub struct ProgramContext {
    pub opts: Options,
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl ProgramContext {
    pub fn new(opts: Options) -> ProgramContext {
        ProgramContext {
            opts,
            diagnostics: Vec::new(),
            error_count: 0,
        }
    }

    pub fn note(&mut self, info: &TokenDebug<'_>, message: impl Into<String>) {
        self.report(Severity::Note, info, message.into());
    }

    pub fn warn(&mut self, info: &TokenDebug<'_>, message: impl Into<String>) {
        self.report(Severity::Warning, info, message.into());
    }

    pub fn error(&mut self, info: &TokenDebug<'_>, message: impl Into<String>) {
        self.report(Severity::Error, info, message.into());
    }

    pub fn pedantic(&mut self, info: &TokenDebug<'_>, message: impl Into<String>) {
        if !self.opts.pedantic {
            return;
        }
        let severity = if self.opts.pedantic_errors {
            Severity::Error
        } else {
            Severity::Pedantic
        };
        self.report(severity, info, message.into());
    }

    fn report(&mut self, severity: Severity, info: &TokenDebug<'_>, message: String) {
        if severity == Severity::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(Diagnostic {
            severity,
            filepath: info.source.filepath().to_string(),
            pos: info.pos,
            message,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn write_reports<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in &self.diagnostics {
            writeln!(out, "{}", diagnostic)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(source: &SourceManager) -> TokenDebug<'_> {
        TokenDebug {
            source,
            pos: source.linecol_from_location(0),
            range: SourceRange::new(0, 1),
        }
    }

    #[test]
    fn errors_are_counted() {
        let source = SourceManager::from_source("test.c", "int");
        let mut program = ProgramContext::new(Options::default());
        program.note(&info(&source), "just so you know");
        assert!(!program.has_errors());
        program.error(&info(&source), "that is wrong");
        assert_eq!(program.error_count(), 1);
        assert_eq!(program.diagnostics().len(), 2);
    }

    #[test]
    fn pedantic_is_gated_by_options() {
        let source = SourceManager::from_source("test.c", ";");
        let mut program = ProgramContext::new(Options::default());
        program.pedantic(&info(&source), "empty statement");
        assert!(program.diagnostics().is_empty());

        let mut program = ProgramContext::new(Options { pedantic: true, pedantic_errors: false });
        program.pedantic(&info(&source), "empty statement");
        assert_eq!(program.diagnostics().len(), 1);
        assert_eq!(program.diagnostics()[0].severity, Severity::Pedantic);
        assert!(!program.has_errors());
    }

    #[test]
    fn pedantic_errors_escalate() {
        let source = SourceManager::from_source("test.c", ";");
        let mut program = ProgramContext::new(Options { pedantic: true, pedantic_errors: true });
        program.pedantic(&info(&source), "empty statement");
        assert!(program.has_errors());
    }

    #[test]
    fn reports_render_with_positions() {
        let source = SourceManager::from_source("main.c", "int x\n");
        let mut program = ProgramContext::new(Options::default());
        let info = TokenDebug {
            source: &source,
            pos: source.linecol_from_location(4),
            range: SourceRange::new(4, 5),
        };
        program.error(&info, "expected ';'");
        let mut out = Vec::new();
        program.write_reports(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "main.c:1:5: error: expected ';'\n");
    }
}

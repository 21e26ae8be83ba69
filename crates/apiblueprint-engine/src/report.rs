//! Diagnostics collected during a parse.
//!
//! Parsing never fails with `Err`: every problem is recorded here with a code,
//! a message and the source map of the offending input, and the best-effort
//! AST is still returned.

use std::fmt;

use crate::source_map::SourceMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Parsing continued and produced a usable entity.
    Warning,
    /// The entity being parsed was dropped, or the parse aborted.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticCode {
    /// Input that could not be placed and was kept as dangling content.
    Ignoring = 1,
    /// A section that may appear once appeared again; the last one wins.
    Redefinition = 2,
    /// A section that is expected to have content has none.
    EmptyDefinition = 3,
    /// Content that is not laid out the way its section expects.
    Format = 4,
    /// Content that should be a pre-formatted code block is not.
    Indentation = 5,
    /// A signature that could be read more than one way.
    AmbiguousSection = 6,
    /// An action without any response.
    MissingResponse = 7,
    UriTemplate = 8,
    Parameter = 9,
    Mson = 10,
    /// Structure that is valid markdown but inconsistent API description.
    Logical = 11,
    NestingDepth = 12,
}

impl DiagnosticCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.as_u8())
    }
}

/// One warning or error, located by its source map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{severity} {code}: {message}")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub source_map: SourceMap,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, source_map: SourceMap) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            source_map,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>, source_map: SourceMap) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            source_map,
        }
    }
}

/// Append-only diagnostics sink for one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `diagnostic` in the list matching its severity.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => {
                log::debug!("{diagnostic}");
                self.warnings.push(diagnostic);
            }
            Severity::Error => {
                log::warn!("{diagnostic}");
                self.errors.push(diagnostic);
            }
        }
    }

    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>, source_map: SourceMap) {
        self.push(Diagnostic::warning(code, message, source_map));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    pub fn warning_codes(&self) -> Vec<DiagnosticCode> {
        self.warnings.iter().map(|w| w.code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_map::Span;

    #[test]
    fn push_routes_by_severity() {
        let mut report = Report::new();
        report.warn(DiagnosticCode::Format, "odd layout", SourceMap::new());
        report.push(Diagnostic::error(
            DiagnosticCode::Parameter,
            "bad parameter",
            SourceMap::from_spans([Span::new(1, 4)]),
        ));

        assert_eq!(report.warning_codes(), vec![DiagnosticCode::Format]);
        assert!(report.has_errors());
        assert_eq!(report.errors[0].source_map.spans(), &[Span::new(1, 4)]);
    }

    #[test]
    fn diagnostic_display_names_code() {
        let d = Diagnostic::warning(DiagnosticCode::MissingResponse, "no response", SourceMap::new());
        assert_eq!(d.to_string(), "warning MissingResponse(7): no response");
    }
}

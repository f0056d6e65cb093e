//! # Diagnostic System for Semantic Analysis
//!
//! This module provides the diagnostic infrastructure for reporting semantic errors,
//! warnings, and hints during semantic analysis.

use ariadne::ReportKind;
use chumsky::span::SimpleSpan;
use std::fmt;

/// A diagnostic message from semantic analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Source span where this diagnostic applies
    pub span: SimpleSpan<usize>,
    /// Optional related spans for additional context
    pub related_spans: Vec<(SimpleSpan<usize>, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
    Hint,
}

impl From<ReportKind<'static>> for DiagnosticSeverity {
    fn from(kind: ReportKind<'static>) -> Self {
        match kind {
            ReportKind::Error => Self::Error,
            ReportKind::Warning => Self::Warning,
            ReportKind::Advice => Self::Info,
            ReportKind::Custom(_, _) => Self::Info,
        }
    }
}

impl From<DiagnosticSeverity> for ReportKind<'static> {
    fn from(severity: DiagnosticSeverity) -> Self {
        match severity {
            DiagnosticSeverity::Error => ReportKind::Error,
            DiagnosticSeverity::Warning => ReportKind::Warning,
            DiagnosticSeverity::Info => ReportKind::Advice,
            DiagnosticSeverity::Hint => ReportKind::Advice,
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Hint => write!(f, "hint"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Parse-related errors (0-999), owned by the upstream parser
    SyntaxError,

    // Resolution errors (1000-1999)
    UnresolvedName,
    DuplicateDefinition,
    InvalidContext,
    CyclicReference,
    InvalidDeleteTarget,
    UnusedVariable,

    // Type-related errors (2000-2999)
    TypeMismatch,
}

impl From<DiagnosticCode> for u32 {
    fn from(code: DiagnosticCode) -> Self {
        match code {
            DiagnosticCode::SyntaxError => 2,
            DiagnosticCode::UnresolvedName => 1001,
            DiagnosticCode::DuplicateDefinition => 1002,
            DiagnosticCode::InvalidContext => 1003,
            DiagnosticCode::CyclicReference => 1004,
            DiagnosticCode::InvalidDeleteTarget => 1005,
            DiagnosticCode::UnusedVariable => 1006,
            DiagnosticCode::TypeMismatch => 2001,
        }
    }
}

impl Diagnostic {
    /// Create an error diagnostic
    /// Make const once spanned is given as input
    pub fn error(code: DiagnosticCode, message: String) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            code,
            message,
            span: SimpleSpan::from(0..0),
            related_spans: Vec::new(),
        }
    }

    /// Create a warning diagnostic
    pub fn warning(code: DiagnosticCode, message: String) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            code,
            message,
            span: SimpleSpan::from(0..0),
            related_spans: Vec::new(),
        }
    }

    /// Create an info diagnostic
    pub fn info(code: DiagnosticCode, message: String) -> Self {
        Self {
            severity: DiagnosticSeverity::Info,
            code,
            message,
            span: SimpleSpan::from(0..0),
            related_spans: Vec::new(),
        }
    }

    /// Add location information to this diagnostic
    pub const fn with_location(mut self, span: SimpleSpan<usize>) -> Self {
        self.span = span;
        self
    }

    /// Add a related span with context message
    pub fn with_related_span(mut self, span: SimpleSpan<usize>, message: String) -> Self {
        self.related_spans.push((span, message));
        self
    }

    /// Convenience method for unresolved name errors
    pub fn unresolved_name(name: &str, span: SimpleSpan<usize>) -> Self {
        Self::error(
            DiagnosticCode::UnresolvedName,
            format!("Unresolved name '{name}'"),
        )
        .with_location(span)
    }

    /// Convenience method for duplicate definition errors
    pub fn duplicate_definition(name: &str, span: SimpleSpan<usize>) -> Self {
        Self::error(
            DiagnosticCode::DuplicateDefinition,
            format!("Duplicate definition of '{name}'"),
        )
        .with_location(span)
    }

    /// Convenience method for pseudo-symbols used outside their construct
    pub fn invalid_context(message: String, span: SimpleSpan<usize>) -> Self {
        Self::error(DiagnosticCode::InvalidContext, message).with_location(span)
    }

    /// Convenience method for graph operators naming a non-edge architype
    pub fn type_mismatch(message: String, span: SimpleSpan<usize>) -> Self {
        Self::error(DiagnosticCode::TypeMismatch, message).with_location(span)
    }

    /// Convenience method for cyclic architype reference chains
    pub fn cyclic_reference(name: &str, span: SimpleSpan<usize>) -> Self {
        Self::error(
            DiagnosticCode::CyclicReference,
            format!("Cyclic architype reference involving '{name}'"),
        )
        .with_location(span)
    }

    /// Convenience method for delete statements targeting a literal
    pub fn invalid_delete_target(found: &str, span: SimpleSpan<usize>) -> Self {
        Self::error(
            DiagnosticCode::InvalidDeleteTarget,
            format!("Delete target must be a name or attribute chain, found {found}"),
        )
        .with_location(span)
    }

    /// Convenience method for unused variable warnings
    pub fn unused_variable(name: &str, span: SimpleSpan<usize>) -> Self {
        Self::warning(
            DiagnosticCode::UnusedVariable,
            format!("Unused variable '{name}'"),
        )
        .with_location(span)
    }

    /// Convenience method for syntax errors
    pub fn syntax_error(message: String, span: SimpleSpan<usize>) -> Self {
        Self::error(DiagnosticCode::SyntaxError, message).with_location(span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        write!(f, " (at {}:{})", self.span.start, self.span.end)?;
        for (span, message) in &self.related_spans {
            write!(f, "\n  note: {} (at {}:{})", message, span.start, span.end)?;
        }
        Ok(())
    }
}

/// Collection of diagnostics from semantic analysis
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic to the collection
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add multiple diagnostics
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Get all diagnostics in emission order
    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get only error diagnostics
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .collect()
    }

    /// Get only warning diagnostics
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == DiagnosticSeverity::Warning)
            .collect()
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Get the total number of diagnostics
    pub const fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if the collection is empty
    pub const fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by severity (errors first) and then by message
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.severity.cmp(&b.severity).then(a.message.cmp(&b.message)));
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let errors = self.errors().len();
        let warnings = self.warnings().len();
        let total = self.diagnostics.len();

        if total == 0 {
            "No issues found".to_string()
        } else {
            format!("{errors} errors, {warnings} warnings")
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
}

impl From<Vec<Diagnostic>> for DiagnosticCollection {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

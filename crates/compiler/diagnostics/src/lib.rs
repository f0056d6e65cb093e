//! Shared diagnostic types for the Trellis compiler.
//!
//! Every stage reports user-facing problems as [`Diagnostic`] values and
//! collects them in a [`DiagnosticCollection`]; rendering to terminal
//! reports lives in [`reporting`].

mod diagnostics;
pub mod reporting;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection, DiagnosticSeverity};
pub use reporting::build_diagnostic_message;

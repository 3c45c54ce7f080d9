//! sqlshift Core
//!
//! Shared configuration, diagnostics and report types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use report::{Report, ReportSummary, ReportVersion, fingerprint};
pub use config::{Config, ConfigError, Dialect, DdlOptions, IdentifierFixup};

//! Common types and utilities for the companion checker.
//!
//! This crate provides foundational types used across all companion crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, code and message tables)
//! - Source spans (`Span`, `SourceLocation`)
//! - Analysis limits and thresholds

// Diagnostic types and the fixed message table
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{SourceLocation, Span};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
#[cfg(test)]
#[path = "../tests/span_tests.rs"]
mod span_tests;

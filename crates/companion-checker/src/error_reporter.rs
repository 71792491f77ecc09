//! Diagnostic construction.

use crate::authorization::Decision;
use crate::diagnostics::{Diagnostic, DiagnosticMessage};
use companion_common::{SourceLocation, Span};

/// Diagnostic for a rejected decision; `None` for an accepted one.
///
/// Both rejection reasons surface the same diagnostic.
#[must_use]
pub fn report_decision(file: &str, decision: &Decision) -> Option<Diagnostic> {
    match decision {
        Decision::Accept(_) => None,
        Decision::Reject { location, .. } => Some(restricted_member_reference(file, *location)),
    }
}

/// Error for a reference to a restricted member from outside its companions.
#[must_use]
pub fn restricted_member_reference(file: &str, location: Span) -> Diagnostic {
    Diagnostic::from_message(
        file.to_string(),
        location.start,
        location.length,
        &DiagnosticMessage::MEMBER_IS_RESTRICTED_TO_COMPANION_TYPES,
        &[],
    )
}

/// Warning for a name-valued companion that names no type in the program.
#[must_use]
pub fn unresolved_companion_name(location: Option<&SourceLocation>, name: &str) -> Diagnostic {
    let (file, span) = location
        .map(|loc| (loc.file.clone(), loc.span))
        .unwrap_or_default();
    Diagnostic::from_message(
        file,
        span.start,
        span.length,
        &DiagnosticMessage::COMPANION_NAME_DOES_NOT_MATCH_ANY_TYPE,
        &[name],
    )
}

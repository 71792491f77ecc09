//! Companion-type access checking.
//!
//! A member may be restricted so that only an allow-list of *companion* types
//! can reference it. This crate decides, for each reference site the host
//! reports, whether the reference is authorized, and produces one diagnostic
//! per unauthorized site.
//!
//! This crate is organized into several modules:
//! - `model` - Host semantic model (`SemanticModel`, declarations, ids)
//! - `annotation` - Companion annotations and their categories
//! - `syntax` - Expression arena surrounding reference sites
//! - `reference` - Reference sites and compilation units
//! - `program` - In-memory snapshot implementing `SemanticModel`
//! - `companions` - Companion set aggregation
//! - `classifier` - Capability classification of reference sites
//! - `authorization` - The accept/reject decision
//! - `error_reporter` - Diagnostic construction
//! - `checker` - The (parallel) pass over all reference sites
//! - `unresolved_names` - Lint for companion names that match no type

pub mod annotation;
pub mod authorization;
pub mod capability;
pub mod checker;
pub mod classifier;
pub mod companions;
pub mod context;
pub mod error_reporter;
pub mod model;
pub mod program;
pub mod reference;
pub mod syntax;
pub mod unresolved_names;

pub use annotation::{AnnotationCategory, AnnotationList, CompanionAnnotation, RawAnnotation};
pub use authorization::{AcceptReason, Decision, RejectReason, authorize, authorize_member};
pub use capability::{Capability, CapabilityMask, PropertyAccessMode, ReferenceKind};
pub use checker::{CheckOutput, CompanionChecker, sort_diagnostics};
pub use classifier::{classify, property_access_mode};
pub use companions::{CompanionSet, resolve_companions};
pub use context::{CancellationToken, CheckerOptions};
pub use model::{
    MemberDecl, MemberId, MemberKind, SemanticModel, TypeDecl, TypeId, TypeKind,
    render_qualified_name,
};
pub use program::{Program, ProgramBuilder, ProgramData, ProgramError};
pub use reference::{CompilationUnit, ReferenceSite};
pub use syntax::{NodeArena, NodeIndex, NodeKind};

pub mod diagnostics {
    pub use companion_common::diagnostics::{
        Diagnostic, DiagnosticCategory, DiagnosticMessage, diagnostic_codes, diagnostic_messages,
        format_message,
    };
}

/// Check every compilation unit of `program`.
pub fn check_program(program: &Program, options: CheckerOptions) -> CheckOutput {
    CompanionChecker::new(program, options).check_units(program.units())
}

// Shared fixtures for the unit tests below
#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
mod test_fixtures;

#[cfg(test)]
#[path = "../tests/annotation_tests.rs"]
mod annotation_tests;
#[cfg(test)]
#[path = "../tests/authorization_tests.rs"]
mod authorization_tests;
#[cfg(test)]
#[path = "../tests/checker_tests.rs"]
mod checker_tests;
#[cfg(test)]
#[path = "../tests/classifier_tests.rs"]
mod classifier_tests;
#[cfg(test)]
#[path = "../tests/companions_tests.rs"]
mod companions_tests;
#[cfg(test)]
#[path = "../tests/model_tests.rs"]
mod model_tests;
#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod program_tests;
#[cfg(test)]
#[path = "../tests/scenario_tests.rs"]
mod scenario_tests;
#[cfg(test)]
#[path = "../tests/syntax_tests.rs"]
mod syntax_tests;
#[cfg(test)]
#[path = "../tests/unresolved_names_tests.rs"]
mod unresolved_names_tests;

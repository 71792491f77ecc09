//! Lint for name-valued companions that name no declared type.
//!
//! Such an annotation never matches any caller, which usually means a typo
//! in the name. The authorization decision is unaffected; this only reports.

use crate::annotation::{AnnotationCategory, CompanionAnnotation};
use crate::error_reporter::unresolved_companion_name;
use crate::model::{MemberId, SemanticModel, TypeId};
use companion_common::{Diagnostic, SourceLocation};
use tracing::debug;

/// One warning per name annotation (per slot, per declaration) that matches no type.
pub fn check_unresolved_companion_names<M: SemanticModel + ?Sized>(model: &M) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for index in 0..model.type_count() {
        let Some(decl) = model.type_decl(TypeId(index as u32)) else {
            continue;
        };
        report_unresolved(
            model,
            decl.companions.iter(),
            decl.location.as_ref(),
            &mut diagnostics,
        );
    }

    for index in 0..model.member_count() {
        let Some(decl) = model.member_decl(MemberId(index as u32)) else {
            continue;
        };
        for category in AnnotationCategory::ALL {
            report_unresolved(
                model,
                decl.annotations(category).iter(),
                decl.location.as_ref(),
                &mut diagnostics,
            );
        }
    }

    debug!(count = diagnostics.len(), "unresolved companion names");
    diagnostics
}

fn report_unresolved<'a, M: SemanticModel + ?Sized>(
    model: &M,
    annotations: impl Iterator<Item = &'a CompanionAnnotation>,
    location: Option<&SourceLocation>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for annotation in annotations {
        if let CompanionAnnotation::QualifiedName(name) = annotation
            && annotation.is_valid()
            && model.find_type_by_qualified_name(name).is_none()
        {
            diagnostics.push(unresolved_companion_name(location, name));
        }
    }
}

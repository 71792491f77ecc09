//! Companion set aggregation.
//!
//! For a member and the capability a reference site exercises, collect every
//! annotation that can authorize the reference: the member's own slots that
//! apply to the capability, then the declaring type's annotations (which
//! apply to every capability).

use crate::annotation::{AnnotationCategory, CompanionAnnotation};
use crate::capability::Capability;
use crate::model::{MemberDecl, SemanticModel};
use companion_common::limits::COMPANION_SET_INLINE;
use smallvec::SmallVec;
use tracing::debug;

/// De-duplicated annotations applicable to one reference site.
///
/// An empty set means the member is unrestricted for that capability.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompanionSet<'a> {
    entries: SmallVec<[&'a CompanionAnnotation; COMPANION_SET_INLINE]>,
}

impl<'a> CompanionSet<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `annotation` unless it is invalid or already present.
    pub fn insert(&mut self, annotation: &'a CompanionAnnotation) -> bool {
        if !annotation.is_valid() || self.entries.contains(&annotation) {
            return false;
        }
        self.entries.push(annotation);
        true
    }

    pub fn extend<I: IntoIterator<Item = &'a CompanionAnnotation>>(&mut self, annotations: I) {
        for annotation in annotations {
            self.insert(annotation);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CompanionAnnotation> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, annotation: &CompanionAnnotation) -> bool {
        self.entries.iter().any(|entry| *entry == annotation)
    }
}

/// Resolve the companion set of `member` for `capability`.
pub fn resolve_companions<'a, M: SemanticModel + ?Sized>(
    model: &'a M,
    member: &'a MemberDecl,
    capability: Capability,
) -> CompanionSet<'a> {
    let mut set = CompanionSet::new();

    for category in AnnotationCategory::ALL {
        if category.applies_to(capability) {
            set.extend(member.annotations(category).iter());
        }
    }

    match model.type_decl(member.declaring_type) {
        Some(declaring_type) => set.extend(declaring_type.companions.iter()),
        None => debug!(
            member = %member.name,
            declaring_type = member.declaring_type.0,
            "declaring type missing from model; using member annotations only"
        ),
    }

    set
}

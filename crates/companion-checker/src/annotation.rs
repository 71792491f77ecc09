//! Companion annotation model.
//!
//! A companion annotation is one allow-list entry attached to a type or a
//! member. It names the permitted caller either by declaration identity or by
//! fully-qualified name; the name form is only compared against a caller's
//! rendered name at match time.
//!
//! The host schema (`RawAnnotation`) may carry malformed entries. Those are
//! dropped when an [`AnnotationList`] is built, so they never grant access.

use crate::capability::{Capability, CapabilityMask};
use crate::model::TypeId;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::debug;

// =============================================================================
// CompanionAnnotation
// =============================================================================

/// One companion entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompanionAnnotation {
    /// Direct reference to a type declaration, resolved when the annotation was written.
    Type(TypeId),
    /// Fully-qualified name (`Outer.Ns.Type.Nested`), matched case-sensitively.
    QualifiedName(String),
}

impl CompanionAnnotation {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::QualifiedName(name.into())
    }

    /// An annotation is valid when it has a type reference or a non-blank name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Type(id) => !id.is_none(),
            Self::QualifiedName(name) => !name.trim().is_empty(),
        }
    }

    /// Build an annotation from the host schema.
    ///
    /// Returns `None` when the entry has neither shape, a blank name, or both
    /// shapes at once.
    #[must_use]
    pub fn from_raw(raw: &RawAnnotation) -> Option<Self> {
        let annotation = match (raw.type_ref, raw.name.as_deref()) {
            (Some(id), None) => Self::Type(id),
            (None, Some(name)) => Self::QualifiedName(name.to_string()),
            _ => return None,
        };
        annotation.is_valid().then_some(annotation)
    }

    fn to_raw(&self) -> RawAnnotation {
        match self {
            Self::Type(id) => RawAnnotation {
                type_ref: Some(*id),
                name: None,
            },
            Self::QualifiedName(name) => RawAnnotation {
                type_ref: None,
                name: Some(name.clone()),
            },
        }
    }
}

/// Annotation entry as it appears in host metadata.
///
/// ```json
/// { "type": 3 }
/// { "name": "App.Services.Scheduler" }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnnotation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// =============================================================================
// AnnotationCategory
// =============================================================================

/// Which capabilities an annotation slot authorizes.
///
/// | Category | Authorizes |
/// |----------|------------|
/// | General  | every capability |
/// | Getter   | `Get`, `GetAndSet` |
/// | Setter   | `Set`, `GetAndSet` |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationCategory {
    General,
    Getter,
    Setter,
}

impl AnnotationCategory {
    pub const ALL: [Self; 3] = [Self::General, Self::Getter, Self::Setter];

    #[must_use]
    pub const fn mask(self) -> CapabilityMask {
        match self {
            Self::General => CapabilityMask::all(),
            Self::Getter => CapabilityMask::READ,
            Self::Setter => CapabilityMask::WRITE,
        }
    }

    /// Whether annotations in this slot take part for `capability`.
    #[must_use]
    pub fn applies_to(self, capability: Capability) -> bool {
        self.mask().intersects(capability.mask())
    }
}

// =============================================================================
// AnnotationList
// =============================================================================

/// Immutable list of valid annotations attached to one declaration slot.
///
/// Deserializes from a list of [`RawAnnotation`]s, dropping malformed ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RawAnnotation>", into = "Vec<RawAnnotation>")]
pub struct AnnotationList(Box<[CompanionAnnotation]>);

impl AnnotationList {
    #[must_use]
    pub fn new(annotations: Vec<CompanionAnnotation>) -> Self {
        Self(annotations.into_boxed_slice())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[CompanionAnnotation] {
        &self.0
    }
}

impl Deref for AnnotationList {
    type Target = [CompanionAnnotation];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<CompanionAnnotation>> for AnnotationList {
    fn from(annotations: Vec<CompanionAnnotation>) -> Self {
        Self::new(annotations)
    }
}

impl FromIterator<CompanionAnnotation> for AnnotationList {
    fn from_iter<I: IntoIterator<Item = CompanionAnnotation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<RawAnnotation>> for AnnotationList {
    fn from(raw: Vec<RawAnnotation>) -> Self {
        raw.iter()
            .filter_map(|entry| {
                let annotation = CompanionAnnotation::from_raw(entry);
                if annotation.is_none() {
                    debug!(?entry, "discarding malformed companion annotation");
                }
                annotation
            })
            .collect()
    }
}

impl From<AnnotationList> for Vec<RawAnnotation> {
    fn from(list: AnnotationList) -> Self {
        list.iter().map(CompanionAnnotation::to_raw).collect()
    }
}

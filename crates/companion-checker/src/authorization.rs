//! Authorization decision for one reference site.
//!
//! ## Decision order
//!
//! | Step | Condition | Outcome |
//! |------|-----------|---------|
//! | 1 | companion set empty | accept |
//! | 2 | reference outside any type | reject |
//! | 3 | reference from the declaring type | accept |
//! | 4 | some companion matches the enclosing type | accept |
//! | 5 | otherwise | reject |
//!
//! Matching is existential, so the order in which companions are tried never
//! changes the outcome. Nested types are distinct types: neither a type nested
//! in a companion nor one nested in the declaring type is authorized by that.

use crate::annotation::CompanionAnnotation;
use crate::capability::Capability;
use crate::classifier::classify;
use crate::companions::resolve_companions;
use crate::model::{MemberDecl, SemanticModel, TypeId};
use crate::reference::ReferenceSite;
use crate::syntax::NodeArena;
use companion_common::Span;
use std::borrow::Cow;
use std::cell::OnceCell;
use tracing::{debug, trace};

/// Why a reference was accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcceptReason {
    /// No companion applies to the exercised capability.
    Unrestricted,
    /// The reference comes from the member's own declaring type.
    SelfReference,
    /// The enclosing type is a companion.
    Companion,
    /// The model does not know the target member.
    UnknownMember,
    /// The capability of the site could not be determined.
    UnresolvedCapability,
}

/// Why a reference was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Restricted member referenced outside of any type.
    NoEnclosingType,
    /// The enclosing type matches none of the companions.
    NotACompanion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Accept(AcceptReason),
    Reject { location: Span, reason: RejectReason },
}

impl Decision {
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }

    #[must_use]
    pub const fn is_reject(&self) -> bool {
        matches!(self, Self::Reject { .. })
    }
}

/// Decide whether `site` may reference its target member.
pub fn authorize<M: SemanticModel + ?Sized>(
    model: &M,
    arena: &NodeArena,
    site: &ReferenceSite,
) -> Decision {
    let Some(member) = model.member_decl(site.member) else {
        debug!(member = site.member.0, "reference to unknown member; not restricted");
        return Decision::Accept(AcceptReason::UnknownMember);
    };
    let Some(capability) = classify(arena, site) else {
        debug!(
            node = site.node.0,
            member = %member.name,
            "reference node missing from arena; not restricted"
        );
        return Decision::Accept(AcceptReason::UnresolvedCapability);
    };
    authorize_member(model, member, capability, site.enclosing_type, site.location)
}

/// Decide whether code in `enclosing_type` may exercise `capability` on `member`.
pub fn authorize_member<M: SemanticModel + ?Sized>(
    model: &M,
    member: &MemberDecl,
    capability: Capability,
    enclosing_type: Option<TypeId>,
    location: Span,
) -> Decision {
    let companions = resolve_companions(model, member, capability);
    if companions.is_empty() {
        return Decision::Accept(AcceptReason::Unrestricted);
    }

    let Some(caller) = enclosing_type else {
        return Decision::Reject {
            location,
            reason: RejectReason::NoEnclosingType,
        };
    };

    if caller == member.declaring_type {
        return Decision::Accept(AcceptReason::SelfReference);
    }

    let caller_name = OnceCell::new();
    let matched = companions
        .iter()
        .any(|annotation| matches_caller(model, annotation, caller, &caller_name));

    trace!(
        member = %member.name,
        %capability,
        caller = caller.0,
        companions = companions.len(),
        matched,
        "companion check"
    );

    if matched {
        Decision::Accept(AcceptReason::Companion)
    } else {
        Decision::Reject {
            location,
            reason: RejectReason::NotACompanion,
        }
    }
}

/// Whether `annotation` names `caller`. The caller's qualified name is
/// rendered at most once per decision, and only if a name annotation needs it.
fn matches_caller<'m, M: SemanticModel + ?Sized>(
    model: &'m M,
    annotation: &CompanionAnnotation,
    caller: TypeId,
    caller_name: &OnceCell<Option<Cow<'m, str>>>,
) -> bool {
    match annotation {
        CompanionAnnotation::Type(id) => *id == caller,
        CompanionAnnotation::QualifiedName(name) => caller_name
            .get_or_init(|| model.qualified_name(caller))
            .as_deref()
            == Some(name.as_str()),
    }
}

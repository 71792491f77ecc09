//! Reference-site classification.
//!
//! Calls, method references and constructions map straight to a capability.
//! Property references need the surrounding syntax: the same `obj.Prop` is a
//! read in `x = obj.Prop`, a write in `obj.Prop = x`, and both in `obj.Prop++`.

use crate::capability::{Capability, PropertyAccessMode, ReferenceKind};
use crate::reference::ReferenceSite;
use crate::syntax::{ArgumentPassing, NodeArena, NodeIndex, NodeKind};
use companion_common::limits::MAX_PARENT_WALK_DEPTH;
use tracing::trace;

/// Capability exercised by `site`.
///
/// Returns `None` when a property reference points at a node the arena does
/// not contain; the caller treats that site as unrestricted.
#[must_use]
pub fn classify(arena: &NodeArena, site: &ReferenceSite) -> Option<Capability> {
    match site.kind {
        ReferenceKind::Invocation => Some(Capability::Invoke),
        ReferenceKind::MethodReference => Some(Capability::Reference),
        ReferenceKind::ObjectCreation => Some(Capability::Construct),
        ReferenceKind::PropertyReference => {
            arena.get(site.node)?;
            Some(property_access_mode(arena, site.node).into())
        }
    }
}

/// How the property reference at `node` is used by its context.
#[must_use]
pub fn property_access_mode(arena: &NodeArena, node: NodeIndex) -> PropertyAccessMode {
    access_mode_at(arena, node, 0)
}

fn access_mode_at(arena: &NodeArena, node: NodeIndex, depth: u32) -> PropertyAccessMode {
    if depth >= MAX_PARENT_WALK_DEPTH {
        trace!(node = node.0, "parent walk limit reached; treating as read");
        return PropertyAccessMode::Get;
    }
    let Some(parent) = arena.parent(node) else {
        return PropertyAccessMode::Get;
    };
    let Some(parent_kind) = arena.get(parent) else {
        return PropertyAccessMode::Get;
    };

    match parent_kind {
        NodeKind::Unary { operator, operand }
            if *operand == node && operator.is_increment_or_decrement() =>
        {
            PropertyAccessMode::GetAndSet
        }
        NodeKind::CompoundAssignment { target, .. } if *target == node => {
            PropertyAccessMode::GetAndSet
        }
        NodeKind::Assignment { target, .. } if *target == node => PropertyAccessMode::Set,
        // `a.Prop` as a whole is what gets read or written.
        NodeKind::MemberAccess { name, .. } if *name == node => {
            access_mode_at(arena, parent, depth + 1)
        }
        NodeKind::Parenthesized { expression } if *expression == node => {
            access_mode_at(arena, parent, depth + 1)
        }
        NodeKind::Argument {
            passing,
            expression,
        } if *expression == node => match passing {
            ArgumentPassing::Ref => PropertyAccessMode::GetAndSet,
            ArgumentPassing::Out => PropertyAccessMode::Set,
            ArgumentPassing::Value | ArgumentPassing::In => PropertyAccessMode::Get,
        },
        _ => PropertyAccessMode::Get,
    }
}

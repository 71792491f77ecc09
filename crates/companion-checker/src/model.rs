//! Host semantic model.
//!
//! The checker never resolves identifiers itself. It reads declarations
//! through [`SemanticModel`], which the host implements over whatever program
//! representation it owns. [`crate::program::Program`] is the in-memory
//! implementation used by the CLI and the tests.
//!
//! Identities are dense indices: a model with `type_count() == n` answers
//! `type_decl` for `TypeId(0)..TypeId(n)`.

use crate::annotation::{AnnotationCategory, AnnotationList};
use companion_common::SourceLocation;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// =============================================================================
// Identifiers
// =============================================================================

/// Identity of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a member declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl MemberId {
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Struct,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
    Constructor,
}

/// A named type. Top-level types live in an optional dotted namespace;
/// nested types point at their containing type instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containing_type: Option<TypeId>,
    /// Companions applying to every member of this type.
    #[serde(default)]
    pub companions: AnnotationList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl TypeDecl {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            namespace: None,
            containing_type: None,
            companions: AnnotationList::default(),
            location: None,
        }
    }
}

/// A method, property or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    pub kind: MemberKind,
    pub declaring_type: TypeId,
    #[serde(default)]
    pub companions: AnnotationList,
    #[serde(default)]
    pub getter_companions: AnnotationList,
    #[serde(default)]
    pub setter_companions: AnnotationList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl MemberDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MemberKind, declaring_type: TypeId) -> Self {
        Self {
            name: name.into(),
            kind,
            declaring_type,
            companions: AnnotationList::default(),
            getter_companions: AnnotationList::default(),
            setter_companions: AnnotationList::default(),
            location: None,
        }
    }

    /// Annotations in one slot of this member.
    #[must_use]
    pub fn annotations(&self, category: AnnotationCategory) -> &AnnotationList {
        match category {
            AnnotationCategory::General => &self.companions,
            AnnotationCategory::Getter => &self.getter_companions,
            AnnotationCategory::Setter => &self.setter_companions,
        }
    }

    #[must_use]
    pub fn has_accessor_companions(&self) -> bool {
        !self.getter_companions.is_empty() || !self.setter_companions.is_empty()
    }
}

// =============================================================================
// SemanticModel
// =============================================================================

/// Read-only view of the host's resolved program.
///
/// Shared across worker threads for the whole pass, hence `Sync`.
pub trait SemanticModel: Sync {
    fn type_decl(&self, id: TypeId) -> Option<&TypeDecl>;

    fn member_decl(&self, id: MemberId) -> Option<&MemberDecl>;

    fn type_count(&self) -> usize;

    fn member_count(&self) -> usize;

    /// Dotted fully-qualified name: namespace segments, containing types, then the simple name.
    fn qualified_name(&self, id: TypeId) -> Option<Cow<'_, str>> {
        render_qualified_name(self, id).map(Cow::Owned)
    }

    /// Type whose fully-qualified name is exactly `name`, if any.
    fn find_type_by_qualified_name(&self, name: &str) -> Option<TypeId> {
        (0..self.type_count())
            .map(|index| TypeId(index as u32))
            .find(|&id| self.qualified_name(id).as_deref() == Some(name))
    }
}

/// Render the fully-qualified name of `id` by walking its containing types.
///
/// Returns `None` when `id` (or a type on its containing chain) is unknown, or
/// when the chain revisits a type. An acyclic chain never exceeds
/// `type_count()` hops, so the walk is bounded by it.
pub fn render_qualified_name<M: SemanticModel + ?Sized>(model: &M, id: TypeId) -> Option<String> {
    let decl = model.type_decl(id)?;
    let mut segments: Vec<&str> = Vec::new();
    let mut current = decl;
    let mut hops = 0usize;
    while let Some(parent) = current.containing_type {
        hops += 1;
        if parent == id || hops > model.type_count() {
            return None;
        }
        current = model.type_decl(parent)?;
        segments.push(&current.name);
    }
    segments.reverse();
    segments.push(&decl.name);
    if let Some(namespace) = current.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        segments.insert(0, namespace);
    }
    Some(segments.join("."))
}

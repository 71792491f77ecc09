//! Reference sites and the compilation units that hold them.

use crate::capability::ReferenceKind;
use crate::model::{MemberId, TypeId};
use crate::syntax::{NodeArena, NodeIndex};
use companion_common::Span;
use serde::{Deserialize, Serialize};

/// One use of a member in source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSite {
    /// The reference expression: the member name for property and method
    /// references, the invocation or creation node for calls and constructions.
    pub node: NodeIndex,
    pub member: MemberId,
    pub kind: ReferenceKind,
    /// Type whose code contains the reference. Absent for top-level code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_type: Option<TypeId>,
    pub location: Span,
}

/// One source file: its expression arena and the reference sites inside it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub file_name: String,
    /// Full text, used only to render snippets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(default)]
    pub nodes: NodeArena,
    #[serde(default)]
    pub references: Vec<ReferenceSite>,
}

impl CompilationUnit {
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }
}

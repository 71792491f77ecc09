//! Expression syntax around reference sites.
//!
//! The host hands over the expression trees that contain reference sites as a
//! flat arena: nodes refer to their children by [`NodeIndex`], and the arena
//! derives parent links once when it is built. The classifier only ever walks
//! upward, so nothing else is stored.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// NodeIndex
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        !self.is_none()
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::NONE
    }
}

// =============================================================================
// Node kinds
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    Plus,
    Minus,
    Not,
    BitwiseNot,
}

impl UnaryOperator {
    /// `++x`, `--x`, `x++`, `x--`: read, modify, write back.
    #[must_use]
    pub const fn is_increment_or_decrement(self) -> bool {
        matches!(
            self,
            Self::PreIncrement | Self::PreDecrement | Self::PostIncrement | Self::PostDecrement
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    And,
    Or,
    ExclusiveOr,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    Coalesce,
}

impl CompoundOperator {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Add => "+=",
            Self::Subtract => "-=",
            Self::Multiply => "*=",
            Self::Divide => "/=",
            Self::Remainder => "%=",
            Self::And => "&=",
            Self::Or => "|=",
            Self::ExclusiveOr => "^=",
            Self::LeftShift => "<<=",
            Self::RightShift => ">>=",
            Self::UnsignedRightShift => ">>>=",
            Self::Coalesce => "??=",
        }
    }
}

/// How an argument is handed to its callee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentPassing {
    #[default]
    Value,
    In,
    Ref,
    Out,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Identifier or member name.
    Name { text: String },
    /// `expression.name`
    MemberAccess {
        expression: NodeIndex,
        name: NodeIndex,
    },
    /// `(expression)`
    Parenthesized { expression: NodeIndex },
    /// `callee(arguments)`
    Invocation {
        callee: NodeIndex,
        #[serde(default)]
        arguments: Vec<NodeIndex>,
    },
    /// `new T(arguments)`
    ObjectCreation {
        #[serde(default)]
        type_name: NodeIndex,
        #[serde(default)]
        arguments: Vec<NodeIndex>,
    },
    /// An argument wrapper carrying its passing mode.
    Argument {
        #[serde(default)]
        passing: ArgumentPassing,
        expression: NodeIndex,
    },
    /// `target = value`
    Assignment { target: NodeIndex, value: NodeIndex },
    /// `target op= value`
    CompoundAssignment {
        operator: CompoundOperator,
        target: NodeIndex,
        value: NodeIndex,
    },
    Unary {
        operator: UnaryOperator,
        operand: NodeIndex,
    },
    /// Any construct the checker does not inspect (statements, literals, binary
    /// operators). Children are kept so parent links stay complete.
    Other {
        #[serde(default)]
        children: Vec<NodeIndex>,
    },
}

impl NodeKind {
    /// Direct children, in source order. `NONE` slots are skipped.
    pub fn children(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        let (fixed, rest): ([NodeIndex; 2], &[NodeIndex]) = match self {
            Self::Name { .. } => ([NodeIndex::NONE; 2], &[]),
            Self::MemberAccess { expression, name } => ([*expression, *name], &[]),
            Self::Parenthesized { expression } => ([*expression, NodeIndex::NONE], &[]),
            Self::Invocation { callee, arguments } => {
                ([*callee, NodeIndex::NONE], arguments.as_slice())
            }
            Self::ObjectCreation {
                type_name,
                arguments,
            } => ([*type_name, NodeIndex::NONE], arguments.as_slice()),
            Self::Argument { expression, .. } => ([*expression, NodeIndex::NONE], &[]),
            Self::Assignment { target, value } => ([*target, *value], &[]),
            Self::CompoundAssignment { target, value, .. } => ([*target, *value], &[]),
            Self::Unary { operand, .. } => ([*operand, NodeIndex::NONE], &[]),
            Self::Other { children } => ([NodeIndex::NONE; 2], children.as_slice()),
        };
        fixed
            .into_iter()
            .chain(rest.iter().copied())
            .filter(|idx| idx.is_some())
    }
}

// =============================================================================
// NodeArena
// =============================================================================

/// Invalid arena structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    /// A child index points past the end of the arena.
    DanglingChild { parent: NodeIndex, child: NodeIndex },
    /// A node is listed as the child of two different nodes.
    MultipleParents {
        child: NodeIndex,
        first: NodeIndex,
        second: NodeIndex,
    },
    /// A node lists itself as a child.
    SelfParent { node: NodeIndex },
    /// Following parent links from a node leads back to it.
    ParentCycle { node: NodeIndex },
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingChild { parent, child } => write!(
                f,
                "node {} refers to child {} which does not exist",
                parent.0, child.0
            ),
            Self::MultipleParents {
                child,
                first,
                second,
            } => write!(
                f,
                "node {} has two parents ({} and {})",
                child.0, first.0, second.0
            ),
            Self::SelfParent { node } => write!(f, "node {} lists itself as a child", node.0),
            Self::ParentCycle { node } => {
                write!(f, "node {} is its own ancestor", node.0)
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// First node found on a cycle of parent links, if any.
///
/// Each node is visited once: a walk stops at the first node an earlier walk
/// already reached, and reports a cycle when it meets its own trail.
fn find_parent_cycle(parents: &[NodeIndex]) -> Option<NodeIndex> {
    // 0 = unvisited, otherwise the 1-based start of the walk that reached it.
    let mut reached_by = vec![0usize; parents.len()];
    for start in 0..parents.len() {
        if reached_by[start] != 0 {
            continue;
        }
        let walk = start + 1;
        let mut current = NodeIndex(start as u32);
        while current.is_some() {
            let index = current.0 as usize;
            match reached_by[index] {
                0 => reached_by[index] = walk,
                seen if seen == walk => return Some(current),
                _ => break,
            }
            current = parents[index];
        }
    }
    None
}

/// Flat expression arena with derived parent links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NodeKind>", into = "Vec<NodeKind>")]
pub struct NodeArena {
    nodes: Vec<NodeKind>,
    parents: Vec<NodeIndex>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena from nodes that already reference each other by index.
    pub fn from_nodes(nodes: Vec<NodeKind>) -> Result<Self, SyntaxError> {
        let mut parents = vec![NodeIndex::NONE; nodes.len()];
        for (index, node) in nodes.iter().enumerate() {
            let parent = NodeIndex(index as u32);
            for child in node.children() {
                if child == parent {
                    return Err(SyntaxError::SelfParent { node: parent });
                }
                let Some(slot) = parents.get_mut(child.0 as usize) else {
                    return Err(SyntaxError::DanglingChild { parent, child });
                };
                if slot.is_some() {
                    return Err(SyntaxError::MultipleParents {
                        child,
                        first: *slot,
                        second: parent,
                    });
                }
                *slot = parent;
            }
        }
        if let Some(node) = find_parent_cycle(&parents) {
            return Err(SyntaxError::ParentCycle { node });
        }
        Ok(Self { nodes, parents })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&NodeKind> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Parent of `index`, or `None` for roots and unknown nodes.
    #[inline]
    #[must_use]
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        if index.is_none() {
            return None;
        }
        self.parents
            .get(index.0 as usize)
            .copied()
            .filter(|parent| parent.is_some())
    }

    // =========================================================================
    // Construction helpers
    // =========================================================================
    //
    // Children must be added before their parent. Each helper records the
    // parent link of the children it is given.

    pub fn add(&mut self, kind: NodeKind) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        for child in kind.children() {
            if let Some(slot) = self.parents.get_mut(child.0 as usize) {
                *slot = index;
            }
        }
        self.nodes.push(kind);
        self.parents.push(NodeIndex::NONE);
        index
    }

    pub fn name(&mut self, text: impl Into<String>) -> NodeIndex {
        self.add(NodeKind::Name { text: text.into() })
    }

    pub fn member_access(&mut self, expression: NodeIndex, name: NodeIndex) -> NodeIndex {
        self.add(NodeKind::MemberAccess { expression, name })
    }

    pub fn parenthesized(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Parenthesized { expression })
    }

    pub fn invocation(&mut self, callee: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::Invocation { callee, arguments })
    }

    pub fn object_creation(&mut self, type_name: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::ObjectCreation {
            type_name,
            arguments,
        })
    }

    pub fn argument(&mut self, passing: ArgumentPassing, expression: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Argument {
            passing,
            expression,
        })
    }

    pub fn assignment(&mut self, target: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Assignment { target, value })
    }

    pub fn compound_assignment(
        &mut self,
        operator: CompoundOperator,
        target: NodeIndex,
        value: NodeIndex,
    ) -> NodeIndex {
        self.add(NodeKind::CompoundAssignment {
            operator,
            target,
            value,
        })
    }

    pub fn unary(&mut self, operator: UnaryOperator, operand: NodeIndex) -> NodeIndex {
        self.add(NodeKind::Unary { operator, operand })
    }

    pub fn other(&mut self, children: Vec<NodeIndex>) -> NodeIndex {
        self.add(NodeKind::Other { children })
    }
}

impl TryFrom<Vec<NodeKind>> for NodeArena {
    type Error = SyntaxError;

    fn try_from(nodes: Vec<NodeKind>) -> Result<Self, Self::Error> {
        Self::from_nodes(nodes)
    }
}

impl From<NodeArena> for Vec<NodeKind> {
    fn from(arena: NodeArena) -> Self {
        arena.nodes
    }
}

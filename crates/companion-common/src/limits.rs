//! Centralized limits and thresholds for the companion checker.
//!
//! Host snapshots are untrusted input: a malformed parent chain must not hang
//! or overflow the pass.

// =============================================================================
// Tree Walk Limits
// =============================================================================

/// Maximum number of parent hops when classifying a property access.
///
/// The classifier walks outward through member-access and parenthesized
/// wrappers until it reaches the expression that decides the access mode.
/// Real code nests a few levels deep:
///
/// ```csharp
/// ((a.B).C).D += 1;   // D: 3 hops through parens and member access
/// ```
///
/// When exceeded the access is classified as a plain read.
pub const MAX_PARENT_WALK_DEPTH: u32 = 256;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Inline capacity of the per-site companion set.
///
/// Members rarely list more than a handful of companions, so the set stays
/// on the stack in the common case.
pub const COMPANION_SET_INLINE: usize = 4;

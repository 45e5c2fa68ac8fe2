//! Centralized limits and thresholds.
//!
//! Shared constants for recursion depths and walk bounds used by the solver
//! and the lowering engine. Keeping them here avoids duplicate definitions
//! with inconsistent values.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth while unifying two types.
///
/// Every type argument, nullable wrapper or upper-bound hop adds one level.
/// Exceeding the limit is reported as "no match" rather than an error, so a
/// pathological self-referential bound can never abort resolution.
///
/// ```text
/// // Deeply nested applications:
/// Box<Box<Box<Box< /* ... 64 levels ... */ Int>>>>
///
/// // Type parameter bounded by itself through a supertype:
/// class Node<T : Node<T>>
/// ```
pub const MAX_UNIFICATION_DEPTH: u32 = 64;

/// Maximum number of classes visited when searching a supertype path.
///
/// Class hierarchies supplied by the host are expected to be acyclic; this
/// bound keeps a malformed (cyclic) hierarchy from looping forever.
pub const MAX_SUPERTYPE_WALK: usize = 256;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Pre-allocation size for the per-resolver resolution cache.
pub const RESOLUTION_CACHE_CAPACITY: usize = 16;

/// Maximum number of index expressions expected in one indexed access.
///
/// Used as the inline capacity for index lists; longer lists spill to the heap.
pub const INLINE_INDEX_COUNT: usize = 2;

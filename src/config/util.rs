//! Utility functions for serde serialization.
//!
//! Helpers used with serde's `skip_serializing_if` attributes so optional
//! flags only appear in the output when they carry information.

// ============================================================================
// Boolean Helpers
// ============================================================================

/// Returns `true` if the boolean value is `false`.
///
/// Used with `#[serde(skip_serializing_if = "is_false")]` to omit false values.
#[inline]
pub fn is_false(b: &bool) -> bool {
    !*b
}

/// Default for fields that are on unless a link turns them off.
#[inline]
pub fn default_true() -> bool {
    true
}

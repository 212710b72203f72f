//! Error types that can occur during collection operations.

/// An error from a [`KeysCursor`][super::KeysCursor] operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorError {
    /// The cursor has not been advanced onto the first key yet.
    NotStarted,
    /// The cursor has moved past the last key.
    Exhausted,
    /// The backing collection was mutated after the cursor was obtained.
    Invalidated,
}

impl CursorError {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::NotStarted => "cursor not started",
            Self::Exhausted => "cursor exhausted",
            Self::Invalidated => "collection mutated during enumeration",
        }
    }
}

impl std::error::Error for CursorError {}
impl std::fmt::Display for CursorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// ===== Capacity Error =====

/// An error from an unsatisfiable capacity request.
///
/// Returned by `try_with_capacity` on the backends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct CapacityError {}

impl std::error::Error for CapacityError {}

impl std::fmt::Display for CapacityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("collection capacity exceeded")
    }
}

//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every document read from the store is an entity keyed by its `$id`.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

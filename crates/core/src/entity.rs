//! Entity trait: identity + continuity across refetches.

/// Entity marker + minimal interface.
///
/// Backend records are refetched wholesale after every mutation, so identity
/// (not position in a list) is what screens key their state on.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// Look up an entity by identifier in an already-fetched list.
pub fn find_by_id<T: Entity>(items: &[T], id: T::Id) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

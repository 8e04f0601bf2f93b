//! Entity trait: identity + continuity across state changes.

use std::collections::HashSet;

/// Entity marker + minimal interface.
///
/// Two entities with equal attributes are still distinct if their ids differ;
/// collections of entities must be pruned by id, never by value.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Drop every entity whose id is listed, keeping the rest in order.
pub fn remove_by_id<E: Entity>(items: &mut Vec<E>, ids: &[E::Id]) {
    let doomed: HashSet<&E::Id> = ids.iter().collect();
    items.retain(|item| !doomed.contains(item.id()));
}

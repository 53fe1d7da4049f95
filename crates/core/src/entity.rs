//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Reference records (customers, employees, projects) are entities: they are
/// looked up and joined by id and have no lifecycle logic beyond CRUD.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

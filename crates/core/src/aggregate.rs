//! Aggregate root traits for records whose state changes through decisions.

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
///
/// Kept small so each domain crate decides how its records evolve; the only
/// requirement is a stable identifier and a change counter.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the record.
    ///
    /// Incremented once per applied event. Persistence uses it to detect a
    /// stale read-modify-write.
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation when replacing a stored record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (imports, first insert).
    Any,
    /// Require the stored record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Aggregates must not perform IO. Callers that need an immutable snapshot use
/// [`Aggregate::evolved`], which applies the events to a clone and returns the
/// whole replacement record.
pub trait Aggregate: AggregateRoot + Clone {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event.
    ///
    /// Implementations bump `version()` by one per applied event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Returns a copy of `self` with `events` applied in order.
    fn evolved(&self, events: &[Self::Event]) -> Self {
        let mut next = self.clone();
        for event in events {
            next.apply(event);
        }
        next
    }

    /// `handle` followed by `evolved`: the full replacement record for `command`.
    fn execute(&self, command: &Self::Command) -> Result<(Self, Vec<Self::Event>), Self::Error> {
        let events = self.handle(command)?;
        Ok((self.evolved(&events), events))
    }
}

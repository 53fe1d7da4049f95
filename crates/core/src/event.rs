use chrono::NaiveDate;

/// A domain event emitted by an aggregate's `handle`.
///
/// Events are facts: immutable, named, and dated in business time.
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "billing.document.dunning_sent").
    fn event_type(&self) -> &'static str;

    /// Business date the event refers to.
    fn occurred_on(&self) -> NaiveDate;
}

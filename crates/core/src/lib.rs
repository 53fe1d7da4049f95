//! `werkbank-core`: domain foundation building blocks.
//!
//! Shared by every Werkbank domain crate. Contains **pure domain** primitives
//! only: identifiers, the domain error model and the aggregate/event traits.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::DomainEvent;
pub use id::{CustomerId, DocumentId, EmployeeId, ProjectId};
pub use value_object::ValueObject;

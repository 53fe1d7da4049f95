//! Projects domain module.
//!
//! A project (Baustelle / Auftrag) groups documents for one customer.

pub mod project;

pub use project::{Project, ProjectStatus};

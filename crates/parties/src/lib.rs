//! Parties domain module (customers and employees).
//!
//! Reference records joined to documents and projects by id. They carry
//! validation only; there is no lifecycle beyond create/update/delete.

pub mod customer;
pub mod employee;

pub use customer::{ContactInfo, Customer};
pub use employee::Employee;

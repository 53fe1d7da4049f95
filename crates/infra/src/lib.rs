//! Infrastructure layer: record persistence, configuration and the billing
//! application service that ties the domain crates to storage.

pub mod config;
pub mod record_store;
pub mod repository;
pub mod service;

pub use crate::config::{AppConfig, ConfigError};
pub use record_store::{InMemoryRecordStore, JsonFileRecordStore, RecordStore, StoreError};
pub use repository::{Repository, StoredRecord};
pub use service::{
    BillingService, BillingSettings, NewDocument, OverdueInvoice, ReceivablesReport,
    ServiceError, ServiceResult,
};

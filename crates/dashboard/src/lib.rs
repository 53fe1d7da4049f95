//! Dashboard read side.
//!
//! Pure rollups over document and project snapshots, recomputed on demand.
//! Every function is a single O(n) pass; nothing is cached.

pub mod collection;
pub mod receivables;
pub mod stats;

pub use collection::{DEFAULT_COLLECTION_WINDOW_DAYS, collection_rate};
pub use receivables::{
    AgingLine, CustomerBalance, DunningOverview, customer_balances, dunning_overview,
    receivables_by_age,
};
pub use stats::{
    DashboardOptions, DashboardStats, aggregate_dashboard_stats, aggregate_dashboard_stats_with,
};

//! Balance aggregation with per-category failure isolation

pub mod aggregator;

pub use aggregator::{BalanceAggregator, RefreshOutcome};

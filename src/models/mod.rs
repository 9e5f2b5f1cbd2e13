//! Data models for the migration session

pub mod identity;
pub mod registry;
pub mod snapshot;
pub mod step;
pub mod token;

// Re-export for convenience
pub use identity::{IdentityBinding, WalletRole};
pub use registry::TokenRegistry;
pub use snapshot::{BalanceCategory, BalanceSnapshot, CategoryResult, CategorySlot};
pub use step::MigrationStep;
pub use token::{TokenBalance, TokenDescriptor};

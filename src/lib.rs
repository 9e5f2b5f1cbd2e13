//! Position Migrator Library
//!
//! Migrates Aave collateral and debt positions from one wallet to another
//! through an ordered approval/transfer flow, with one connected wallet at
//! a time and a guarded switch between the source and recipient wallets.

// Public modules - these are the API surface
pub mod balances;
pub mod error;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod session;
pub mod traits;
pub mod utils;

// Re-export commonly used items for easier access
pub use balances::{BalanceAggregator, RefreshOutcome};
pub use error::SessionError;
pub use models::{
    identity::{IdentityBinding, WalletRole},
    registry::TokenRegistry,
    snapshot::{BalanceCategory, BalanceSnapshot, CategoryResult, CategorySlot},
    step::MigrationStep,
    token::{TokenBalance, TokenDescriptor},
};
pub use traits::{
    balance_provider::BalanceProvider, event_handler::SessionEventHandler,
    wallet_connector::WalletConnector,
};
pub use providers::{
    rpc_provider::JsonRpcBalanceProvider, static_connector::StaticWalletConnector,
};
pub use handlers::{
    composite::CompositeEventHandler, console::ConsoleEventHandler, telegram::TelegramEventHandler,
};
pub use session::migration_session::MigrationSession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

//! Core traits: the seams to external collaborators

pub mod balance_provider;
pub mod event_handler;
pub mod wallet_connector;

// Re-export for convenience
pub use balance_provider::BalanceProvider;
pub use event_handler::SessionEventHandler;
pub use wallet_connector::WalletConnector;

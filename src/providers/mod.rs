//! Concrete collaborator implementations

pub mod rpc_provider;
pub mod static_connector;

// Re-export for convenience
pub use rpc_provider::JsonRpcBalanceProvider;
pub use static_connector::StaticWalletConnector;

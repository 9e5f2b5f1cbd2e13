use alloy_primitives::Address;
use async_trait::async_trait;

/// External wallet-connector collaborator. Holds at most one bound
/// identity at a time; the session never talks to the chain for signing,
/// only asks the connector to bind or release an identity.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Prompt for a wallet. `Ok(None)` means the user cancelled inside the
    /// connector's own UI and is treated as "no identity bound", not as a
    /// fatal error.
    async fn connect(&self) -> anyhow::Result<Option<Address>>;

    /// Release the given identity.
    async fn disconnect(&self, account: Address) -> anyhow::Result<()>;
}

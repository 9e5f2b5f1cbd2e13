use alloy_primitives::{Address, U256};
use async_trait::async_trait;

/// Read-capable handle onto the connected network.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Batch-read `account`'s balance on each wrapped-token contract.
    ///
    /// The returned amounts align positionally with `addresses`. Transport
    /// failures reject the whole batch; the caller decides how far the
    /// failure spreads.
    async fn get_balances(
        &self,
        account: Address,
        addresses: &[Address],
    ) -> anyhow::Result<Vec<U256>>;
}

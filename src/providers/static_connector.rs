use std::collections::VecDeque;

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::traits::wallet_connector::WalletConnector;

/// Preconfigured connector for headless runs: hands out identities from a
/// fixed queue, one per connect request. An exhausted queue behaves like
/// the user cancelling inside the connector UI.
pub struct StaticWalletConnector {
    accounts: Mutex<VecDeque<Address>>,
}

impl StaticWalletConnector {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts: Mutex::new(accounts.into()),
        }
    }
}

#[async_trait]
impl WalletConnector for StaticWalletConnector {
    async fn connect(&self) -> anyhow::Result<Option<Address>> {
        let next = self.accounts.lock().await.pop_front();
        match &next {
            Some(account) => debug!("Static connector handing out {}", account),
            None => debug!("Static connector exhausted; treating connect as cancelled"),
        }
        Ok(next)
    }

    async fn disconnect(&self, account: Address) -> anyhow::Result<()> {
        debug!("Static connector released {}", account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[tokio::test]
    async fn hands_out_accounts_in_order_then_cancels() {
        let first = address!("14e6b828AdB52153E5BF7C740A1a7312ef4B8711");
        let second = address!("A2025B15a1757311bfD68cb14eaeFCc237AF5b43");
        let connector = StaticWalletConnector::new(vec![first, second]);

        assert_eq!(connector.connect().await.unwrap(), Some(first));
        connector.disconnect(first).await.unwrap();
        assert_eq!(connector.connect().await.unwrap(), Some(second));
        assert_eq!(connector.connect().await.unwrap(), None);
    }
}

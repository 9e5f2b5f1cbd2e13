use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::traits::balance_provider::BalanceProvider;

/// balanceOf(address) selector.
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// Read-provider backed by a JSON-RPC endpoint. Each wrapped-token balance
/// is a `balanceOf(account)` eth_call against that token's contract.
pub struct JsonRpcBalanceProvider {
    client: reqwest::Client,
    endpoint: String,
    request_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl JsonRpcBalanceProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            request_id: AtomicU64::new(1),
        }
    }

    fn balance_of_calldata(account: Address) -> String {
        // 4-byte selector followed by the address left-padded to 32 bytes.
        format!(
            "0x{}{:0>64}",
            BALANCE_OF_SELECTOR,
            hex::encode(account.as_slice())
        )
    }

    async fn call_balance_of(&self, contract: Address, account: Address) -> anyhow::Result<U256> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [
                { "to": contract, "data": Self::balance_of_calldata(account) },
                "latest",
            ],
        });

        let reply: RpcReply = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = reply.error {
            anyhow::bail!("RPC error {}: {}", error.code, error.message);
        }
        let result = reply
            .result
            .ok_or_else(|| anyhow::anyhow!("RPC reply carries neither result nor error"))?;
        parse_hex_quantity(&result)
    }
}

#[async_trait]
impl BalanceProvider for JsonRpcBalanceProvider {
    async fn get_balances(
        &self,
        account: Address,
        addresses: &[Address],
    ) -> anyhow::Result<Vec<U256>> {
        let mut amounts = Vec::with_capacity(addresses.len());
        for contract in addresses {
            amounts.push(self.call_balance_of(*contract, account).await?);
        }
        debug!("Read {} balances for {}", amounts.len(), account);
        Ok(amounts)
    }
}

fn parse_hex_quantity(s: &str) -> anyhow::Result<U256> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    // An empty "0x" is how some nodes encode zero for an empty return.
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16).map_err(|e| anyhow::anyhow!("Invalid hex quantity {}: {}", s, e))
}

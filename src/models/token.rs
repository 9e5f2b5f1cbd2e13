use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::snapshot::BalanceCategory;
use crate::utils::helper::format_units;

/// Describes one migratable token: the underlying asset plus the three
/// wrapped-token contracts that represent collateral and debt positions in
/// it. Defined once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub underlying_address: Address,
    pub a_token_address: Address,
    pub stable_debt_address: Address,
    pub variable_debt_address: Address,
    pub decimals: u8,
}

impl TokenDescriptor {
    /// The wrapped-token contract holding this token's balance for the
    /// given category.
    pub fn address_for(&self, category: BalanceCategory) -> Address {
        match category {
            BalanceCategory::InterestBearing => self.a_token_address,
            BalanceCategory::StableDebt => self.stable_debt_address,
            BalanceCategory::VariableDebt => self.variable_debt_address,
        }
    }
}

/// A single balance entry: raw smallest-unit amount plus the token's
/// declared decimal count. Scaling to a human-readable figure is a
/// presentation concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub amount: U256,
    pub decimals: u8,
}

impl TokenBalance {
    pub fn new(symbol: impl Into<String>, amount: U256, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            decimals,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Format amount with symbol, e.g. "1.5 WETH".
    pub fn formatted_amount(&self) -> String {
        format!("{} {}", format_units(self.amount, self.decimals), self.symbol)
    }
}

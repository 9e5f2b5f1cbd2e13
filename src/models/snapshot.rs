use std::fmt;

use alloy_primitives::Address;
use chrono::{DateTime, Utc};

use super::token::TokenBalance;

/// The three independent balance categories read for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceCategory {
    /// Collateral-representing wrapped tokens (aTokens) held by the account.
    InterestBearing,
    /// Fixed-rate debt owed by the account.
    StableDebt,
    /// Floating-rate debt owed by the account.
    VariableDebt,
}

impl BalanceCategory {
    pub const ALL: [BalanceCategory; 3] = [
        BalanceCategory::InterestBearing,
        BalanceCategory::StableDebt,
        BalanceCategory::VariableDebt,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BalanceCategory::InterestBearing => "interest-bearing",
            BalanceCategory::StableDebt => "stable debt",
            BalanceCategory::VariableDebt => "variable debt",
        }
    }
}

impl fmt::Display for BalanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a single category fetch. Failure handling over these is
/// exhaustive; a rejection is never silently swallowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResult {
    Populated(Vec<TokenBalance>),
    Failed(String),
}

/// Last-known state of one category. A `Populated` result replaces the
/// entries and clears the error; a `Failed` result records the cause and
/// leaves the entries from the previous successful read untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySlot {
    pub balances: Vec<TokenBalance>,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CategorySlot {
    pub fn apply(&mut self, result: CategoryResult) {
        match result {
            CategoryResult::Populated(balances) => {
                self.balances = balances;
                self.last_error = None;
            }
            CategoryResult::Failed(cause) => {
                self.last_error = Some(cause);
            }
        }
        self.updated_at = Some(Utc::now());
    }
}

/// The session's view of all three categories for the most recently read
/// account. Created empty at session start, refreshed one category slice
/// at a time, discarded at session end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub account: Option<Address>,
    pub interest_bearing: CategorySlot,
    pub stable_debt: CategorySlot,
    pub variable_debt: CategorySlot,
}

impl BalanceSnapshot {
    pub fn slot(&self, category: BalanceCategory) -> &CategorySlot {
        match category {
            BalanceCategory::InterestBearing => &self.interest_bearing,
            BalanceCategory::StableDebt => &self.stable_debt,
            BalanceCategory::VariableDebt => &self.variable_debt,
        }
    }

    pub fn slot_mut(&mut self, category: BalanceCategory) -> &mut CategorySlot {
        match category {
            BalanceCategory::InterestBearing => &mut self.interest_bearing,
            BalanceCategory::StableDebt => &mut self.stable_debt,
            BalanceCategory::VariableDebt => &mut self.variable_debt,
        }
    }

    pub fn apply(&mut self, category: BalanceCategory, result: CategoryResult) {
        self.slot_mut(category).apply(result);
    }

    /// Categories whose most recent fetch failed, with the recorded cause.
    pub fn failed_categories(&self) -> Vec<(BalanceCategory, String)> {
        BalanceCategory::ALL
            .iter()
            .filter_map(|&category| {
                self.slot(category)
                    .last_error
                    .clone()
                    .map(|cause| (category, cause))
            })
            .collect()
    }

    pub fn total_entries(&self) -> usize {
        BalanceCategory::ALL
            .iter()
            .map(|&category| self.slot(category).balances.len())
            .sum()
    }
}

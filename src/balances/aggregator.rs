use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::registry::TokenRegistry;
use crate::models::snapshot::{BalanceCategory, BalanceSnapshot, CategoryResult};
use crate::models::token::TokenBalance;
use crate::traits::balance_provider::BalanceProvider;

/// What became of a completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The results were merged into the snapshot.
    Applied,
    /// A newer refresh was issued while this one ran; its results were
    /// dropped without touching the snapshot.
    Discarded,
}

/// Reads the three balance categories for an account and merges the
/// results into the session snapshot.
///
/// The three category fetches run concurrently and are joined before any
/// state is touched, but each outcome is applied independently: one failed
/// category never disturbs the other two, and its slot keeps the entries
/// from the last successful read.
pub struct BalanceAggregator {
    registry: Arc<TokenRegistry>,
    snapshot: Arc<RwLock<BalanceSnapshot>>,
    generation: AtomicU64,
}

impl BalanceAggregator {
    pub fn new(registry: Arc<TokenRegistry>, snapshot: Arc<RwLock<BalanceSnapshot>>) -> Self {
        Self {
            registry,
            snapshot,
            generation: AtomicU64::new(0),
        }
    }

    /// Fetch all three categories for `account` and apply the results.
    ///
    /// Concurrent refreshes are allowed; a refresh that is no longer the
    /// newest by the time it settles is discarded so a slow fetch cannot
    /// overwrite fresher data.
    pub async fn refresh(
        &self,
        provider: Arc<dyn BalanceProvider>,
        account: Address,
    ) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Refreshing balances for {} (generation {})", account, generation);

        let (interest_bearing, stable_debt, variable_debt) = tokio::join!(
            self.fetch_category(provider.as_ref(), account, BalanceCategory::InterestBearing),
            self.fetch_category(provider.as_ref(), account, BalanceCategory::StableDebt),
            self.fetch_category(provider.as_ref(), account, BalanceCategory::VariableDebt),
        );

        let mut snapshot = self.snapshot.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale refresh (generation {})", generation);
            return RefreshOutcome::Discarded;
        }

        snapshot.account = Some(account);
        snapshot.apply(BalanceCategory::InterestBearing, interest_bearing);
        snapshot.apply(BalanceCategory::StableDebt, stable_debt);
        snapshot.apply(BalanceCategory::VariableDebt, variable_debt);
        RefreshOutcome::Applied
    }

    async fn fetch_category(
        &self,
        provider: &dyn BalanceProvider,
        account: Address,
        category: BalanceCategory,
    ) -> CategoryResult {
        let addresses = self.registry.addresses_for(category);
        match provider.get_balances(account, &addresses).await {
            Ok(amounts) => {
                if amounts.len() != addresses.len() {
                    warn!(
                        "Malformed {} reply: {} amounts for {} contracts",
                        category,
                        amounts.len(),
                        addresses.len()
                    );
                    return CategoryResult::Failed(format!(
                        "malformed reply: {} amounts for {} contracts",
                        amounts.len(),
                        addresses.len()
                    ));
                }
                let balances = self
                    .registry
                    .tokens()
                    .iter()
                    .zip(amounts)
                    .map(|(token, amount)| {
                        TokenBalance::new(token.symbol.clone(), amount, token.decimals)
                    })
                    .collect();
                CategoryResult::Populated(balances)
            }
            Err(e) => {
                warn!("Failed to fetch {} balances for {}: {}", category, account, e);
                CategoryResult::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use alloy_primitives::{address, U256};
    use async_trait::async_trait;

    const ACCOUNT: Address = address!("14e6b828AdB52153E5BF7C740A1a7312ef4B8711");

    /// Returns a fixed amount for every contract; selected categories can
    /// be forced to fail, and an optional delay simulates a slow provider.
    struct ScriptedProvider {
        registry: Arc<TokenRegistry>,
        fail: Vec<BalanceCategory>,
        delay: Option<Duration>,
        amount: U256,
    }

    impl ScriptedProvider {
        fn new(registry: Arc<TokenRegistry>, amount: u64) -> Self {
            Self {
                registry,
                fail: Vec::new(),
                delay: None,
                amount: U256::from(amount),
            }
        }

        fn failing(mut self, category: BalanceCategory) -> Self {
            self.fail.push(category);
            self
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl BalanceProvider for ScriptedProvider {
        async fn get_balances(
            &self,
            _account: Address,
            addresses: &[Address],
        ) -> anyhow::Result<Vec<U256>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let category = BalanceCategory::ALL
                .iter()
                .copied()
                .find(|&c| self.registry.addresses_for(c) == addresses)
                .expect("address list does not match any category");
            if self.fail.contains(&category) {
                anyhow::bail!("forced {} failure", category);
            }
            Ok(vec![self.amount; addresses.len()])
        }
    }

    fn aggregator(registry: Arc<TokenRegistry>) -> (Arc<BalanceAggregator>, Arc<RwLock<BalanceSnapshot>>) {
        let snapshot = Arc::new(RwLock::new(BalanceSnapshot::default()));
        (
            Arc::new(BalanceAggregator::new(registry, snapshot.clone())),
            snapshot,
        )
    }

    #[tokio::test]
    async fn refresh_populates_all_three_categories() {
        let registry = Arc::new(TokenRegistry::bundled());
        let (aggregator, snapshot) = aggregator(registry.clone());
        let provider = Arc::new(ScriptedProvider::new(registry, 42));

        let outcome = aggregator.refresh(provider, ACCOUNT).await;
        assert_eq!(outcome, RefreshOutcome::Applied);

        let snap = snapshot.read().await;
        assert_eq!(snap.account, Some(ACCOUNT));
        for category in BalanceCategory::ALL {
            let slot = snap.slot(category);
            assert_eq!(slot.balances.len(), 2);
            assert!(slot.last_error.is_none());
            assert_eq!(slot.balances[0].symbol, "WETH");
            assert_eq!(slot.balances[1].symbol, "USDC");
            assert_eq!(slot.balances[0].amount, U256::from(42u64));
        }
    }

    #[tokio::test]
    async fn failed_category_is_isolated_and_keeps_prior_entries() {
        let registry = Arc::new(TokenRegistry::bundled());
        let (aggregator, snapshot) = aggregator(registry.clone());

        // First run all-success, second run with variable debt forced down.
        let healthy = Arc::new(ScriptedProvider::new(registry.clone(), 7));
        aggregator.refresh(healthy, ACCOUNT).await;

        let flaky = Arc::new(
            ScriptedProvider::new(registry, 9).failing(BalanceCategory::VariableDebt),
        );
        let outcome = aggregator.refresh(flaky, ACCOUNT).await;
        assert_eq!(outcome, RefreshOutcome::Applied);

        let snap = snapshot.read().await;
        assert_eq!(snap.interest_bearing.balances[0].amount, U256::from(9u64));
        assert_eq!(snap.stable_debt.balances[0].amount, U256::from(9u64));
        // The failed slot still shows the previous read, plus the cause.
        assert_eq!(snap.variable_debt.balances[0].amount, U256::from(7u64));
        assert!(snap
            .variable_debt
            .last_error
            .as_deref()
            .unwrap()
            .contains("variable debt"));
    }

    #[tokio::test]
    async fn first_run_failure_leaves_the_slot_empty() {
        let registry = Arc::new(TokenRegistry::bundled());
        let (aggregator, snapshot) = aggregator(registry.clone());
        let provider = Arc::new(
            ScriptedProvider::new(registry, 5).failing(BalanceCategory::StableDebt),
        );

        aggregator.refresh(provider, ACCOUNT).await;

        let snap = snapshot.read().await;
        assert_eq!(snap.interest_bearing.balances.len(), 2);
        assert_eq!(snap.variable_debt.balances.len(), 2);
        assert!(snap.stable_debt.balances.is_empty());
        assert!(snap.stable_debt.last_error.is_some());
    }

    #[tokio::test]
    async fn empty_registry_yields_empty_populated_slots() {
        let registry = Arc::new(TokenRegistry::new(Vec::new()).unwrap());
        let (aggregator, snapshot) = aggregator(registry.clone());
        let provider = Arc::new(ScriptedProvider::new(registry, 1));

        let outcome = aggregator.refresh(provider, ACCOUNT).await;
        assert_eq!(outcome, RefreshOutcome::Applied);

        let snap = snapshot.read().await;
        for category in BalanceCategory::ALL {
            assert!(snap.slot(category).balances.is_empty());
            assert!(snap.slot(category).last_error.is_none());
            assert!(snap.slot(category).updated_at.is_some());
        }
    }

    #[tokio::test]
    async fn stale_refresh_is_discarded() {
        let registry = Arc::new(TokenRegistry::bundled());
        let (aggregator, snapshot) = aggregator(registry.clone());

        let slow = Arc::new(
            ScriptedProvider::new(registry.clone(), 1).delayed(Duration::from_millis(200)),
        );
        let fast = Arc::new(ScriptedProvider::new(registry, 2));

        let slow_task = {
            let aggregator = aggregator.clone();
            tokio::spawn(async move { aggregator.refresh(slow, ACCOUNT).await })
        };
        // Let the slow refresh claim its generation before issuing a newer one.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let fast_outcome = aggregator.refresh(fast, ACCOUNT).await;
        let slow_outcome = slow_task.await.unwrap();

        assert_eq!(fast_outcome, RefreshOutcome::Applied);
        assert_eq!(slow_outcome, RefreshOutcome::Discarded);

        let snap = snapshot.read().await;
        assert_eq!(snap.interest_bearing.balances[0].amount, U256::from(2u64));
    }
}

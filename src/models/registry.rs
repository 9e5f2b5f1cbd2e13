use std::collections::HashSet;

use alloy_primitives::{address, Address};

use super::snapshot::BalanceCategory;
use super::token::TokenDescriptor;

/// Ordered, immutable list of migratable tokens. Built once at startup;
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<TokenDescriptor>,
}

impl TokenRegistry {
    /// Build a registry, rejecting duplicate symbols. An empty list is
    /// accepted; the bootstrap layer decides whether that is useful.
    pub fn new(tokens: Vec<TokenDescriptor>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for token in &tokens {
            if !seen.insert(token.symbol.clone()) {
                anyhow::bail!("duplicate token symbol in registry: {}", token.symbol);
            }
        }
        Ok(Self { tokens })
    }

    /// Parse a registry from a JSON array of token descriptors.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tokens: Vec<TokenDescriptor> = serde_json::from_str(json)?;
        Self::new(tokens)
    }

    pub fn tokens(&self) -> &[TokenDescriptor] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Wrapped-token addresses for one category, in registry order.
    pub fn addresses_for(&self, category: BalanceCategory) -> Vec<Address> {
        self.tokens
            .iter()
            .map(|token| token.address_for(category))
            .collect()
    }

    /// The bundled token table: the markets supported out of the box.
    pub fn bundled() -> Self {
        Self {
            tokens: vec![
                TokenDescriptor {
                    symbol: "WETH".to_string(),
                    underlying_address: address!("2e3A2fb8473316A02b8A297B982498E661E1f6f5"),
                    a_token_address: address!("27B4692C93959048833f40702b22FE3578E77759"),
                    stable_debt_address: address!("1F85D0dc45332D00aead98D26db0735350F80D18"),
                    variable_debt_address: address!("2b848bA14583fA79519Ee71E7038D0d1061cd0F1"),
                    decimals: 18,
                },
                TokenDescriptor {
                    symbol: "USDC".to_string(),
                    underlying_address: address!("A2025B15a1757311bfD68cb14eaeFCc237AF5b43"),
                    a_token_address: address!("1Ee669290939f8a8864497Af3BC83728715265FF"),
                    stable_debt_address: address!("F04958AeA8b7F24Db19772f84d7c2aC801D9Cf8b"),
                    variable_debt_address: address!("3e491EB1A98cD42F9BBa388076Fd7a74B3470CA0"),
                    decimals: 6,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_registry_is_ordered_and_nonempty() {
        let registry = TokenRegistry::bundled();
        let symbols: Vec<&str> = registry
            .tokens()
            .iter()
            .map(|t| t.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["WETH", "USDC"]);
    }

    #[test]
    fn duplicate_symbols_are_rejected() {
        let mut tokens = TokenRegistry::bundled().tokens().to_vec();
        tokens.push(tokens[0].clone());
        assert!(TokenRegistry::new(tokens).is_err());
    }

    #[test]
    fn empty_registry_is_allowed() {
        let registry = TokenRegistry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry
            .addresses_for(BalanceCategory::InterestBearing)
            .is_empty());
    }

    #[test]
    fn addresses_align_with_registry_order() {
        let registry = TokenRegistry::bundled();
        let addresses = registry.addresses_for(BalanceCategory::StableDebt);
        assert_eq!(addresses.len(), registry.len());
        for (token, address) in registry.tokens().iter().zip(&addresses) {
            assert_eq!(*address, token.stable_debt_address);
        }
    }

    #[test]
    fn registry_round_trips_through_json() {
        let json = serde_json::to_string(TokenRegistry::bundled().tokens()).unwrap();
        let parsed = TokenRegistry::from_json(&json).unwrap();
        assert_eq!(parsed.tokens(), TokenRegistry::bundled().tokens());
    }
}

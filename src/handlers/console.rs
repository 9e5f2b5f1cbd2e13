use async_trait::async_trait;
use tracing::info;

use crate::error::SessionError;
use crate::models::identity::IdentityBinding;
use crate::models::snapshot::{BalanceCategory, BalanceSnapshot};
use crate::models::step::MigrationStep;
use crate::traits::event_handler::SessionEventHandler;
use crate::utils::helper::format_address;

/// Console logging event handler
pub struct ConsoleEventHandler;

impl ConsoleEventHandler {
    /// Create a new console event handler
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionEventHandler for ConsoleEventHandler {
    async fn on_step_changed(&self, step: MigrationStep) {
        info!("Migration step: {}", step);
    }

    async fn on_identity_changed(&self, binding: Option<IdentityBinding>) {
        match binding {
            Some(binding) => info!(
                "Wallet connected: {} ({})",
                format_address(&binding.account),
                binding.role
            ),
            None => info!("Wallet disconnected"),
        }
    }

    async fn on_snapshot_updated(&self, snapshot: BalanceSnapshot) {
        info!("Balances refreshed:");
        info!("{}", "-".repeat(60));
        for category in BalanceCategory::ALL {
            let slot = snapshot.slot(category);
            info!("  {}:", category);
            if let Some(cause) = &slot.last_error {
                info!("     (last fetch failed: {})", cause);
            }
            if slot.balances.is_empty() {
                info!("     no positions");
                continue;
            }
            for balance in &slot.balances {
                info!("     {}", balance.formatted_amount());
            }
        }
        info!("{}", "=".repeat(60));
    }

    async fn on_error(&self, error: &SessionError) {
        info!("Migration session error: {}", error);
    }
}

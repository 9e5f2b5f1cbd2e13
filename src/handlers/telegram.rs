use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::models::identity::IdentityBinding;
use crate::models::snapshot::{BalanceCategory, BalanceSnapshot};
use crate::models::step::MigrationStep;
use crate::traits::event_handler::SessionEventHandler;
use crate::utils::helper::format_address;

/// Sends migration session updates to a Telegram chat. Configured through
/// `TG_TOKEN` and `CHAT_ID`; with either missing the handler is inert.
pub struct TelegramEventHandler {
    client: Option<Client>,
    token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramEventHandler {
    pub fn new() -> Self {
        let token = std::env::var("TG_TOKEN").ok();
        let chat_id = std::env::var("CHAT_ID").ok();

        let client = if token.is_some() && chat_id.is_some() {
            Some(Client::new())
        } else {
            None
        };

        Self {
            client,
            token,
            chat_id,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some() && self.token.is_some() && self.chat_id.is_some()
    }

    /// Send Telegram notification
    async fn send_notification(&self, message: &str) {
        if let (Some(client), Some(token), Some(chat_id)) =
            (&self.client, &self.token, &self.chat_id)
        {
            let url = format!("https://api.telegram.org/bot{}/sendMessage", token);

            let payload = serde_json::json!({
                "chat_id": chat_id,
                "text": message,
                "parse_mode": "HTML",
                "disable_web_page_preview": true
            });

            match client
                .post(&url)
                .body(payload.to_string())
                .header("Content-Type", "application/json")
                .send()
                .await
            {
                Ok(response) => {
                    let response_status = response.status();
                    if !response_status.is_success() {
                        warn!("Telegram API error: Status {}", response_status);
                        if let Ok(text) = response.text().await {
                            warn!("Telegram API response: {}", text);
                        }
                    } else {
                        debug!("Telegram notification sent successfully");
                    }
                }
                Err(e) => {
                    warn!("Failed to send Telegram notification: {}", e);
                }
            }
        }
    }

    fn format_snapshot(snapshot: &BalanceSnapshot) -> String {
        let mut lines = vec!["📊 <b>Positions Refreshed</b>".to_string()];
        if let Some(account) = &snapshot.account {
            lines.push(format!("👛 <code>{}</code>", account));
        }
        for category in BalanceCategory::ALL {
            let slot = snapshot.slot(category);
            lines.push(format!("\n<b>{}</b>", category));
            if let Some(cause) = &slot.last_error {
                lines.push(format!("⚠️ last fetch failed: {}", cause));
            }
            if slot.balances.is_empty() {
                lines.push("• no positions".to_string());
            }
            for balance in &slot.balances {
                lines.push(format!("• {}", balance.formatted_amount()));
            }
        }
        lines.join("\n")
    }
}

impl Default for TelegramEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionEventHandler for TelegramEventHandler {
    async fn on_step_changed(&self, step: MigrationStep) {
        let message = if step == MigrationStep::Complete {
            "🎉 <b>Migration complete</b>\nAll positions have been transferred.".to_string()
        } else {
            format!("➡️ <b>Migration step {}</b>\n{}", step.number(), step.label())
        };
        self.send_notification(&message).await;
    }

    async fn on_identity_changed(&self, binding: Option<IdentityBinding>) {
        let message = match binding {
            Some(binding) => format!(
                "🔑 <b>Wallet connected</b>\n{} wallet <code>{}</code>",
                binding.role,
                format_address(&binding.account)
            ),
            None => "🔌 <b>Wallet disconnected</b>".to_string(),
        };
        self.send_notification(&message).await;
    }

    async fn on_snapshot_updated(&self, snapshot: BalanceSnapshot) {
        self.send_notification(&Self::format_snapshot(&snapshot)).await;
    }

    async fn on_error(&self, error: &SessionError) {
        let message = format!("❌ <b>Migration session error</b>\n{}", error);
        self.send_notification(&message).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    use crate::models::snapshot::CategoryResult;
    use crate::models::token::TokenBalance;

    #[test]
    fn snapshot_message_lists_categories_and_failures() {
        let mut snapshot = BalanceSnapshot::default();
        snapshot.apply(
            BalanceCategory::InterestBearing,
            CategoryResult::Populated(vec![TokenBalance::new(
                "WETH",
                U256::from(2_000_000_000_000_000_000u64),
                18,
            )]),
        );
        snapshot.apply(
            BalanceCategory::VariableDebt,
            CategoryResult::Failed("timeout".to_string()),
        );

        let message = TelegramEventHandler::format_snapshot(&snapshot);
        assert!(message.contains("2 WETH"));
        assert!(message.contains("interest-bearing"));
        assert!(message.contains("timeout"));
        assert!(message.contains("no positions"));
    }
}

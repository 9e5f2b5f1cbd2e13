use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing::{info, warn};

use position_migrator::utils::parse_address;
use position_migrator::{
    CompositeEventHandler, ConsoleEventHandler, JsonRpcBalanceProvider, MigrationSession,
    StaticWalletConnector, TelegramEventHandler, TokenRegistry,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_level(true)
        .with_target(false)
        .with_max_level(LevelFilter::INFO)
        .init();

    dotenvy::dotenv().ok();

    tokio::runtime::Runtime::new()?.block_on(async {
        let rpc_url = std::env::var("RPC_URL")
            .unwrap_or_else(|_| "https://rpc.ankr.com/eth".to_string());

        // Wallet holding the positions to migrate
        let source = std::env::var("SOURCE_ACCOUNT").unwrap_or_else(|_| {
            // Example wallet for demo runs
            "0x14e6b828AdB52153E5BF7C740A1a7312ef4B8711".to_string()
        });
        let recipient = std::env::var("RECIPIENT_ACCOUNT").ok();

        let registry = match std::env::var("TOKEN_LIST_FILE") {
            Ok(path) => {
                info!("Loading token list from {}", path);
                TokenRegistry::from_json(&std::fs::read_to_string(&path)?)?
            }
            Err(_) => TokenRegistry::bundled(),
        };
        anyhow::ensure!(!registry.is_empty(), "token registry must not be empty");

        info!("Initializing migration session...");
        info!("RPC URL: {}", rpc_url);
        info!("Source account: {}", source);
        info!("Tokens in registry: {}", registry.len());

        let mut accounts = vec![parse_address(&source)?];
        if let Some(recipient) = &recipient {
            accounts.push(parse_address(recipient)?);
        }

        let mut handlers = CompositeEventHandler::new();
        handlers.add_handler(Arc::new(ConsoleEventHandler::new()));

        let telegram = TelegramEventHandler::new();
        if telegram.is_enabled() {
            info!("Telegram notifications enabled");
            handlers.add_handler(Arc::new(telegram));
        } else {
            warn!(
                "Telegram notifications disabled. Set TG_TOKEN and CHAT_ID in .env file to enable."
            );
        }

        let session = MigrationSession::new(
            Arc::new(registry),
            Arc::new(JsonRpcBalanceProvider::new(rpc_url)),
            Arc::new(StaticWalletConnector::new(accounts)),
            Arc::new(handlers),
        );

        info!("{}", "=".repeat(80));
        info!("MIGRATION SESSION");
        info!("{}", "=".repeat(80));

        match session.connect_source().await {
            Ok(Some(binding)) => info!("Session opened for {}", binding.account),
            Ok(None) => {
                warn!("No wallet connected; nothing to do");
                return Ok(());
            }
            Err(e) => anyhow::bail!("failed to connect source wallet: {}", e),
        }

        let snapshot = session.snapshot().await;
        info!("Current step: {}", session.current_step().await);
        info!("Positions found: {}", snapshot.total_entries());
        for (category, cause) in snapshot.failed_categories() {
            warn!("{} balances unavailable: {}", category, cause);
        }
        info!("{}", "=".repeat(80));

        Ok(())
    })
}

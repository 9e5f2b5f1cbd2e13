use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::balances::aggregator::{BalanceAggregator, RefreshOutcome};
use crate::error::SessionError;
use crate::models::identity::{IdentityBinding, WalletRole};
use crate::models::registry::TokenRegistry;
use crate::models::snapshot::BalanceSnapshot;
use crate::models::step::MigrationStep;
use crate::traits::balance_provider::BalanceProvider;
use crate::traits::event_handler::SessionEventHandler;
use crate::traits::wallet_connector::WalletConnector;

use super::steps::StepMachine;
use super::switch::SwitchPrompt;

/// Mutable session context. Binding, step machine and switch prompt live
/// under one lock so identity transitions are observed atomically.
struct SessionState {
    binding: Option<IdentityBinding>,
    steps: StepMachine,
    prompt: SwitchPrompt,
}

/// The migration session orchestrator.
///
/// Owns the session context explicitly: the registry, the collaborator
/// handles, the balance snapshot and the step/switch state. Reacts to
/// identity changes by refreshing balances, to advance requests by driving
/// the step machine, and to steps that need a different identity by
/// opening the wallet-switch prompt. Every failure is recovered here and
/// surfaced as an error value or handler event; nothing is thrown past
/// this boundary.
pub struct MigrationSession {
    registry: Arc<TokenRegistry>,
    provider: Arc<dyn BalanceProvider>,
    connector: Arc<dyn WalletConnector>,
    events: Arc<dyn SessionEventHandler>,
    aggregator: BalanceAggregator,
    snapshot: Arc<RwLock<BalanceSnapshot>>,
    state: Mutex<SessionState>,
}

impl MigrationSession {
    pub fn new(
        registry: Arc<TokenRegistry>,
        provider: Arc<dyn BalanceProvider>,
        connector: Arc<dyn WalletConnector>,
        events: Arc<dyn SessionEventHandler>,
    ) -> Self {
        let snapshot = Arc::new(RwLock::new(BalanceSnapshot::default()));
        Self {
            aggregator: BalanceAggregator::new(registry.clone(), snapshot.clone()),
            registry,
            provider,
            connector,
            events,
            snapshot,
            state: Mutex::new(SessionState {
                binding: None,
                steps: StepMachine::new(),
                prompt: SwitchPrompt::new(),
            }),
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    pub async fn current_step(&self) -> MigrationStep {
        self.state.lock().await.steps.current()
    }

    pub async fn binding(&self) -> Option<IdentityBinding> {
        self.state.lock().await.binding
    }

    pub async fn switch_prompt_open(&self) -> bool {
        self.state.lock().await.prompt.is_open()
    }

    pub async fn snapshot(&self) -> BalanceSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Initial connect: bind the source wallet and read its balances.
    /// Returns `Ok(None)` when the user cancels inside the connector.
    /// Already bound sessions get the existing binding back unchanged.
    pub async fn connect_source(&self) -> Result<Option<IdentityBinding>, SessionError> {
        {
            let state = self.state.lock().await;
            if let Some(binding) = state.binding {
                return Ok(Some(binding));
            }
            if state.prompt.is_open() {
                return Err(SessionError::SwitchPending);
            }
        }
        let Some(binding) = self.bind(WalletRole::Source, false).await? else {
            return Ok(None);
        };
        self.refresh_after_identity_change().await;
        Ok(Some(binding))
    }

    /// Ask the step machine to move forward. Refused while a switch is
    /// pending. When the new step requires a different wallet role than is
    /// bound, the switch prompt opens.
    pub async fn advance_step(&self) -> Result<MigrationStep, SessionError> {
        let (previous, step, switch_role) = {
            let mut state = self.state.lock().await;
            if state.prompt.is_open() {
                return Err(SessionError::SwitchPending);
            }
            let previous = state.steps.current();
            let step = state.steps.advance();
            let switch_role = step
                .required_role()
                .filter(|&required| state.binding.map(|b| b.role) != Some(required));
            if switch_role.is_some() {
                state.prompt.open();
            }
            (previous, step, switch_role)
        };
        if step != previous {
            info!("Migration advanced to step {}", step);
            self.events.on_step_changed(step).await;
        }
        if let Some(required) = switch_role {
            info!(
                "Step {} requires the {} wallet; switch prompt opened",
                step, required
            );
        }
        Ok(step)
    }

    /// Re-read all three balance categories for the bound account.
    /// Refused while the switch prompt is open; fails fast with
    /// `ProviderUnavailable` when no identity (and therefore no read
    /// handle) is bound.
    pub async fn refresh_balances(&self) -> Result<RefreshOutcome, SessionError> {
        let account = {
            let state = self.state.lock().await;
            if state.prompt.is_open() {
                return Err(SessionError::SwitchPending);
            }
            match state.binding {
                Some(binding) => binding.account,
                None => return Err(SessionError::ProviderUnavailable),
            }
        };

        let outcome = self.aggregator.refresh(self.provider.clone(), account).await;
        if outcome == RefreshOutcome::Applied {
            let snapshot = self.snapshot.read().await.clone();
            for (category, cause) in snapshot.failed_categories() {
                let error = SessionError::CategoryFetchFailed { category, cause };
                self.events.on_error(&error).await;
            }
            self.events.on_snapshot_updated(snapshot).await;
        }
        Ok(outcome)
    }

    /// Open the wallet-switch prompt. Idempotent.
    pub async fn request_switch(&self) {
        let mut state = self.state.lock().await;
        state.prompt.open();
    }

    /// An incidental dismissal gesture aimed at the prompt. Never closes
    /// it; returns whether the prompt is now closed.
    pub async fn dismiss_switch_prompt(&self) -> bool {
        let mut state = self.state.lock().await;
        state.prompt.dismiss()
    }

    /// First switch action: release the bound identity. The prompt, if
    /// open, stays open; balance aggregation is suspended until a new
    /// identity is bound. A no-op when nothing is bound.
    pub async fn request_disconnect(&self) -> Result<(), SessionError> {
        let Some(binding) = self.binding().await else {
            return Ok(());
        };
        if let Err(e) = self.connector.disconnect(binding.account).await {
            let error = SessionError::ConnectorRejected {
                operation: "disconnect",
                cause: e.to_string(),
            };
            self.events.on_error(&error).await;
            return Err(error);
        }
        {
            let mut state = self.state.lock().await;
            state.binding = None;
        }
        info!("Disconnected {} wallet", binding.role);
        self.events.on_identity_changed(None).await;
        Ok(())
    }

    /// Second switch action: bind the recipient identity. On success the
    /// prompt closes and balances are refreshed for the new account; on
    /// cancellation or rejection the prompt stays open for a retry.
    pub async fn request_connect_recipient(&self) -> Result<Option<IdentityBinding>, SessionError> {
        {
            let state = self.state.lock().await;
            if !state.prompt.is_open() {
                return Err(SessionError::ConnectorRejected {
                    operation: "connect",
                    cause: "no wallet switch is in progress".to_string(),
                });
            }
            if state.binding.is_some() {
                return Err(SessionError::ConnectorRejected {
                    operation: "connect",
                    cause: "disconnect the current wallet first".to_string(),
                });
            }
        }
        let Some(binding) = self.bind(WalletRole::Recipient, true).await? else {
            info!("Recipient connect cancelled; switch prompt stays open");
            return Ok(None);
        };
        self.refresh_after_identity_change().await;
        Ok(Some(binding))
    }

    /// Check whether the current step's action may execute right now:
    /// no switch pending, the step still has an action, and the bound
    /// wallet carries the role that step requires.
    pub async fn authorize_step_action(&self) -> Result<(), SessionError> {
        let state = self.state.lock().await;
        if state.prompt.is_open() {
            return Err(SessionError::SwitchPending);
        }
        let step = state.steps.current();
        let Some(required) = step.required_role() else {
            return Err(SessionError::MigrationComplete);
        };
        let bound = state.binding.map(|b| b.role);
        if bound != Some(required) {
            return Err(SessionError::RoleMismatch {
                step,
                required,
                bound,
            });
        }
        Ok(())
    }

    /// Record a failed approval or transfer reported by the action layer.
    /// The step does not advance; the user retries the step's action.
    pub async fn report_step_failure(&self, cause: impl Into<String>) -> SessionError {
        let step = self.state.lock().await.steps.current();
        let error = SessionError::StepActionFailed {
            step,
            cause: cause.into(),
        };
        warn!("{}", error);
        self.events.on_error(&error).await;
        error
    }

    async fn bind(
        &self,
        role: WalletRole,
        close_prompt: bool,
    ) -> Result<Option<IdentityBinding>, SessionError> {
        let account = match self.connector.connect().await {
            Ok(Some(account)) => account,
            Ok(None) => return Ok(None),
            Err(e) => {
                let error = SessionError::ConnectorRejected {
                    operation: "connect",
                    cause: e.to_string(),
                };
                self.events.on_error(&error).await;
                return Err(error);
            }
        };

        let binding = IdentityBinding::new(role, account);
        {
            let mut state = self.state.lock().await;
            // Re-check: a concurrent operation may have bound an identity
            // while the connector was prompting.
            if state.binding.is_some() {
                return Err(SessionError::ConnectorRejected {
                    operation: "connect",
                    cause: "another identity was bound concurrently".to_string(),
                });
            }
            state.binding = Some(binding);
            if close_prompt {
                state.prompt.close();
            }
        }
        info!("Connected {} wallet {}", role, binding.account);
        self.events.on_identity_changed(Some(binding)).await;
        Ok(Some(binding))
    }

    /// Identity changes trigger a refresh; its failure is reported through
    /// handlers, never propagated to the connect call that caused it.
    async fn refresh_after_identity_change(&self) {
        if let Err(e) = self.refresh_balances().await {
            warn!("Balance refresh after identity change failed: {}", e);
            self.events.on_error(&e).await;
        }
    }
}

use async_trait::async_trait;

use crate::error::SessionError;
use crate::models::identity::IdentityBinding;
use crate::models::snapshot::BalanceSnapshot;
use crate::models::step::MigrationStep;

/// Handler for observable session state changes. The presentation and
/// notification layers consume these; the session never blocks on them
/// succeeding.
#[async_trait]
pub trait SessionEventHandler: Send + Sync {
    /// The current step changed.
    async fn on_step_changed(&self, step: MigrationStep);

    /// An identity was bound or released. `None` means disconnected.
    async fn on_identity_changed(&self, binding: Option<IdentityBinding>);

    /// A refresh completed and was applied.
    async fn on_snapshot_updated(&self, snapshot: BalanceSnapshot);

    /// A recoverable error was recorded.
    async fn on_error(&self, error: &SessionError);
}

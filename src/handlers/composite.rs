use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SessionError;
use crate::models::identity::IdentityBinding;
use crate::models::snapshot::BalanceSnapshot;
use crate::models::step::MigrationStep;
use crate::traits::event_handler::SessionEventHandler;

/// Composite event handler that fans session events out to several
/// consumers.
pub struct CompositeEventHandler {
    handlers: Vec<Arc<dyn SessionEventHandler>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn SessionEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionEventHandler for CompositeEventHandler {
    async fn on_step_changed(&self, step: MigrationStep) {
        for handler in &self.handlers {
            handler.on_step_changed(step).await;
        }
    }

    async fn on_identity_changed(&self, binding: Option<IdentityBinding>) {
        for handler in &self.handlers {
            handler.on_identity_changed(binding).await;
        }
    }

    async fn on_snapshot_updated(&self, snapshot: BalanceSnapshot) {
        for handler in &self.handlers {
            handler.on_snapshot_updated(snapshot.clone()).await;
        }
    }

    async fn on_error(&self, error: &SessionError) {
        for handler in &self.handlers {
            handler.on_error(error).await;
        }
    }
}

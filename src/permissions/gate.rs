//! Check/request front door over a [`PermissionService`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use super::{Permission, PermissionDecision, PermissionService};

/// Serializes permission prompts over a shared [`PermissionService`].
///
/// Status checks pass straight through. Requests take the prompt slot so at
/// most one dialog is in flight; a request that waited its turn re-checks the
/// live state before prompting, so a grant produced by the previous dialog is
/// observed without showing a second one.
#[derive(Clone)]
pub struct PermissionGate {
    service: Arc<dyn PermissionService>,
    prompt_slot: Arc<Mutex<()>>,
}

impl PermissionGate {
    /// Build a gate over the given service.
    pub fn new(service: Arc<dyn PermissionService>) -> Self {
        Self {
            service,
            prompt_slot: Arc::new(Mutex::new(())),
        }
    }

    /// Live grant state for `permission`.
    pub async fn check(&self, permission: Permission) -> bool {
        self.service.status(permission).await
    }

    /// Prompt for `permission` and resolve with the user's decision.
    ///
    /// No timeout: the future completes when the user answers or dismisses
    /// the dialog.
    pub async fn request(&self, permission: Permission) -> PermissionDecision {
        let _slot = self.prompt_slot.lock().await;
        // A prompt that resolved while we waited may have granted this.
        if self.service.status(permission).await {
            return PermissionDecision::Granted;
        }
        debug!(
            permission = permission.wire_name(),
            "prompting for permission"
        );
        self.service.prompt(permission).await
    }

    /// Check-then-request: skip the dialog when already granted.
    pub async fn ensure(&self, permission: Permission) -> PermissionDecision {
        if self.check(permission).await {
            return PermissionDecision::Granted;
        }
        self.request(permission).await
    }
}

//! Runtime permission model.
//!
//! Three permissions gate everything sensitive the app does: reading the
//! call-log store, reading the contacts store, and handing a call off to the
//! dialer. Grant state belongs to the platform layer ([`GrantLedger`] in this
//! build) and is re-checked live before every sensitive action; the app never
//! caches a grant, because grants can be revoked between checks.

mod gate;
mod ledger;

pub use gate::PermissionGate;
pub use ledger::{GrantLedger, LedgerPermissions};

use async_trait::async_trait;
use tokio::sync::oneshot;

/// Permission subsystem error types.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    /// The grant ledger could not be read or written.
    #[error("grant ledger i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The grant ledger could not be serialized.
    #[error("grant ledger serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A runtime permission the user can grant or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read the platform call-log store.
    ReadCallLog,
    /// Read the platform contacts store.
    ReadContacts,
    /// Hand a call off to the platform dialer.
    PlaceCall,
}

impl Permission {
    /// Stable snake_case name used in the grant ledger.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::ReadCallLog => "read_call_log",
            Self::ReadContacts => "read_contacts",
            Self::PlaceCall => "place_call",
        }
    }

    /// Action description shown in the grant dialog.
    pub fn description(self) -> &'static str {
        match self {
            Self::ReadCallLog => "read your call log",
            Self::ReadContacts => "read your contacts",
            Self::PlaceCall => "place phone calls",
        }
    }
}

/// The user's answer to a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// The user allowed the action.
    Granted,
    /// The user denied the action or dismissed the dialog.
    Denied,
}

impl PermissionDecision {
    /// True when the decision allows the gated action.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A grant dialog waiting to be shown by the shell.
///
/// The shell renders the dialog, collects the user's answer, and resolves the
/// responder exactly once. A dropped responder counts as a denial.
#[derive(Debug)]
pub struct PromptRequest {
    /// Permission being requested.
    pub permission: Permission,
    /// Single-use channel carrying the user's decision back.
    pub responder: oneshot::Sender<PermissionDecision>,
}

/// Platform seam for grant state and the grant dialog.
#[async_trait]
pub trait PermissionService: Send + Sync {
    /// Live grant state for `permission`.
    async fn status(&self, permission: Permission) -> bool;

    /// Show the grant dialog and resolve with the user's decision.
    async fn prompt(&self, permission: Permission) -> PermissionDecision;
}

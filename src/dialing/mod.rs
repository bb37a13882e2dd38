//! Outbound call hand-off.
//!
//! Rotary never talks to the telephony subsystem itself. Placing a call
//! means handing a `tel:` URI to a platform handler command and forgetting
//! about it; the handler owns the call from there. Rotary learns nothing
//! about the outcome (answered, busy, failed).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::permissions::{Permission, PermissionGate};

/// Dialing error types.
#[derive(Debug, thiserror::Error)]
pub enum DialError {
    /// The number to dial is empty or blank.
    #[error("cannot dial an empty number")]
    EmptyNumber,
    /// The dial handler command line is empty.
    #[error("dial handler command is empty")]
    HandlerUnconfigured,
    /// The dial handler process could not be spawned.
    #[error("failed to spawn dial handler: {0}")]
    Spawn(#[from] std::io::Error),
}

/// A `tel:` URI for a phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelUri {
    number: String,
}

impl TelUri {
    /// Build a URI for `number`.
    ///
    /// # Errors
    ///
    /// Returns [`DialError::EmptyNumber`] when `number` is empty or blank.
    pub fn new(number: &str) -> Result<Self, DialError> {
        if number.trim().is_empty() {
            return Err(DialError::EmptyNumber);
        }
        Ok(Self {
            number: number.to_owned(),
        })
    }

    /// The raw number behind the URI.
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl std::fmt::Display for TelUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tel:{}", self.number)
    }
}

/// Platform seam for handing a call off to the telephony subsystem.
#[async_trait]
pub trait CallHandler: Send + Sync {
    /// Hand `uri` to the platform dialer.
    ///
    /// # Errors
    ///
    /// Returns [`DialError`] when the hand-off could not be dispatched.
    async fn place_call(&self, uri: &TelUri) -> Result<(), DialError>;
}

/// Production [`CallHandler`]: spawns a configurable handler command with
/// the URI appended as the final argument and does not wait for it.
#[derive(Debug, Clone)]
pub struct CommandDialer {
    argv: Vec<String>,
}

impl CommandDialer {
    /// Build a dialer over the given command line (program plus leading
    /// arguments; the URI is appended at dispatch time).
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

#[async_trait]
impl CallHandler for CommandDialer {
    async fn place_call(&self, uri: &TelUri) -> Result<(), DialError> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or(DialError::HandlerUnconfigured)?;
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .arg(uri.to_string())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        // Fire and forget: dropping the child leaves it running.
        let child = cmd.spawn()?;
        drop(child);
        debug!(uri = %uri, "dial handler spawned");
        Ok(())
    }
}

/// Result of a call attempt, as far as rotary can know it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// The handler accepted the hand-off.
    Dispatched,
    /// Nothing was dispatched: empty number, denied permission, or a
    /// dispatch failure.
    Suppressed,
}

/// Permission-checked front door for placing calls.
///
/// Every screen routes call activation through here, so the permission
/// re-check and the silent-failure policy live in exactly one place.
#[derive(Clone)]
pub struct CallInitiator {
    gate: PermissionGate,
    handler: Arc<dyn CallHandler>,
}

impl CallInitiator {
    /// Build an initiator over the given gate and handler.
    pub fn new(gate: PermissionGate, handler: Arc<dyn CallHandler>) -> Self {
        Self { gate, handler }
    }

    /// Place a call to `number`.
    ///
    /// Checks the call permission first, prompting when ungranted. Every
    /// failure past that point is logged and suppressed; the caller only
    /// learns whether a hand-off happened, never why one did not.
    pub async fn call(&self, number: &str) -> CallOutcome {
        let uri = match TelUri::new(number) {
            Ok(uri) => uri,
            Err(e) => {
                debug!(error = %e, "ignoring dial request");
                return CallOutcome::Suppressed;
            }
        };
        if !self.gate.ensure(Permission::PlaceCall).await.is_granted() {
            debug!(number, "call permission denied");
            return CallOutcome::Suppressed;
        }
        match self.handler.place_call(&uri).await {
            Ok(()) => CallOutcome::Dispatched,
            Err(e) => {
                warn!(uri = %uri, error = %e, "call hand-off failed");
                CallOutcome::Suppressed
            }
        }
    }
}

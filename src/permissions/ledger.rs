//! TOML-backed grant storage and the production permission service.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{Permission, PermissionDecision, PermissionError, PermissionService, PromptRequest};

/// On-disk shape of the grant file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct GrantFile {
    /// Wire names of granted permissions.
    #[serde(default)]
    granted: Vec<String>,
}

/// Grant persistence: one TOML file listing granted permission names.
///
/// The file is read fresh on every query so external edits (a revoked grant,
/// a grant primed by `rotary seed`) are observed on the next check. A missing
/// file means no grants; an unreadable or malformed file is logged and
/// treated the same. Only grants are stored; a denial leaves the file
/// untouched, so the next request prompts again.
#[derive(Debug, Clone)]
pub struct GrantLedger {
    path: PathBuf,
}

impl GrantLedger {
    /// Create a ledger over the given file path. The file is not created
    /// until the first grant is persisted.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `permission` is currently granted.
    pub fn is_granted(&self, permission: Permission) -> bool {
        self.load()
            .granted
            .iter()
            .any(|name| name == permission.wire_name())
    }

    /// Persist a grant. No-op when already present.
    pub fn grant(&self, permission: Permission) -> Result<(), PermissionError> {
        let mut file = self.load();
        let name = permission.wire_name();
        if file.granted.iter().any(|existing| existing == name) {
            return Ok(());
        }
        file.granted.push(name.to_owned());
        self.store(&file)
    }

    fn load(&self) -> GrantFile {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return GrantFile::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read grant ledger");
                return GrantFile::default();
            }
        };
        match toml::from_str(&text) {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "grant ledger is not valid TOML, treating as empty"
                );
                GrantFile::default()
            }
        }
    }

    /// Writes via a temp file and rename to avoid partial reads.
    fn store(&self, file: &GrantFile) -> Result<(), PermissionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(file)?;
        let tmp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Production [`PermissionService`]: grant state from a [`GrantLedger`],
/// prompt dialogs delivered to the shell over an unbounded channel.
#[derive(Debug)]
pub struct LedgerPermissions {
    ledger: GrantLedger,
    prompts: mpsc::UnboundedSender<PromptRequest>,
}

impl LedgerPermissions {
    /// Build the service over `ledger`, sending prompt requests to `prompts`.
    pub fn new(ledger: GrantLedger, prompts: mpsc::UnboundedSender<PromptRequest>) -> Self {
        Self { ledger, prompts }
    }
}

#[async_trait]
impl PermissionService for LedgerPermissions {
    async fn status(&self, permission: Permission) -> bool {
        self.ledger.is_granted(permission)
    }

    async fn prompt(&self, permission: Permission) -> PermissionDecision {
        let (tx, rx) = oneshot::channel();
        let request = PromptRequest {
            permission,
            responder: tx,
        };
        if self.prompts.send(request).is_err() {
            // Shell is gone, nobody can grant anything.
            debug!(
                permission = permission.wire_name(),
                "prompt channel closed, denying"
            );
            return PermissionDecision::Denied;
        }
        match rx.await {
            Ok(decision) => {
                if decision.is_granted() {
                    if let Err(e) = self.ledger.grant(permission) {
                        warn!(
                            permission = permission.wire_name(),
                            error = %e,
                            "failed to persist grant"
                        );
                    }
                }
                decision
            }
            // Responder dropped without an answer (dialog dismissed).
            Err(_) => PermissionDecision::Denied,
        }
    }
}
